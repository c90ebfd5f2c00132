use std::collections::BTreeMap;

use geomrep_common::{Aabb, NodeId};
use glam::Vec3;

use crate::component::Component;

/// A named point in the scene with at most one attached component.
pub struct Node {
    pub name: String,
    pub position: Vec3,
    component: Option<Box<dyn Component>>,
}

impl Node {
    pub fn component(&self) -> Option<&dyn Component> {
        self.component.as_deref()
    }

    pub fn component_mut(&mut self) -> Option<&mut (dyn Component + 'static)> {
        self.component.as_deref_mut()
    }

    /// Component bounds moved into world space, or empty without a component.
    pub fn world_bounds(&self) -> Aabb {
        match self.component() {
            Some(c) => {
                let local = c.bounding_box();
                if local.is_empty() {
                    local
                } else {
                    Aabb::new(local.min + self.position, local.max + self.position)
                }
            }
            None => Aabb::EMPTY,
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("component", &self.component.as_ref().map(|c| c.type_name()))
            .finish()
    }
}

/// The host scene: nodes keyed by id, advanced one frame at a time.
///
/// Uses BTreeMap so components are updated and rendered in a stable order.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    frame: u64,
    elapsed: f64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    /// Add an empty node. Returns its id.
    pub fn create_child(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        let id = NodeId::new();
        let name = name.into();
        tracing::debug!(%name, "node created");
        self.nodes.insert(
            id,
            Node {
                name,
                position,
                component: None,
            },
        );
        id
    }

    /// Remove a node and its component.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Attach a component, replacing any existing one. Returns false if the node is gone.
    pub fn attach(&mut self, id: NodeId, component: Box<dyn Component>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                tracing::debug!(node = %node.name, kind = component.type_name(), "component attached");
                node.component = Some(component);
                true
            }
            None => false,
        }
    }

    /// Typed access to a node's component.
    pub fn component<T: Component>(&self, id: NodeId) -> Option<&T> {
        self.nodes
            .get(&id)?
            .component
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(&id)?
            .component
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Advance one frame, updating every component with `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.frame += 1;
        self.elapsed += dt as f64;
        for node in self.nodes.values_mut() {
            if let Some(component) = node.component.as_mut() {
                component.update(dt);
            }
        }
        tracing::trace!(frame = self.frame, dt, "scene update");
    }

    /// World-space bounds of everything drawable.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for node in self.nodes.values() {
            bounds.merge_aabb(&node.world_bounds());
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Drawable, StaticModel};
    use geomrep_mesh::{Geometry, primitives};
    use std::any::Any;

    /// Counts updates so tests can see the scene drive components.
    struct Counter {
        geometry: Geometry,
        updates: u32,
        time: f32,
    }

    impl Drawable for Counter {
        fn geometry(&self) -> &Geometry {
            &self.geometry
        }
    }

    impl Component for Counter {
        fn type_name(&self) -> &'static str {
            "Counter"
        }

        fn update(&mut self, dt: f32) {
            self.updates += 1;
            self.time += dt;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert_eq!(scene.frame(), 0);
        assert_eq!(scene.node_count(), 0);
        assert!(scene.bounds().is_empty());
    }

    #[test]
    fn create_attach_remove() {
        let mut scene = Scene::new();
        let id = scene.create_child("Plane", Vec3::ZERO);
        assert!(scene.get(id).unwrap().component().is_none());
        assert!(scene.attach(id, Box::new(StaticModel::new(primitives::plane(10.0)))));
        assert!(scene.component::<StaticModel>(id).is_some());
        assert!(scene.component::<Counter>(id).is_none());

        assert!(scene.remove(id).is_some());
        assert_eq!(scene.node_count(), 0);
        assert!(!scene.attach(id, Box::new(StaticModel::new(primitives::quad()))));
    }

    #[test]
    fn update_ticks_components() {
        let mut scene = Scene::new();
        let id = scene.create_child("Counter", Vec3::ZERO);
        scene.attach(
            id,
            Box::new(Counter {
                geometry: primitives::quad(),
                updates: 0,
                time: 0.0,
            }),
        );
        for _ in 0..3 {
            scene.update(0.5);
        }
        let counter = scene.component::<Counter>(id).unwrap();
        assert_eq!(counter.updates, 3);
        assert_eq!(counter.time, 1.5);
        assert_eq!(scene.frame(), 3);
        assert_eq!(scene.elapsed(), 1.5);
    }

    #[test]
    fn bounds_are_offset_by_node_position() {
        let mut scene = Scene::new();
        let id = scene.create_child("Quad", Vec3::new(10.0, 0.0, 0.0));
        scene.attach(id, Box::new(StaticModel::new(primitives::quad())));
        let bounds = scene.bounds();
        assert_eq!(bounds.min, Vec3::new(9.5, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(10.5, 1.0, 0.0));
    }

    #[test]
    fn node_debug_names_component() {
        let mut scene = Scene::new();
        let id = scene.create_child("Plane", Vec3::ZERO);
        scene.attach(id, Box::new(StaticModel::new(primitives::plane(1.0))));
        let text = format!("{:?}", scene.get(id).unwrap());
        assert!(text.contains("StaticModel"));
    }
}
