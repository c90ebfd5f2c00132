use std::any::Any;

use geomrep_common::Aabb;
use geomrep_mesh::{DrawRange, Geometry};

/// What a renderer needs from anything it draws.
pub trait Drawable {
    fn geometry(&self) -> &Geometry;

    /// Local-space bounds.
    fn bounding_box(&self) -> Aabb {
        self.geometry().bounding_box()
    }

    fn draw_range(&self) -> DrawRange {
        self.geometry().draw_range()
    }

    fn primitive_count(&self) -> usize {
        self.geometry().primitive_count()
    }
}

/// A drawable attached to a scene node and ticked once per frame.
pub trait Component: Drawable + Any {
    /// Short type label for logs and debug output.
    fn type_name(&self) -> &'static str;

    /// Per-frame update with the host frame time in seconds.
    fn update(&mut self, _dt: f32) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Static geometry with no per-frame behaviour.
#[derive(Debug, Clone)]
pub struct StaticModel {
    geometry: Geometry,
}

impl StaticModel {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }
}

impl Drawable for StaticModel {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

impl Component for StaticModel {
    fn type_name(&self) -> &'static str {
        "StaticModel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomrep_mesh::primitives;

    #[test]
    fn static_model_exposes_geometry() {
        let model = StaticModel::new(primitives::quad());
        assert_eq!(model.primitive_count(), 2);
        assert_eq!(model.draw_range().index_count, 6);
        assert!(!model.bounding_box().is_empty());
        assert_eq!(model.type_name(), "StaticModel");
    }

    #[test]
    fn downcasts_through_any() {
        let mut boxed: Box<dyn Component> = Box::new(StaticModel::new(primitives::quad()));
        assert!(boxed.as_any().downcast_ref::<StaticModel>().is_some());
        assert!(boxed.as_any_mut().downcast_mut::<StaticModel>().is_some());
    }
}
