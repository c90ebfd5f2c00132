use std::fmt::Write as _;

use geomrep_common::Aabb;
use geomrep_scene::Scene;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    /// Looks over a field of scattered replicas from just outside its edge.
    fn default() -> Self {
        Self {
            eye: Vec3::new(-4.0, 3.0, -50.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable listing of the scene's drawables.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (frame={}, elapsed={:.2}s) ===",
            scene.frame(),
            scene.elapsed()
        );
        let _ = writeln!(out, "Nodes: {}", scene.node_count());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        );

        for (id, node) in scene.nodes() {
            let p = node.position;
            let _ = write!(
                out,
                "  [{:.8}] {} pos=({:.2}, {:.2}, {:.2})",
                &id.0.to_string()[..8],
                node.name,
                p.x,
                p.y,
                p.z
            );
            match node.component() {
                Some(c) => {
                    let geometry = c.geometry();
                    let _ = writeln!(
                        out,
                        " {}: vertices={} indices={} triangles={}",
                        c.type_name(),
                        geometry.vertex_buffer().vertex_count(),
                        geometry.index_buffer().index_count(),
                        c.primitive_count()
                    );
                }
                None => out.push('\n'),
            }
        }

        out
    }
}

/// What one frame would submit to a GPU backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Draw calls, one per drawable with a non-empty draw range.
    pub batches: usize,
    pub primitives: usize,
    pub vertices: usize,
    /// World-space bounds of every drawable.
    pub bounds: Aabb,
}

/// Counts draw work instead of drawing.
#[derive(Debug, Default)]
pub struct StatsRenderer;

impl StatsRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for StatsRenderer {
    type Output = FrameStats;

    fn render(&self, scene: &Scene, _view: &RenderView) -> FrameStats {
        let mut stats = FrameStats {
            batches: 0,
            primitives: 0,
            vertices: 0,
            bounds: Aabb::EMPTY,
        };
        for node in scene.nodes().values() {
            let Some(c) = node.component() else {
                continue;
            };
            let primitives = c.primitive_count();
            if primitives == 0 {
                continue;
            }
            stats.batches += 1;
            stats.primitives += primitives;
            stats.vertices += c.geometry().vertex_buffer().vertex_count();
            stats.bounds.merge_aabb(&node.world_bounds());
        }
        tracing::trace!(
            batches = stats.batches,
            primitives = stats.primitives,
            "frame stats"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomrep_mesh::primitives;
    use geomrep_scene::StaticModel;

    fn two_model_scene() -> Scene {
        let mut scene = Scene::new();
        let ground = scene.create_child("Plane", Vec3::ZERO);
        scene.attach(ground, Box::new(StaticModel::new(primitives::plane(10.0))));
        let brush = scene.create_child("Brush", Vec3::new(1.0, 0.0, 2.0));
        scene.attach(brush, Box::new(StaticModel::new(primitives::crossed_quads())));
        scene.create_child("Empty", Vec3::ZERO);
        scene
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&Scene::new(), &RenderView::default());
        assert!(output.contains("frame=0"));
        assert!(output.contains("Nodes: 0"));
    }

    #[test]
    fn debug_renderer_lists_drawables() {
        let scene = two_model_scene();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("Nodes: 3"));
        assert!(output.contains("Brush"));
        assert!(output.contains("StaticModel: vertices=8 indices=12 triangles=4"));
        assert!(output.contains("Empty pos="));
    }

    #[test]
    fn stats_count_non_empty_drawables() {
        let scene = two_model_scene();
        let stats = StatsRenderer::new().render(&scene, &RenderView::default());
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.primitives, 2 + 4);
        assert_eq!(stats.vertices, 4 + 8);
        assert_eq!(stats.bounds.min, Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(stats.bounds.max, Vec3::new(5.0, 1.0, 5.0));
    }

    #[test]
    fn stats_on_empty_scene() {
        let stats = StatsRenderer::new().render(&Scene::new(), &RenderView::default());
        assert_eq!(stats.batches, 0);
        assert!(stats.bounds.is_empty());
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.target, Vec3::ZERO);
    }
}
