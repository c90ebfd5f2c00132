//! Built-in source meshes for replication demos and tests.
//!
//! Both use the `POSITION | NORMAL | TEXCOORD1` layout (32 bytes per vertex).

use bytemuck::{Pod, Zeroable};

use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::element::ElementMask;
use crate::geometry::Geometry;

/// Top two vertices of [`quad`], the ones wind should move.
pub const QUAD_TIP_SLOTS: [u32; 2] = [2, 3];

/// Top vertices of both planes of [`crossed_quads`].
pub const CROSSED_QUADS_TIP_SLOTS: [u32; 4] = [2, 3, 6, 7];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

pub fn layout() -> ElementMask {
    ElementMask::POSITION | ElementMask::NORMAL | ElementMask::TEXCOORD1
}

/// Unit-wide, unit-tall upright quad in the XY plane, base on the origin, facing +Z.
pub fn quad() -> Geometry {
    #[rustfmt::skip]
    let vertices = [
        Vertex { position: [-0.5, 0.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 1.0] },
        Vertex { position: [ 0.5, 0.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 1.0] },
        Vertex { position: [ 0.5, 1.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 0.0] },
        Vertex { position: [-0.5, 1.0, 0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 0.0] },
    ];
    build(&vertices, vec![0, 1, 2, 2, 3, 0])
}

/// Two upright quads crossed at right angles: a cheap vegetation brush.
pub fn crossed_quads() -> Geometry {
    #[rustfmt::skip]
    let vertices = [
        // XY plane
        Vertex { position: [-0.5, 0.0,  0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 1.0] },
        Vertex { position: [ 0.5, 0.0,  0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 1.0] },
        Vertex { position: [ 0.5, 1.0,  0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 0.0] },
        Vertex { position: [-0.5, 1.0,  0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 0.0] },
        // ZY plane
        Vertex { position: [ 0.0, 0.0, -0.5], normal: [1.0, 0.0, 0.0], uv: [0.0, 1.0] },
        Vertex { position: [ 0.0, 0.0,  0.5], normal: [1.0, 0.0, 0.0], uv: [1.0, 1.0] },
        Vertex { position: [ 0.0, 1.0,  0.5], normal: [1.0, 0.0, 0.0], uv: [1.0, 0.0] },
        Vertex { position: [ 0.0, 1.0, -0.5], normal: [1.0, 0.0, 0.0], uv: [0.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 2, 3, 0,
        4, 5, 6, 6, 7, 4,
    ];
    build(&vertices, indices)
}

/// Flat square of side `size` in the XZ plane, centred on the origin, facing +Y.
pub fn plane(size: f32) -> Geometry {
    let h = size * 0.5;
    #[rustfmt::skip]
    let vertices = [
        Vertex { position: [-h, 0.0,  h], normal: [0.0, 1.0, 0.0], uv: [0.0, 1.0] },
        Vertex { position: [ h, 0.0,  h], normal: [0.0, 1.0, 0.0], uv: [1.0, 1.0] },
        Vertex { position: [ h, 0.0, -h], normal: [0.0, 1.0, 0.0], uv: [1.0, 0.0] },
        Vertex { position: [-h, 0.0, -h], normal: [0.0, 1.0, 0.0], uv: [0.0, 0.0] },
    ];
    build(&vertices, vec![0, 1, 2, 2, 3, 0])
}

fn build(vertices: &[Vertex], indices: Vec<u16>) -> Geometry {
    let bytes = bytemuck::cast_slice::<Vertex, u8>(vertices).to_vec();
    // Static data with a fixed layout and in-range indices; failure is a bug here.
    let vertex_buffer = VertexBuffer::from_bytes(layout(), bytes).expect("primitive vertex layout");
    Geometry::new(vertex_buffer, IndexBuffer::from_u16(indices)).expect("primitive indices")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn quad_shape() {
        let geom = quad();
        assert_eq!(geom.vertex_buffer().vertex_count(), 4);
        assert_eq!(geom.vertex_buffer().vertex_size(), 32);
        assert_eq!(geom.index_buffer().index_count(), 6);
        assert_eq!(geom.vertex_buffer().normal(0), Some(Vec3::Z));
        for slot in QUAD_TIP_SLOTS {
            assert_eq!(geom.vertex_buffer().position(slot as usize).y, 1.0);
        }
    }

    #[test]
    fn crossed_quads_tips_are_on_top() {
        let geom = crossed_quads();
        assert_eq!(geom.vertex_buffer().vertex_count(), 8);
        assert_eq!(geom.primitive_count(), 4);
        for slot in CROSSED_QUADS_TIP_SLOTS {
            assert_eq!(geom.vertex_buffer().position(slot as usize).y, 1.0);
        }
        assert_eq!(geom.bounding_box().size(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn plane_is_flat() {
        let geom = plane(100.0);
        assert_eq!(geom.bounding_box().size(), Vec3::new(100.0, 0.0, 100.0));
        assert_eq!(geom.vertex_buffer().normal(2), Some(Vec3::Y));
    }
}
