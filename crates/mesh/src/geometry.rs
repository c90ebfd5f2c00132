use geomrep_common::Aabb;

use crate::buffer::{IndexBuffer, MeshError, VertexBuffer};

/// Slice of the index buffer submitted for drawing, as a triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub index_start: usize,
    pub index_count: usize,
}

impl DrawRange {
    /// Whole triangles covered by the range.
    pub fn primitive_count(&self) -> usize {
        self.index_count / 3
    }
}

/// One vertex buffer, one index buffer, the range to draw and its bounds.
#[derive(Debug, Clone)]
pub struct Geometry {
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    draw_range: DrawRange,
    bounding_box: Aabb,
}

impl Geometry {
    /// Build a triangle-list geometry drawing every index.
    ///
    /// Every index must address an existing vertex. Bounds are computed from
    /// the vertex positions.
    pub fn new(vertex_buffer: VertexBuffer, index_buffer: IndexBuffer) -> Result<Self, MeshError> {
        let vertex_count = vertex_buffer.vertex_count();
        if let Some(indices) = index_buffer.read() {
            for slot in 0..indices.len() {
                let value = indices.get(slot).unwrap_or_default();
                if value as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        slot,
                        value,
                        vertex_count,
                    });
                }
            }
        }
        let bounding_box = Aabb::from_points((0..vertex_count).map(|i| vertex_buffer.position(i)));
        let draw_range = DrawRange {
            index_start: 0,
            index_count: index_buffer.index_count(),
        };
        Ok(Self {
            vertex_buffer,
            index_buffer,
            draw_range,
            bounding_box,
        })
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    pub fn vertex_buffer_mut(&mut self) -> &mut VertexBuffer {
        &mut self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.index_buffer
    }

    pub fn index_buffer_mut(&mut self) -> &mut IndexBuffer {
        &mut self.index_buffer
    }

    /// Both buffers at once, for callers that write one while reading the other.
    pub fn buffers_mut(&mut self) -> (&mut VertexBuffer, &mut IndexBuffer) {
        (&mut self.vertex_buffer, &mut self.index_buffer)
    }

    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    pub fn set_draw_range(&mut self, index_start: usize, index_count: usize) {
        self.draw_range = DrawRange {
            index_start,
            index_count,
        };
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    pub fn set_bounding_box(&mut self, bounding_box: Aabb) {
        self.bounding_box = bounding_box;
    }

    pub fn primitive_count(&self) -> usize {
        self.draw_range.primitive_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementMask;
    use glam::Vec3;

    fn triangle() -> VertexBuffer {
        let raw: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        VertexBuffer::from_bytes(
            ElementMask::POSITION,
            bytemuck::cast_slice::<[f32; 3], u8>(&raw).to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn new_draws_everything_and_bounds_positions() {
        let geom = Geometry::new(triangle(), IndexBuffer::from_u16(vec![0, 1, 2])).unwrap();
        assert_eq!(geom.draw_range().index_count, 3);
        assert_eq!(geom.draw_range().index_start, 0);
        assert_eq!(geom.primitive_count(), 1);
        assert_eq!(geom.bounding_box().max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn new_rejects_dangling_index() {
        let err = Geometry::new(triangle(), IndexBuffer::from_u16(vec![0, 1, 3])).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                slot: 2,
                value: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn draw_range_counts_primitives() {
        let range = DrawRange {
            index_start: 6,
            index_count: 8,
        };
        // Trailing indices that do not close a triangle are not counted.
        assert_eq!(range.primitive_count(), 2);
        assert_eq!(DrawRange::default().primitive_count(), 0);
    }
}
