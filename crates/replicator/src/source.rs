use geomrep_mesh::{ElementMask, IndexBuffer, IndexData, VertexBuffer};
use glam::Vec3;

/// Owned copy of the source vertices, taken before the live buffer is resized.
#[derive(Debug, Clone)]
pub(crate) struct SourceVertices {
    pub mask: ElementMask,
    pub vertex_size: usize,
    pub vertex_count: usize,
    bytes: Vec<u8>,
    normal_offset: Option<usize>,
}

impl SourceVertices {
    /// `None` when the buffer's data is unavailable.
    pub fn capture(buffer: &VertexBuffer) -> Option<Self> {
        let bytes = buffer.read()?.to_vec();
        let mask = buffer.element_mask();
        Some(Self {
            mask,
            vertex_size: buffer.vertex_size(),
            vertex_count: buffer.vertex_count(),
            bytes,
            normal_offset: mask.offset_of(ElementMask::NORMAL),
        })
    }

    pub fn vertex(&self, index: usize) -> &[u8] {
        let at = index * self.vertex_size;
        &self.bytes[at..at + self.vertex_size]
    }

    pub fn position(&self, index: usize) -> Vec3 {
        read_vec3(&self.vertex(index)[..12])
    }

    pub fn normal(&self, index: usize) -> Option<Vec3> {
        let offset = self.normal_offset?;
        Some(read_vec3(&self.vertex(index)[offset..offset + 12]))
    }
}

/// Source indices widened to `u32`. `None` when the buffer's data is unavailable.
pub(crate) fn capture_indices(buffer: &IndexBuffer) -> Option<Vec<u32>> {
    buffer.read().map(IndexData::to_u32_vec)
}

fn read_vec3(bytes: &[u8]) -> Vec3 {
    Vec3::from_array(bytemuck::pod_read_unaligned::<[f32; 3]>(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geomrep_mesh::primitives;

    #[test]
    fn capture_copies_layout_and_values() {
        let geom = primitives::quad();
        let source = SourceVertices::capture(geom.vertex_buffer()).unwrap();
        assert_eq!(source.vertex_count, 4);
        assert_eq!(source.vertex_size, 32);
        assert_eq!(source.mask, primitives::layout());
        assert_eq!(source.position(2), Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(source.normal(2), Some(Vec3::Z));
        assert_eq!(source.vertex(1), geom.vertex_buffer().vertex_bytes(1));
    }

    #[test]
    fn capture_fails_on_lost_data() {
        let mut geom = primitives::quad();
        geom.vertex_buffer_mut().set_data_lost(true);
        geom.index_buffer_mut().set_data_lost(true);
        assert!(SourceVertices::capture(geom.vertex_buffer()).is_none());
        assert!(capture_indices(geom.index_buffer()).is_none());
    }

    #[test]
    fn capture_indices_widens() {
        let geom = primitives::quad();
        assert_eq!(capture_indices(geom.index_buffer()).unwrap(), vec![0, 1, 2, 2, 3, 0]);
    }
}
