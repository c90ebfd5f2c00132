use std::ops::Range;

use glam::Vec3;

use crate::element::ElementMask;

/// Errors from building buffers out of raw data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("vertex layout {0:?} has no position element")]
    MissingPosition(ElementMask),
    #[error("vertex data length {len} is not a multiple of the vertex size {vertex_size}")]
    MisalignedData { len: usize, vertex_size: usize },
    #[error("index {value} at slot {slot} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        slot: usize,
        value: u32,
        vertex_count: usize,
    },
}

/// Interleaved vertex storage with a lock/unlock access pattern.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    mask: ElementMask,
    vertex_size: usize,
    vertex_count: usize,
    data: Vec<u8>,
    data_lost: bool,
    /// Vertex range written since the last upload.
    dirty: Option<Range<usize>>,
}

impl VertexBuffer {
    /// Create an empty buffer with the given layout.
    pub fn new(mask: ElementMask) -> Result<Self, MeshError> {
        Self::from_bytes(mask, Vec::new())
    }

    /// Wrap raw interleaved bytes. The length must be a whole number of vertices.
    pub fn from_bytes(mask: ElementMask, data: Vec<u8>) -> Result<Self, MeshError> {
        if !mask.contains(ElementMask::POSITION) {
            return Err(MeshError::MissingPosition(mask));
        }
        let vertex_size = mask.vertex_size();
        if data.len() % vertex_size != 0 {
            return Err(MeshError::MisalignedData {
                len: data.len(),
                vertex_size,
            });
        }
        let vertex_count = data.len() / vertex_size;
        Ok(Self {
            mask,
            vertex_size,
            vertex_count,
            data,
            data_lost: false,
            dirty: None,
        })
    }

    pub fn element_mask(&self) -> ElementMask {
        self.mask
    }

    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Resize to `vertex_count` vertices with the same layout. Contents are zeroed.
    pub fn set_size(&mut self, vertex_count: usize) {
        tracing::trace!(from = self.vertex_count, to = vertex_count, "vertex buffer resize");
        self.vertex_count = vertex_count;
        self.data.clear();
        self.data.resize(vertex_count * self.vertex_size, 0);
        self.dirty = None;
    }

    /// Whether the backing storage was lost (e.g. device reset) and must be restored.
    pub fn is_data_lost(&self) -> bool {
        self.data_lost
    }

    pub fn set_data_lost(&mut self, lost: bool) {
        self.data_lost = lost;
    }

    /// Read-only view of all vertex bytes, or `None` while the data is lost.
    pub fn read(&self) -> Option<&[u8]> {
        if self.data_lost {
            None
        } else {
            Some(&self.data)
        }
    }

    /// Lock `count` vertices starting at `start` for writing.
    ///
    /// Returns `None` when the data is lost or the range is out of bounds.
    pub fn lock(&mut self, start: usize, count: usize) -> Option<VertexLock<'_>> {
        if self.data_lost || start.checked_add(count)? > self.vertex_count {
            return None;
        }
        Some(VertexLock {
            buffer: self,
            start,
            count,
        })
    }

    /// Position of vertex `index`. Panics if out of range.
    pub fn position(&self, index: usize) -> Vec3 {
        read_vec3(&self.vertex_bytes(index)[..12])
    }

    /// Normal of vertex `index`, if the layout has one. Panics if out of range.
    pub fn normal(&self, index: usize) -> Option<Vec3> {
        let offset = self.mask.offset_of(ElementMask::NORMAL)?;
        Some(read_vec3(&self.vertex_bytes(index)[offset..offset + 12]))
    }

    /// Raw bytes of a single vertex. Panics if out of range.
    pub fn vertex_bytes(&self, index: usize) -> &[u8] {
        let at = index * self.vertex_size;
        &self.data[at..at + self.vertex_size]
    }

    pub fn dirty_range(&self) -> Option<Range<usize>> {
        self.dirty.clone()
    }

    /// Take the pending dirty range, as a renderer does when it uploads.
    pub fn take_dirty_range(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    fn mark_dirty(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty.take() {
            Some(d) => d.start.min(range.start)..d.end.max(range.end),
            None => range,
        });
    }
}

/// Scoped write access to a vertex range. Marks the range dirty on drop.
///
/// Indices passed to the accessors are relative to the locked range.
#[derive(Debug)]
pub struct VertexLock<'a> {
    buffer: &'a mut VertexBuffer,
    start: usize,
    count: usize,
}

impl VertexLock<'_> {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn vertex_size(&self) -> usize {
        self.buffer.vertex_size
    }

    pub fn element_mask(&self) -> ElementMask {
        self.buffer.mask
    }

    pub fn vertex(&self, local: usize) -> &[u8] {
        assert!(local < self.count, "vertex {local} outside lock of {}", self.count);
        self.buffer.vertex_bytes(self.start + local)
    }

    pub fn vertex_mut(&mut self, local: usize) -> &mut [u8] {
        assert!(local < self.count, "vertex {local} outside lock of {}", self.count);
        let size = self.buffer.vertex_size;
        let at = (self.start + local) * size;
        &mut self.buffer.data[at..at + size]
    }

    pub fn position(&self, local: usize) -> Vec3 {
        read_vec3(&self.vertex(local)[..12])
    }

    /// Overwrite only the position field of one vertex.
    pub fn set_position(&mut self, local: usize, position: Vec3) {
        write_vec3(&mut self.vertex_mut(local)[..12], position);
    }

    /// Overwrite the normal field of one vertex. Ignored when the layout has no normal.
    pub fn set_normal(&mut self, local: usize, normal: Vec3) {
        if let Some(offset) = self.buffer.mask.offset_of(ElementMask::NORMAL) {
            write_vec3(&mut self.vertex_mut(local)[offset..offset + 12], normal);
        }
    }
}

impl Drop for VertexLock<'_> {
    fn drop(&mut self) {
        let range = self.start..self.start + self.count;
        self.buffer.mark_dirty(range);
    }
}

/// Index storage in either 16- or 32-bit elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element width in bytes.
    pub fn index_size(&self) -> usize {
        match self {
            Self::U16(_) => 2,
            Self::U32(_) => 4,
        }
    }

    pub fn get(&self, slot: usize) -> Option<u32> {
        match self {
            Self::U16(v) => v.get(slot).map(|&i| i as u32),
            Self::U32(v) => v.get(slot).copied(),
        }
    }

    /// Widen every index to `u32`.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        match self {
            Self::U16(v) => v.iter().map(|&i| i as u32).collect(),
            Self::U32(v) => v.clone(),
        }
    }
}

/// Index storage with the same lock/unlock access pattern as [`VertexBuffer`].
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    data: IndexData,
    data_lost: bool,
    dirty: bool,
}

impl IndexBuffer {
    pub fn new(data: IndexData) -> Self {
        Self {
            data,
            data_lost: false,
            dirty: false,
        }
    }

    pub fn from_u16(indices: Vec<u16>) -> Self {
        Self::new(IndexData::U16(indices))
    }

    pub fn from_u32(indices: Vec<u32>) -> Self {
        Self::new(IndexData::U32(indices))
    }

    pub fn index_count(&self) -> usize {
        self.data.len()
    }

    pub fn index_size(&self) -> usize {
        self.data.index_size()
    }

    /// True when stored as 32-bit indices.
    pub fn is_large(&self) -> bool {
        matches!(self.data, IndexData::U32(_))
    }

    pub fn is_data_lost(&self) -> bool {
        self.data_lost
    }

    pub fn set_data_lost(&mut self, lost: bool) {
        self.data_lost = lost;
    }

    /// Read-only view of the indices, or `None` while the data is lost.
    pub fn read(&self) -> Option<&IndexData> {
        if self.data_lost {
            None
        } else {
            Some(&self.data)
        }
    }

    /// Lock the whole buffer for writing. `None` when the data is lost.
    pub fn lock(&mut self) -> Option<IndexLock<'_>> {
        if self.data_lost {
            return None;
        }
        Some(IndexLock { buffer: self })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Scoped write access to an index buffer. Marks it dirty on drop.
#[derive(Debug)]
pub struct IndexLock<'a> {
    buffer: &'a mut IndexBuffer,
}

impl IndexLock<'_> {
    pub fn data(&self) -> &IndexData {
        &self.buffer.data
    }

    /// Replace contents, size and element width in one go.
    pub fn replace(&mut self, data: IndexData) {
        self.buffer.data = data;
    }
}

impl Drop for IndexLock<'_> {
    fn drop(&mut self) {
        self.buffer.dirty = true;
    }
}

fn read_vec3(bytes: &[u8]) -> Vec3 {
    Vec3::from_array(bytemuck::pod_read_unaligned::<[f32; 3]>(bytes))
}

fn write_vec3(bytes: &mut [u8], v: Vec3) {
    bytes.copy_from_slice(bytemuck::bytes_of(&v.to_array()));
}
