use geomrep_mesh::IndexData;

/// Replicated index counts above this switch to 32-bit indices.
pub const LARGE_INDEX_THRESHOLD: usize = 64 * 1024;

/// Repeat `source` once per copy, offsetting copy `i` by `i * stride`.
///
/// Output is 16-bit unless the index count exceeds [`LARGE_INDEX_THRESHOLD`] or
/// the largest remapped value does not fit in a `u16`.
pub fn remap_indices(source: &[u32], stride: usize, copies: usize) -> IndexData {
    let total = source.len() * copies;
    let max_value = match source.iter().max() {
        Some(&max) if copies > 0 => (copies - 1) * stride + max as usize,
        _ => 0,
    };

    let remapped = (0..copies).flat_map(|i| {
        let base = (i * stride) as u32;
        source.iter().map(move |&v| base + v)
    });

    if total > LARGE_INDEX_THRESHOLD || max_value > u16::MAX as usize {
        IndexData::U32(remapped.collect())
    } else {
        IndexData::U16(remapped.map(|v| v as u16).collect())
    }
}

/// Block stride for `IndexStride::MaxIndex`: one past the largest source index.
pub(crate) fn max_index_stride(source: &[u32]) -> usize {
    source.iter().max().map_or(0, |&m| m as usize + 1)
}
