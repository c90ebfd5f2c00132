use std::ops::{BitOr, BitOrAssign};

/// Bit set of the attributes present in each interleaved vertex.
///
/// Attributes are laid out in a fixed order: position, normal, color,
/// texcoord1, texcoord2, tangent. Offsets and the vertex size are derived
/// from the mask, never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ElementMask(u32);

impl ElementMask {
    pub const NONE: Self = Self(0);
    /// `[f32; 3]`
    pub const POSITION: Self = Self(1);
    /// `[f32; 3]`
    pub const NORMAL: Self = Self(1 << 1);
    /// Packed RGBA8.
    pub const COLOR: Self = Self(1 << 2);
    /// `[f32; 2]`
    pub const TEXCOORD1: Self = Self(1 << 3);
    /// `[f32; 2]`
    pub const TEXCOORD2: Self = Self(1 << 4);
    /// `[f32; 4]`, w = handedness.
    pub const TANGENT: Self = Self(1 << 5);

    const LAYOUT: [(ElementMask, usize); 6] = [
        (Self::POSITION, 12),
        (Self::NORMAL, 12),
        (Self::COLOR, 4),
        (Self::TEXCOORD1, 8),
        (Self::TEXCOORD2, 8),
        (Self::TANGENT, 16),
    ];

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bytes per vertex for this layout.
    pub fn vertex_size(self) -> usize {
        Self::LAYOUT
            .iter()
            .filter(|(element, _)| self.contains(*element))
            .map(|(_, size)| size)
            .sum()
    }

    /// Byte offset of a single element inside one vertex, if present.
    pub fn offset_of(self, element: Self) -> Option<usize> {
        if !self.contains(element) {
            return None;
        }
        let mut offset = 0;
        for (e, size) in Self::LAYOUT {
            if e == element {
                return Some(offset);
            }
            if self.contains(e) {
                offset += size;
            }
        }
        None
    }
}

impl BitOr for ElementMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ElementMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
