use std::hash::{DefaultHasher, Hash, Hasher};

use crate::{
    algorithms::compute_distance_field,
    types::{BoundaryPixels, DistanceField, ExteriorMask, ForegroundMask, MaskSource},
};

/// Identity of a mask: its dimensions plus a content fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskKey {
    pub width: u32,
    pub height: u32,
    pub fingerprint: u64,
}

impl MaskKey {
    /// Fingerprint the alpha plane itself
    pub fn of(source: &MaskSource) -> Self {
        let (width, height) = source.dimensions();
        let mut hasher = DefaultHasher::new();
        source.alpha_plane().as_raw().hash(&mut hasher);
        Self {
            width,
            height,
            fingerprint: hasher.finish(),
        }
    }

    /// Use a caller-supplied revision token (e.g. a last-modified stamp)
    /// instead of hashing pixels
    pub fn with_revision(source: &MaskSource, revision: u64) -> Self {
        let (width, height) = source.dimensions();
        Self {
            width,
            height,
            fingerprint: revision,
        }
    }
}

/// Per-mask results that survive thickness, style and edit changes
#[derive(Debug, Clone)]
pub struct BoundaryCache {
    pub key: MaskKey,
    pub foreground: ForegroundMask,
    pub exterior: ExteriorMask,
    pub boundary: BoundaryPixels,
}

impl BoundaryCache {
    pub fn dimensions(&self) -> (u32, u32) {
        self.foreground.dimensions()
    }

    pub fn has_foreground(&self) -> bool {
        !self.boundary.is_empty()
    }

    pub fn distance_field(&self, thickness: u32) -> DistanceField {
        compute_distance_field(&self.exterior, &self.boundary, thickness)
    }
}
