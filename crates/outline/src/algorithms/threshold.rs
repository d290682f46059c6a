use crate::{
    error::Result,
    types::{ForegroundMask, MaskSource},
};

/// Alpha above which a pixel counts as foreground
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Binarizes the alpha plane of a mask source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaThreshold {
    pub threshold: u8,
}

impl Default for AlphaThreshold {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ALPHA_THRESHOLD,
        }
    }
}

impl AlphaThreshold {
    /// `alpha > threshold` becomes foreground
    pub fn apply(&self, source: &MaskSource) -> Result<ForegroundMask> {
        let plane = source.alpha_plane();
        let (width, height) = plane.dimensions();
        let binary = imageproc::contrast::threshold(&plane, self.threshold);
        ForegroundMask::from_raw(width, height, binary.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_threshold_is_strict() {
        let mut plane = GrayImage::new(3, 1);
        plane.put_pixel(0, 0, Luma([128]));
        plane.put_pixel(1, 0, Luma([129]));
        plane.put_pixel(2, 0, Luma([255]));

        let mask = AlphaThreshold::default()
            .apply(&MaskSource::Alpha(plane))
            .expect("Should threshold");
        assert!(!mask.get(0));
        assert!(mask.get(1));
        assert!(mask.get(2));
    }

    #[test]
    fn test_transparent_source_gives_empty_mask() {
        let mask = AlphaThreshold::default()
            .apply(&MaskSource::Rgba(image::RgbaImage::new(8, 8)))
            .expect("Should threshold");
        assert_eq!(mask.count_set(), 0);
        assert_eq!(mask.len(), 64);
    }
}
