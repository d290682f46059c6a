use image::Rgba;
use tracing::debug;

use crate::{
    traits::OutlineBlender,
    types::{DistanceField, EditMask, ExteriorMask, OutlineStyle, RasterBuffer},
};

/// Gradient pixels with blend alpha at or below this are left alone
pub const GRADIENT_CUTOFF: f32 = 50.0;

/// Glow never reaches full opacity
pub const GLOW_STRENGTH: f32 = 0.8;

/// Overwrites RGB with the outline color
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidBlend;

impl OutlineBlender for SolidBlend {
    fn blend(&self, _original: [u8; 3], color: [u8; 3], _distance: f32, _thickness: u32) -> Option<[u8; 3]> {
        Some(color)
    }
}

/// Linear fade from the subject outwards, dropping the faint tail
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientBlend;

impl OutlineBlender for GradientBlend {
    fn blend(&self, original: [u8; 3], color: [u8; 3], distance: f32, thickness: u32) -> Option<[u8; 3]> {
        let alpha = 255.0 * (1.0 - distance / (thickness as f32 + 1.0));
        (alpha > GRADIENT_CUTOFF).then(|| lerp_rgb(original, color, alpha / 255.0))
    }
}

/// Softer fade reaching zero at the outer edge
#[derive(Debug, Clone, Copy, Default)]
pub struct GlowBlend;

impl OutlineBlender for GlowBlend {
    fn blend(&self, original: [u8; 3], color: [u8; 3], distance: f32, thickness: u32) -> Option<[u8; 3]> {
        let alpha = 255.0 * (1.0 - distance / thickness as f32) * GLOW_STRENGTH;
        (alpha > 0.0).then(|| lerp_rgb(original, color, alpha / 255.0))
    }
}

impl OutlineStyle {
    pub fn blender(&self) -> &'static dyn OutlineBlender {
        match self {
            Self::Solid => &SolidBlend,
            Self::Gradient => &GradientBlend,
            Self::Glow => &GlowBlend,
        }
    }
}

/// Move each channel of `from` towards `to` by `t` in `0..=1`
#[inline]
pub fn lerp_rgb(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let mix = |a: u8, b: u8| {
        let a = a as f32;
        (a + (b as f32 - a) * t).round().clamp(0.0, 255.0) as u8
    };
    [mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2])]
}

/// Paints the outline band described by a distance field onto an image
pub struct OutlineCompositor<'a> {
    pub exterior: &'a ExteriorMask,
    pub field: &'a DistanceField,
    pub edits: EditMask<'a>,
}

impl OutlineCompositor<'_> {
    /// Indices inside the band that no edit suppresses, row-major
    pub fn candidates(&self) -> impl Iterator<Item = usize> + '_ {
        let width = self.exterior.width();
        (0..self.exterior.len()).filter(move |&idx| {
            if !self.exterior.get(idx) || !self.field.within(idx) {
                return false;
            }
            let x = (idx % width as usize) as u32;
            let y = (idx / width as usize) as u32;
            !self.edits.suppresses(idx, x, y)
        })
    }

    /// Indices whose color the given style would change
    pub fn painted(&self, style: OutlineStyle) -> Vec<usize> {
        let blender = style.blender();
        let thickness = self.field.thickness;
        self.candidates()
            .filter(|&idx| blender.blend([0; 3], [0; 3], self.field.get(idx), thickness).is_some())
            .collect()
    }

    /// Fresh copy of `image` with the outline blended in. Alpha is untouched.
    pub fn composite(&self, image: &RasterBuffer, color: [u8; 3], style: OutlineStyle) -> RasterBuffer {
        let mut output = image.clone();
        let blender = style.blender();
        let thickness = self.field.thickness;
        let width = image.width() as usize;
        let mut painted = 0usize;

        for idx in self.candidates() {
            let x = (idx % width) as u32;
            let y = (idx / width) as u32;
            let Rgba([r, g, b, a]) = *output.get_pixel(x, y);
            if let Some([r, g, b]) = blender.blend([r, g, b], color, self.field.get(idx), thickness) {
                output.put_pixel(x, y, Rgba([r, g, b, a]));
                painted += 1;
            }
        }

        debug!(painted, %style, thickness, "outline composited");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_ignores_distance() {
        assert_eq!(SolidBlend.blend([1, 2, 3], [9, 9, 9], 5.0, 5), Some([9, 9, 9]));
    }

    #[test]
    fn test_gradient_fades_and_cuts_off() {
        // thickness 4: alpha = 255 * (1 - d / 5)
        assert_eq!(GradientBlend.blend([0, 0, 0], [255, 0, 0], 0.0, 4), Some([255, 0, 0]));
        assert_eq!(GradientBlend.blend([0, 0, 0], [255, 0, 0], 2.0, 4), Some([153, 0, 0]));
        // d = 4 gives alpha 51, just above the cutoff
        assert_eq!(GradientBlend.blend([0, 0, 0], [255, 0, 0], 4.0, 4), Some([51, 0, 0]));
        // thickness 3, d = 3: alpha 63.75
        assert!(GradientBlend.blend([0, 0, 0], [255, 0, 0], 3.0, 3).is_some());
        // thickness 1, d = 1: alpha 127.5
        assert!(GradientBlend.blend([0, 0, 0], [255, 0, 0], 1.0, 1).is_some());
    }

    #[test]
    fn test_gradient_drops_faint_tail() {
        // thickness 9, d = 9: alpha 25.5
        assert_eq!(GradientBlend.blend([0, 0, 0], [255, 255, 255], 9.0, 9), None);
    }

    #[test]
    fn test_glow_is_capped_and_zero_at_edge() {
        assert_eq!(GlowBlend.blend([0, 0, 0], [255, 255, 255], 0.0, 4), Some([204, 204, 204]));
        assert_eq!(GlowBlend.blend([0, 0, 0], [255, 255, 255], 4.0, 4), None);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb([10, 20, 30], [200, 100, 0], 0.0), [10, 20, 30]);
        assert_eq!(lerp_rgb([10, 20, 30], [200, 100, 0], 1.0), [200, 100, 0]);
        assert_eq!(lerp_rgb([0, 0, 0], [255, 255, 255], 0.5), [128, 128, 128]);
    }
}
