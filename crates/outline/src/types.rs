use std::collections::HashSet;

use image::{GrayImage, RgbaImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::error::{OutlineError, Result};

/// RGBA pixels, row-major, `idx = y * width + x`
pub type RasterBuffer = RgbaImage;

pub const MIN_THICKNESS: u32 = 1;
pub const MAX_THICKNESS: u32 = 100;

/// The alpha plane a foreground mask is derived from.
///
/// Either an RGBA buffer whose alpha channel is the mask (a segmentation
/// result, or an already-transparent cut-out) or a standalone single-channel
/// array.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSource {
    Rgba(RgbaImage),
    Alpha(GrayImage),
}

impl MaskSource {
    /// Wrap a raw single-channel alpha array
    pub fn from_raw_alpha(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        let actual = data.len();
        GrayImage::from_raw(width, height, data)
            .map(Self::Alpha)
            .ok_or(OutlineError::InvalidBuffer { expected, actual })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Rgba(image) => image.dimensions(),
            Self::Alpha(image) => image.dimensions(),
        }
    }

    /// Copy the alpha values out into a single-channel plane
    pub fn alpha_plane(&self) -> GrayImage {
        match self {
            Self::Alpha(image) => image.clone(),
            Self::Rgba(image) => {
                let (width, height) = image.dimensions();
                let alpha = image.pixels().map(|p| p[3]).collect();
                // Length is width * height by construction
                GrayImage::from_raw(width, height, alpha).unwrap_or_else(|| GrayImage::new(width, height))
            }
        }
    }
}

impl From<RgbaImage> for MaskSource {
    fn from(image: RgbaImage) -> Self {
        Self::Rgba(image)
    }
}

impl From<GrayImage> for MaskSource {
    fn from(image: GrayImage) -> Self {
        Self::Alpha(image)
    }
}

/// A `{0,1}` per-pixel mask. Used both for the foreground subject and for the
/// exterior background classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

pub type ForegroundMask = BinaryMask;
pub type ExteriorMask = BinaryMask;

impl BinaryMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Build from `{0,1}` values; anything non-zero counts as set
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(OutlineError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }
        let data = data.into_iter().map(|v| u8::from(v != 0)).collect();
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        self.data[idx] != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        self.data[idx] = u8::from(value);
    }

    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Exterior background pixels touching the foreground, row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryPixels(pub Vec<usize>);

impl BoundaryPixels {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Step distance from the boundary, `f32::INFINITY` where unreached.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
    pub data: Vec<f32>,
}

impl DistanceField {
    #[inline]
    pub fn get(&self, idx: usize) -> f32 {
        self.data[idx]
    }

    /// Whether `idx` lies inside the painted band
    #[inline]
    pub fn within(&self, idx: usize) -> bool {
        self.data[idx] <= self.thickness as f32
    }

    pub fn reached(&self) -> usize {
        self.data.iter().filter(|d| d.is_finite()).count()
    }
}

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutlineStyle {
    /// Flat outline color
    #[default]
    Solid,
    /// Fades out with distance from the subject
    Gradient,
    /// Softer fade, never fully opaque
    Glow,
}

/// Outline appearance for one image. Independent per side of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OutlineStyleConfig {
    pub enabled: bool,
    /// RGB outline color
    pub color: [u8; 3],
    /// Outline width in pixels, clamped to `1..=100` when rendering
    #[schemars(range(min = 1, max = 100))]
    pub thickness: u32,
    pub style: OutlineStyle,
}

impl Default for OutlineStyleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: [255, 255, 255],
            thickness: 10,
            style: OutlineStyle::Solid,
        }
    }
}

impl OutlineStyleConfig {
    pub fn new(color: [u8; 3], thickness: u32, style: OutlineStyle) -> Self {
        Self {
            enabled: true,
            color,
            thickness,
            style,
        }
    }

    /// Thickness clamped into the supported range
    pub fn clamped_thickness(&self) -> u32 {
        let clamped = self.thickness.clamp(MIN_THICKNESS, MAX_THICKNESS);
        if clamped != self.thickness {
            tracing::warn!(
                requested = self.thickness,
                clamped,
                "outline thickness out of range, clamping"
            );
        }
        clamped
    }
}

/// Circular eraser brush in mask pixel coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ErasedStroke {
    pub center_x: f32,
    pub center_y: f32,
    #[schemars(range(min = 0.0))]
    pub radius: f32,
}

impl ErasedStroke {
    pub fn new(center_x: f32, center_y: f32, radius: f32) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    #[inline]
    pub fn covers(&self, x: u32, y: u32) -> bool {
        let dx = x as f32 - self.center_x;
        let dy = y as f32 - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Pixel indices removed from the outline by click-to-exclude
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedRegion {
    pixels: HashSet<usize>,
}

impl ExcludedRegion {
    pub fn contains(&self, idx: usize) -> bool {
        self.pixels.contains(&idx)
    }

    pub fn extend<I: IntoIterator<Item = usize>>(&mut self, pixels: I) {
        self.pixels.extend(pixels);
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn clear(&mut self) {
        self.pixels.clear();
    }
}

/// Everything the compositor must leave alone
#[derive(Debug, Clone, Copy)]
pub struct EditMask<'a> {
    pub strokes: &'a [ErasedStroke],
    pub excluded: &'a ExcludedRegion,
}

impl EditMask<'_> {
    /// Whether pixel `idx` at `(x, y)` has been erased or excluded
    #[inline]
    pub fn suppresses(&self, idx: usize, x: u32, y: u32) -> bool {
        self.excluded.contains(idx) || self.strokes.iter().any(|s| s.covers(x, y))
    }
}
