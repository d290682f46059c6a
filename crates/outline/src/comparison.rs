use image::{imageops, Rgba};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::types::RasterBuffer;

/// How the two sides of a before/after comparison are arranged
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComparisonLayout {
    #[default]
    SideBySide,
    Stacked,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ComparisonOptions {
    pub layout: ComparisonLayout,
    /// Pixels between the two sides
    pub gap: u32,
    /// RGBA fill for the gap and any uncovered area
    pub background: [u8; 4],
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            layout: ComparisonLayout::SideBySide,
            gap: 0,
            background: [0, 0, 0, 0],
        }
    }
}

/// Place two independently rendered sides on one canvas, `before` first.
/// Sides of different sizes are aligned to the top-left of their slot.
pub fn compose_comparison(before: &RasterBuffer, after: &RasterBuffer, options: &ComparisonOptions) -> RasterBuffer {
    let (bw, bh) = before.dimensions();
    let (aw, ah) = after.dimensions();

    let (width, height, offset) = match options.layout {
        ComparisonLayout::SideBySide => (bw + options.gap + aw, bh.max(ah), (bw + options.gap, 0)),
        ComparisonLayout::Stacked => (bw.max(aw), bh + options.gap + ah, (0, bh + options.gap)),
    };

    let mut canvas = RasterBuffer::from_pixel(width, height, Rgba(options.background));
    imageops::replace(&mut canvas, before, 0, 0);
    imageops::replace(&mut canvas, after, offset.0 as i64, offset.1 as i64);
    canvas
}
