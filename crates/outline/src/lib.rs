//! # Mask Outline Library
//!
//! Draws a variable-thickness outline around the foreground subject of an
//! image, given an alpha mask for that subject (typically the output of a
//! segmentation model), and supports interactive edits of the result.
//!
//! ## Stages
//!
//! - **Threshold + filters**: alpha `> 128` becomes foreground; by default
//!   only the largest 4-connected component survives
//! - **Exterior classification**: background reachable from the border, so
//!   holes inside the subject never receive outline
//! - **Boundary extraction**: exterior pixels touching the subject
//! - **Distance field**: bounded BFS out to the outline thickness
//! - **Compositing**: solid, gradient or glow blending, skipping erased and
//!   excluded pixels
//!
//! The first three stages are cached per mask in a [`BoundaryCache`]; style,
//! thickness and edits only re-run the last two.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outline::{EditSession, OutlineStyle, OutlineStyleConfig};
//!
//! let image = image::open("photo.png")?.to_rgba8();
//! let mask = image::open("mask.png")?.to_rgba8();
//!
//! let mut session = EditSession::with_mask(image, mask)?;
//! let style = OutlineStyleConfig::new([255, 255, 255], 12, OutlineStyle::Glow);
//! session.set_style(style);
//!
//! // Drop the outline segment under a click, then render
//! session.apply_exclude(40.0, 310.0);
//! session.render_current().save("outlined.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod cache;
pub mod pipeline;
pub mod session;
pub mod comparison;

// Re-exports for convenience
pub use error::{OutlineError, Result};
pub use types::*;
pub use traits::*;
pub use algorithms::*;
pub use cache::{BoundaryCache, MaskKey};
pub use pipeline::{OutlinePipeline, builder::PipelineBuilder};
pub use session::{EditCommand, EditSession, ToolMode};
pub use comparison::{compose_comparison, ComparisonLayout, ComparisonOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;

    const BASE: Rgba<u8> = Rgba([100, 120, 140, 255]);
    const RED: [u8; 3] = [255, 0, 0];

    fn canvas(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, BASE)
    }

    fn mask_where(width: u32, height: u32, inside: impl Fn(u32, u32) -> bool) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if inside(x, y) { Rgba([0, 0, 0, 255]) } else { Rgba([0, 0, 0, 0]) }
        })
    }

    fn changed(before: &RgbaImage, after: &RgbaImage) -> HashSet<(u32, u32)> {
        before
            .enumerate_pixels()
            .filter(|(x, y, p)| after.get_pixel(*x, *y) != *p)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    fn square_session() -> EditSession {
        let mask = mask_where(10, 10, |x, y| (3..=6).contains(&x) && (3..=6).contains(&y));
        EditSession::with_mask(canvas(10, 10), mask).expect("Should build session")
    }

    #[test]
    fn test_square_scenario() {
        let session = square_session();
        let cache = session.cache().expect("Should have cache");
        assert_eq!(cache.boundary.len(), 16);

        let field = cache.distance_field(2);
        for idx in cache.boundary.iter() {
            assert_eq!(field.get(idx), 0.0);
        }

        let style = OutlineStyleConfig::new(RED, 2, OutlineStyle::Solid);
        let output = session.render(&style);
        for (x, y, pixel) in output.enumerate_pixels() {
            let dx = 3u32.saturating_sub(x).max(x.saturating_sub(6));
            let dy = 3u32.saturating_sub(y).max(y.saturating_sub(6));
            let steps = dx + dy;
            if (1..=3).contains(&steps) {
                assert_eq!(pixel, &Rgba([255, 0, 0, 255]), "Outline at ({x}, {y})");
                assert_eq!(field.get(cache.foreground.index_of(x, y)), (steps - 1) as f32);
            } else {
                assert_eq!(pixel, &BASE, "Untouched at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut session = square_session();
        session.apply_erase(2.0, 4.0, 1.0);
        for style in [OutlineStyle::Solid, OutlineStyle::Gradient, OutlineStyle::Glow] {
            let config = OutlineStyleConfig::new(RED, 3, style);
            assert_eq!(session.render(&config).as_raw(), session.render(&config).as_raw());
        }
    }

    #[test]
    fn test_thickness_is_monotonic() {
        let mask = mask_where(40, 40, |x, y| {
            let (dx, dy) = (x as f32 - 20.0, y as f32 - 18.0);
            dx * dx / 64.0 + dy * dy / 25.0 <= 1.0 || ((18..=22).contains(&x) && (18..=30).contains(&y))
        });
        let session = EditSession::with_mask(canvas(40, 40), mask).expect("Should build session");

        for style in [OutlineStyle::Solid, OutlineStyle::Gradient, OutlineStyle::Glow] {
            let mut previous: HashSet<usize> = HashSet::new();
            for thickness in 1..=8 {
                let painted: HashSet<usize> = session
                    .painted_pixels(&OutlineStyleConfig::new(RED, thickness, style))
                    .into_iter()
                    .collect();
                assert!(previous.is_subset(&painted), "{style} at thickness {thickness}");
                previous = painted;
            }
        }
    }

    #[test]
    fn test_annulus_hole_never_painted() {
        let ring = |x: u32, y: u32| {
            let (dx, dy) = (x as f32 - 10.0, y as f32 - 10.0);
            let d2 = dx * dx + dy * dy;
            (16.0..=64.0).contains(&d2)
        };
        let hole = |x: u32, y: u32| {
            let (dx, dy) = (x as f32 - 10.0, y as f32 - 10.0);
            dx * dx + dy * dy < 16.0
        };
        let session = EditSession::with_mask(canvas(20, 20), mask_where(20, 20, ring))
            .expect("Should build session");

        for thickness in [1, 3, 10, 100] {
            for style in [OutlineStyle::Solid, OutlineStyle::Gradient, OutlineStyle::Glow] {
                let output = session.render(&OutlineStyleConfig::new(RED, thickness, style));
                for (x, y) in changed(session.image(), &output) {
                    assert!(!hole(x, y), "Hole pixel ({x}, {y}) painted");
                    assert!(!ring(x, y), "Subject pixel ({x}, {y}) painted");
                }
            }
        }
    }

    #[test]
    fn test_only_largest_component_outlined() {
        // 10x5 = 50 pixels on the left, 4x3 = 12 pixels on the right
        let big = |x: u32, y: u32| (2..12).contains(&x) && (5..10).contains(&y);
        let small = |x: u32, y: u32| (30..34).contains(&x) && (5..8).contains(&y);
        let mask = mask_where(40, 15, |x, y| big(x, y) || small(x, y));
        let session = EditSession::with_mask(canvas(40, 15), mask).expect("Should build session");

        let cache = session.cache().expect("Should have cache");
        assert_eq!(cache.foreground.count_set(), 50);

        let output = session.render(&OutlineStyleConfig::new(RED, 2, OutlineStyle::Solid));
        let painted = changed(session.image(), &output);
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|&(x, _)| x < 20), "Small blob must not be outlined");
    }

    #[test]
    fn test_erase_is_local() {
        let mut session = square_session();
        let style = OutlineStyleConfig::new(RED, 2, OutlineStyle::Solid);
        let full = changed(session.image(), &session.render(&style));

        session.apply_erase(4.0, 1.0, 1.5);
        let erased = changed(session.image(), &session.render(&style));

        for &(x, y) in &full {
            let (dx, dy) = (x as f32 - 4.0, y as f32 - 1.0);
            let inside = dx * dx + dy * dy <= 1.5 * 1.5;
            assert_eq!(erased.contains(&(x, y)), !inside, "at ({x}, {y})");
        }
        assert!(erased.len() < full.len());
    }

    #[test]
    fn test_exclude_removes_one_segment() {
        // A "C" opening to the right, and a dot far away
        let c_shape = |x: u32, y: u32| {
            let bar = (4..7).contains(&x) && (4..20).contains(&y);
            let top = (4..14).contains(&x) && (4..7).contains(&y);
            let bottom = (4..14).contains(&x) && (17..20).contains(&y);
            bar || top || bottom
        };
        let dot = |x: u32, y: u32| (30..32).contains(&x) && (10..12).contains(&y);
        let pipeline = OutlinePipeline::builder().keep_all_components().build();
        let mut session = EditSession::with_pipeline(canvas(40, 24), pipeline);
        session
            .set_mask(mask_where(40, 24, |x, y| c_shape(x, y) || dot(x, y)))
            .expect("Should accept mask");

        let style = OutlineStyleConfig::new(RED, 2, OutlineStyle::Solid);
        session.set_style(style);
        let before = changed(session.image(), &session.render_current());
        let near_dot = |&(x, _): &(u32, u32)| x >= 25;
        let dot_outline: HashSet<_> = before.iter().copied().filter(near_dot).collect();
        assert!(!dot_outline.is_empty());

        // Click just left of the C's spine
        assert!(session.apply_exclude(3.0, 10.0) > 0);
        let after = changed(session.image(), &session.render_current());
        assert_eq!(after, dot_outline);
    }

    #[test]
    fn test_empty_mask_passes_through() {
        let session = EditSession::with_mask(canvas(8, 8), RgbaImage::new(8, 8)).expect("Should build session");
        assert!(!session.has_foreground());
        let output = session.render(&OutlineStyleConfig::new(RED, 5, OutlineStyle::Glow));
        assert_eq!(&output, session.image());
    }

    #[test]
    fn test_disabled_style_passes_through() {
        let session = square_session();
        let mut style = OutlineStyleConfig::new(RED, 2, OutlineStyle::Solid);
        style.enabled = false;
        assert_eq!(&session.render(&style), session.image());
        assert!(session.painted_pixels(&style).is_empty());
    }

    #[test]
    fn test_alpha_channel_untouched() {
        let image = RgbaImage::from_fn(10, 10, |x, y| Rgba([50, 50, 50, (x * 10 + y) as u8]));
        let mask = mask_where(10, 10, |x, y| (3..=6).contains(&x) && (3..=6).contains(&y));
        let session = EditSession::with_mask(image.clone(), mask).expect("Should build session");

        let output = session.render(&OutlineStyleConfig::new(RED, 3, OutlineStyle::Gradient));
        for (x, y, pixel) in output.enumerate_pixels() {
            assert_eq!(pixel[3], image.get_pixel(x, y)[3]);
        }
        assert_ne!(output, image);
    }

    #[test]
    fn test_pipeline_render_checks_dimensions() {
        let pipeline = OutlinePipeline::default();
        let mask = MaskSource::from(mask_where(10, 10, |x, _| x > 5));
        let cache = pipeline.prepare(&mask).expect("Should prepare");
        let excluded = ExcludedRegion::default();
        let edits = EditMask {
            strokes: &[],
            excluded: &excluded,
        };

        let err = pipeline
            .render(&cache, &canvas(12, 10), &OutlineStyleConfig::default(), edits)
            .unwrap_err();
        assert!(matches!(err, OutlineError::DimensionMismatch { .. }));
        assert!(pipeline.render(&cache, &canvas(10, 10), &OutlineStyleConfig::default(), edits).is_ok());
    }
}
