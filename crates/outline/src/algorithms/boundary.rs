use super::neighbors4;
use crate::types::{BoundaryPixels, ExteriorMask, ForegroundMask};

/// Exterior pixels with at least one 4-neighbor in the foreground, in
/// row-major order.
pub fn extract_boundary(foreground: &ForegroundMask, exterior: &ExteriorMask) -> BoundaryPixels {
    let width = foreground.width() as usize;
    let height = foreground.height() as usize;

    let pixels = (0..foreground.len())
        .filter(|&idx| exterior.get(idx))
        .filter(|&idx| neighbors4(idx, width, height).any(|n| foreground.get(n)))
        .collect();

    BoundaryPixels(pixels)
}
