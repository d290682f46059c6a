use super::neighbors4;
use crate::types::{DistanceField, ExteriorMask};

/// The 4-connected run of outline pixels containing `(x, y)`.
///
/// Empty when the point is off the image or not inside the painted band, so
/// a click that misses the outline selects nothing.
pub fn connected_segment(exterior: &ExteriorMask, field: &DistanceField, x: u32, y: u32) -> Vec<usize> {
    if x >= exterior.width() || y >= exterior.height() {
        return Vec::new();
    }

    let in_band = |idx: usize| exterior.get(idx) && field.within(idx);
    let start = exterior.index_of(x, y);
    if !in_band(start) {
        return Vec::new();
    }

    let width = exterior.width() as usize;
    let height = exterior.height() as usize;
    let mut visited = vec![false; exterior.len()];
    let mut stack = vec![start];
    let mut segment = Vec::new();
    visited[start] = true;

    while let Some(idx) = stack.pop() {
        segment.push(idx);
        for n in neighbors4(idx, width, height) {
            if !visited[n] && in_band(n) {
                visited[n] = true;
                stack.push(n);
            }
        }
    }

    segment
}
