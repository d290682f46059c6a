use std::collections::VecDeque;

use tracing::debug;

use super::neighbors4;
use crate::types::{BoundaryPixels, DistanceField, ExteriorMask};

/// Bounded multi-source BFS from the boundary through exterior pixels.
///
/// Boundary pixels sit at `0`; every reached pixel holds its step count,
/// never more than `thickness`. Pixels farther away stay `INFINITY`. Work is
/// proportional to `boundary.len() * thickness`, not to the image size.
pub fn compute_distance_field(
    exterior: &ExteriorMask,
    boundary: &BoundaryPixels,
    thickness: u32,
) -> DistanceField {
    let width = exterior.width() as usize;
    let height = exterior.height() as usize;
    let limit = thickness as f32;

    let mut data = vec![f32::INFINITY; exterior.len()];
    let mut queue = VecDeque::with_capacity(boundary.len() * 2);
    for idx in boundary.iter() {
        data[idx] = 0.0;
        queue.push_back(idx);
    }

    while let Some(idx) = queue.pop_front() {
        let d = data[idx];
        if d >= limit {
            continue;
        }
        let next = d + 1.0;
        for n in neighbors4(idx, width, height) {
            if exterior.get(n) && next < data[n] && next <= limit {
                data[n] = next;
                queue.push_back(n);
            }
        }
    }

    let field = DistanceField {
        width: exterior.width(),
        height: exterior.height(),
        thickness,
        data,
    };
    debug!(thickness, reached = field.reached(), "distance field computed");
    field
}
