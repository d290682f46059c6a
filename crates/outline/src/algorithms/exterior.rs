use std::collections::VecDeque;

use super::neighbors4;
use crate::types::{ExteriorMask, ForegroundMask};

/// Marks background reachable from the image border without crossing
/// foreground. Unmarked background is an enclosed hole.
pub fn classify_exterior(foreground: &ForegroundMask) -> ExteriorMask {
    let (w, h) = foreground.dimensions();
    let mut exterior = ExteriorMask::new(w, h);
    if foreground.is_empty() {
        return exterior;
    }

    let width = w as usize;
    let height = h as usize;
    let mut queue = VecDeque::with_capacity(2 * (width + height));

    let seed = |idx: usize, exterior: &mut ExteriorMask, queue: &mut VecDeque<usize>| {
        if !foreground.get(idx) && !exterior.get(idx) {
            exterior.set(idx, true);
            queue.push_back(idx);
        }
    };

    for x in 0..width {
        seed(x, &mut exterior, &mut queue);
        seed((height - 1) * width + x, &mut exterior, &mut queue);
    }
    for y in 0..height {
        seed(y * width, &mut exterior, &mut queue);
        seed(y * width + width - 1, &mut exterior, &mut queue);
    }

    while let Some(idx) = queue.pop_front() {
        for n in neighbors4(idx, width, height) {
            if !foreground.get(n) && !exterior.get(n) {
                exterior.set(n, true);
                queue.push_back(n);
            }
        }
    }

    exterior
}
