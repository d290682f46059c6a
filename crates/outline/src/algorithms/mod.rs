pub mod threshold;
pub mod components;
pub mod exterior;
pub mod boundary;
pub mod distance;
pub mod composite;
pub mod segment;

pub use threshold::*;
pub use components::*;
pub use exterior::*;
pub use boundary::*;
pub use distance::*;
pub use composite::*;
pub use segment::*;

/// 4-connected neighbors of `idx` that fall inside a `width` x `height` grid
#[inline]
pub(crate) fn neighbors4(idx: usize, width: usize, height: usize) -> impl Iterator<Item = usize> {
    let x = idx % width;
    let y = idx / width;
    [
        (x > 0).then(|| idx - 1),
        (x + 1 < width).then(|| idx + 1),
        (y > 0).then(|| idx - width),
        (y + 1 < height).then(|| idx + width),
    ]
    .into_iter()
    .flatten()
}
