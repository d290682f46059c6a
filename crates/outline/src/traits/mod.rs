use crate::{error::Result, types::ForegroundMask};

/// Trait for foreground mask clean-up stages (noise removal and the like)
pub trait MaskFilter: Send + Sync {
    /// Filter the thresholded mask in place
    fn filter(&self, mask: &mut ForegroundMask) -> Result<()>;

    /// Short human-readable name, used in pipeline descriptions
    fn name(&self) -> &'static str;
}

/// Trait for outline blending styles
pub trait OutlineBlender: Send + Sync {
    /// Blend `color` over `original` for a pixel `distance` steps from the
    /// subject. `None` leaves the pixel untouched.
    fn blend(&self, original: [u8; 3], color: [u8; 3], distance: f32, thickness: u32) -> Option<[u8; 3]>;
}
