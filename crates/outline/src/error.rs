use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    #[error("Mask is {}x{} but image is {}x{}; dimensions must match", mask.0, mask.1, image.0, image.1)]
    DimensionMismatch {
        image: (u32, u32),
        mask: (u32, u32),
    },

    #[error("Raw buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, OutlineError>;
