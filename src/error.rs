use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Short read: requested {requested} samples, stream ended after {received}")]
    ShortRead { requested: usize, received: usize },
    #[error("Requested {requested} samples but the sample buffer only holds {capacity}")]
    BufferOverflow { requested: usize, capacity: usize },
    #[error("Fallback frame file is {len} bytes, expected a non-zero multiple of the frame size")]
    InvalidFallback { len: usize },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
