use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("animation bitmap length {0} is not a multiple of 8")]
    InvalidBitmapLength(usize),

    #[error("payload length {0} exceeds the 12-bit frame length field")]
    PayloadTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, CodecError>;
