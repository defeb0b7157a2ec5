//! Error type shared by dictionary construction, queries and generation.

/// Errors returned by dictionary operations.
#[derive(thiserror::Error, Debug)]
pub enum DictionaryError {
    #[error("marker size must be > 0")]
    InvalidMarkerSize,
    #[error("marker count must be > 0")]
    InvalidMarkerCount,
    #[error("bit grid side {got} does not match dictionary marker size {expected}")]
    GridSizeMismatch { expected: usize, got: usize },
    #[error("marker id {id} out of range (dictionary holds {len} markers)")]
    IdOutOfRange { id: u32, len: usize },
    #[error("max correction rate {rate} outside [0, 1]")]
    InvalidCorrectionRate { rate: f64 },
    #[error("side of {side_pixels} px cannot fit {cells} cells at one pixel per cell")]
    SidePixelsTooSmall { side_pixels: usize, cells: usize },
    #[error("byte buffer of {len} bytes is not a whole number of {stride}-byte markers")]
    InvalidByteBuffer { len: usize, stride: usize },
    #[error("byte code of {len} bytes, expected {expected} for marker size {marker_size}")]
    InvalidByteCode {
        len: usize,
        expected: usize,
        marker_size: usize,
    },
    #[error("base dictionary marker size {base} differs from requested size {requested}")]
    BaseSizeMismatch { base: usize, requested: usize },
    #[error("unknown predefined dictionary name: {name}")]
    UnknownName { name: String },
}
