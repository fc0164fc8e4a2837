use alloc::string::String;
use enough::StopReason;

/// Errors from quantization, plane packing and container framing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlaneError {
    #[error("unsupported source bit depth: {bpp} bpp")]
    UnsupportedBitDepth { bpp: u8 },

    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    #[error("unrecognized container marker: {marker:#06x}")]
    InvalidContainer { marker: u16 },

    #[error("invalid hex literal: {0}")]
    InvalidHexLiteral(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for PlaneError {
    fn from(r: StopReason) -> Self {
        PlaneError::Cancelled(r)
    }
}
