use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlobeError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GlobeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("pixel ({u}, {v}) is outside a {width}x{height} buffer")]
    IndexOutOfRange {
        u: u32,
        v: u32,
        width: u32,
        height: u32,
    },

    #[error("no points to search")]
    EmptyInput,

    #[error("rotation is undefined for zero-length or non-finite vectors")]
    DegenerateRotation,
}

impl GlobeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
