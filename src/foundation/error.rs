use crate::foundation::core::ImageId;

/// Result alias used throughout the crate.
pub type GbufResult<T> = Result<T, GbufError>;

/// Errors produced while recording, decoding, rewriting or exporting an event log.
#[derive(thiserror::Error, Debug)]
pub enum GbufError {
    /// Fewer bytes remain than the record at `offset` declares.
    #[error("truncated record at byte {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Byte offset of the record (or field) that could not be read.
        offset: usize,
        /// Bytes required to complete the read.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },

    /// The tag byte at `offset` is not a known opcode.
    #[error("unknown opcode {opcode} at byte {offset}")]
    UnknownOpcode {
        /// Byte offset of the tag byte.
        offset: usize,
        /// The unrecognized tag.
        opcode: u8,
    },

    /// The header sentinel matched neither byte order.
    #[error("unsupported format version (raw bits {bits:#010x}) in header at byte {offset}")]
    UnsupportedVersion {
        /// Byte offset of the header record.
        offset: usize,
        /// Raw bits of the version field as read.
        bits: u32,
    },

    /// Growing the buffer or copying image pixels could not allocate.
    #[error("allocation of {requested} bytes failed")]
    AllocationFailure {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// An image record referenced an id that is not in the image table.
    #[error("image {} is not in the image table", .0.0)]
    MissingImage(ImageId),

    /// Invalid argument supplied by the caller.
    #[error("validation error: {0}")]
    Validation(String),

    /// File or writer failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF library rejected a document or content stream.
    #[error("pdf error: {0}")]
    Pdf(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GbufError {
    /// Build a [`GbufError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GbufError::Pdf`].
    pub fn pdf(msg: impl Into<String>) -> Self {
        Self::Pdf(msg.into())
    }

    /// Build a [`GbufError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that abort a whole decode pass.
    ///
    /// [`GbufError::MissingImage`] is the only decode-time error that callers skip over.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MissingImage(_))
    }
}

impl From<lopdf::Error> for GbufError {
    fn from(e: lopdf::Error) -> Self {
        Self::pdf(e.to_string())
    }
}

impl From<serde_json::Error> for GbufError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
