use thiserror::Error;

/// Errors surfaced in a field's error slot
///
/// The `Display` text is what the user sees. `DecodeFailure` keeps the
/// failing file and cause for the log only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// At least one file in the batch is larger than the configured limit
    #[error("File size cannot exceed {limit_mb}MB.")]
    SizeLimitExceeded { limit_mb: u64 },

    /// A file could not be read while encoding the batch
    #[error("An error occurred while reading the file.")]
    DecodeFailure { file: String, reason: String },
}

impl IntakeError {
    pub(crate) fn decode_failure(file: &str, reason: impl ToString) -> Self {
        IntakeError::DecodeFailure {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors from parsing a `data:` URI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,

    #[error("data URI has no payload separator")]
    MissingComma,

    #[error("only base64 data URIs are supported")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}
