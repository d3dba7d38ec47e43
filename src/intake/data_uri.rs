use base64::{engine::general_purpose::STANDARD, Engine};

use super::error::DataUriError;

/// Encode raw bytes as `data:<mime>;base64,<payload>`
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// A parsed base64 data URI, borrowing from the source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// Split a data URI into MIME type and base64 payload
    ///
    /// Media type parameters other than `base64` (e.g. `charset=utf-8`)
    /// are accepted and dropped.
    pub fn parse(input: &'a str) -> Result<Self, DataUriError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingComma)?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(DataUriError::NotBase64);
        }

        Ok(DataUri { mime_type, payload })
    }

    /// Decode the payload back to bytes
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))
    }
}
