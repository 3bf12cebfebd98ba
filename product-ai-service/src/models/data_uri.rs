//! Parsing for `data:<mime>;base64,<payload>` URIs carrying product photos.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("must start with 'data:'")]
    MissingScheme,

    #[error("must contain a ',' separating the header from the payload")]
    MissingPayloadSeparator,

    #[error("must declare base64 encoding (data:<mime>;base64,...)")]
    NotBase64,

    #[error("must declare a MIME type such as image/png")]
    MissingMimeType,

    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload is not valid base64")]
    InvalidPayload,

    #[error("must be an image, got {0}")]
    NotAnImage(String),
}

/// A validated base64 data URI. The payload is kept encoded, ready to be
/// forwarded as inline data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: String,
}

impl DataUri {
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let rest = input
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(DataUriError::MissingPayloadSeparator)?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(DataUriError::NotBase64);
        }
        if mime_type.is_empty() || !mime_type.contains('/') {
            return Err(DataUriError::MissingMimeType);
        }

        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        STANDARD
            .decode(payload)
            .map_err(|_| DataUriError::InvalidPayload)?;

        Ok(Self {
            mime_type,
            data: payload.to_string(),
        })
    }

    /// Parse and additionally require an `image/*` MIME type.
    pub fn parse_image(input: &str) -> Result<Self, DataUriError> {
        let uri = Self::parse(input)?;
        if !uri.mime_type.starts_with("image/") {
            return Err(DataUriError::NotAnImage(uri.mime_type));
        }
        Ok(uri)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload, as received.
    pub fn data(&self) -> &str {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_png_data_uri() {
        let uri = DataUri::parse_image("data:image/png;base64,AAAA").unwrap();
        assert_eq!(uri.mime_type(), "image/png");
        assert_eq!(uri.data(), "AAAA");
    }

    #[test]
    fn accepts_extra_parameters_before_base64_marker() {
        let uri = DataUri::parse_image("data:image/jpeg;name=mug.jpg;base64,/9j/").unwrap();
        assert_eq!(uri.mime_type(), "image/jpeg");
    }

    #[test]
    fn rejects_missing_scheme() {
        assert_eq!(
            DataUri::parse("image/png;base64,AAAA"),
            Err(DataUriError::MissingScheme)
        );
    }

    #[test]
    fn rejects_plain_text_encoding() {
        assert_eq!(
            DataUri::parse("data:image/png,AAAA"),
            Err(DataUriError::NotBase64)
        );
    }

    #[test]
    fn rejects_missing_mime_type() {
        assert_eq!(
            DataUri::parse("data:;base64,AAAA"),
            Err(DataUriError::MissingMimeType)
        );
    }

    #[test]
    fn rejects_bad_payloads() {
        assert_eq!(
            DataUri::parse("data:image/png;base64,"),
            Err(DataUriError::EmptyPayload)
        );
        assert_eq!(
            DataUri::parse("data:image/png;base64,not base64!"),
            Err(DataUriError::InvalidPayload)
        );
    }

    #[test]
    fn rejects_non_image_for_image_parse() {
        assert_eq!(
            DataUri::parse_image("data:text/plain;base64,AAAA"),
            Err(DataUriError::NotAnImage("text/plain".to_string()))
        );
    }
}
