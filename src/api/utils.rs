//! API utility functions
//!
//! Pure, stateless helper functions for HTTP request processing.

use axum::BoxError;
use http_body_util::LengthLimitError;

use crate::api::error::ApiError;

/// Media types accepted for a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `application/json`
    Json,
    /// `application/json` or `application/merge-patch+json`
    MergePatch,
}

/// Parses and validates the Content-Type header of a JSON request body
///
/// Accepts `application/json` (optionally with a charset parameter) and, for
/// [`BodyKind::MergePatch`], `application/merge-patch+json`.
///
/// Rejects `application/jsonp`, `application/json-patch+json`, `text/json`
/// and malformed media types.
pub fn parse_content_type(content_type: &str, kind: BodyKind) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    let is_json = media_type.type_() == mime::APPLICATION && media_type.subtype() == mime::JSON;
    let is_merge_patch = media_type.type_() == mime::APPLICATION
        && media_type.subtype() == "merge-patch"
        && media_type.suffix() == Some(mime::JSON);

    let accepted = match kind {
        BodyKind::Json => is_json,
        BodyKind::MergePatch => is_json || is_merge_patch,
    };
    if !accepted {
        return Err(ApiError::InvalidPayload(format!(
            "unsupported Content-Type: {}",
            media_type.essence_str()
        )));
    }

    Ok(media_type)
}

/// Classifies an error raised while reading a size-limited request body
///
/// Exceeding `limit` is a 413. Anything else (a truncated stream, a body that
/// fails to decompress) is the client's fault and becomes a 400.
pub fn body_read_error(err: BoxError, limit: usize) -> ApiError {
    if err.is::<LengthLimitError>() {
        ApiError::PayloadTooLarge(limit)
    } else {
        ApiError::InvalidPayload(format!("unreadable request body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_type_valid() {
        assert!(parse_content_type("application/json", BodyKind::Json).is_ok());
        assert!(parse_content_type("application/json; charset=utf-8", BodyKind::Json).is_ok());
        assert!(parse_content_type("application/json; charset=UTF-8", BodyKind::MergePatch).is_ok());
        assert!(parse_content_type("application/merge-patch+json", BodyKind::MergePatch).is_ok());
    }

    #[test]
    fn test_parse_content_type_invalid() {
        assert!(parse_content_type("application/merge-patch+json", BodyKind::Json).is_err());
        assert!(parse_content_type("application/jsonp", BodyKind::Json).is_err());
        assert!(parse_content_type("application/json-patch+json", BodyKind::MergePatch).is_err());
        assert!(parse_content_type("text/json", BodyKind::Json).is_err());
        assert!(parse_content_type("text/plain", BodyKind::MergePatch).is_err());
        assert!(parse_content_type("invalid", BodyKind::Json).is_err());
        assert!(parse_content_type("", BodyKind::Json).is_err());
    }

    #[test]
    fn test_body_read_error_over_limit() {
        // `LengthLimitError` has no public constructor; obtain one by
        // reading a body that exceeds its limit.
        use http_body_util::{BodyExt, Full, Limited};
        let body = Limited::new(Full::new(&b"too long"[..]), 1);
        let err: BoxError = futures::executor::block_on(body.collect()).unwrap_err();
        match body_read_error(err, 16) {
            ApiError::PayloadTooLarge(limit) => assert_eq!(limit, 16),
            other => panic!("Expected PayloadTooLarge error, got {:?}", other),
        }
    }

    #[test]
    fn test_body_read_error_is_client_error() {
        let err: BoxError = "Invalid gzip header".into();
        match body_read_error(err, 16) {
            ApiError::InvalidPayload(message) => assert!(message.contains("Invalid gzip header")),
            other => panic!("Expected InvalidPayload error, got {:?}", other),
        }
    }
}
