//! Response models for the publisher API.
//!
//! Publishers themselves are serialized straight from
//! [`Publisher`](crate::domain::Publisher); this module holds the envelopes
//! around them:
//!
//! - [`ErrorResponse`] is the JSON body of every 4xx/5xx response that has one
//! - [`HealthResponse`] is returned by `GET /management/health`
//!
//! An error body for a rejected create looks like:
//!
//! ```json
//! {
//!   "code": "BAD_REQUEST_ALERT",
//!   "message": "A new publisher cannot already have an ID",
//!   "entityName": "publisher",
//!   "errorKey": "idexists"
//! }
//! ```

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

/// One violated constraint on an input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: &'static str,
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
}
