use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::LOCATION},
    response::IntoResponse,
};
use http_body_util::{BodyExt, Limited};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    headers::pagination_headers,
    models::HealthResponse,
    state::AppState,
    utils::BodyKind,
    validation::{PublisherValidationError, validate_patch, validate_publisher},
};
use crate::api::error::ApiError;
use crate::domain::{ENTITY_NAME, Pageable, Publisher, PublisherCriteria, PublisherPatch};

/// Base path of the publisher resource, used for `Location` headers
pub const RESOURCE_PATH: &str = "/api/publishers";

/// Create a publisher (POST /api/publishers)
///
/// Returns 201 with a `Location` header and the stored publisher, or 400
/// (`idexists`) when the body already carries an id.
pub async fn create_publisher(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let publisher: Publisher = read_json(&state, &headers, body, BodyKind::Json).await?;
    debug!(?publisher, "REST request to save Publisher");

    validate_publisher(&publisher).map_err(map_validation_error)?;
    if publisher.id.is_some() {
        return Err(ApiError::bad_request_alert(
            &state.alerts,
            "A new publisher cannot already have an ID",
            ENTITY_NAME,
            "idexists",
        ));
    }

    let result = state.publishers.save(publisher)?;
    let id = result
        .id
        .ok_or_else(|| ApiError::Internal("store returned publisher without id".to_string()))?;

    let mut response_headers = state.alerts.entity_created(ENTITY_NAME, &id.to_string());
    let location = HeaderValue::try_from(format!("{RESOURCE_PATH}/{id}"))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    response_headers.insert(LOCATION, location);

    state.metrics.publisher_created();

    Ok((StatusCode::CREATED, response_headers, Json(result)))
}

/// Update an existing publisher (PUT /api/publishers)
///
/// The body must carry the id of a stored publisher: 400 `idnull` without
/// one, 400 `idnotfound` when nothing is stored under it.
pub async fn update_publisher(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let publisher: Publisher = read_json(&state, &headers, body, BodyKind::Json).await?;
    debug!(?publisher, "REST request to update Publisher");

    validate_publisher(&publisher).map_err(map_validation_error)?;
    let Some(id) = publisher.id else {
        return Err(ApiError::bad_request_alert(
            &state.alerts,
            "Invalid id",
            ENTITY_NAME,
            "idnull",
        ));
    };
    if !state.publishers.exists(id)? {
        return Err(ApiError::bad_request_alert(
            &state.alerts,
            "Entity not found",
            ENTITY_NAME,
            "idnotfound",
        ));
    }

    let result = state.publishers.save(publisher)?;
    let response_headers = state.alerts.entity_updated(ENTITY_NAME, &id.to_string());

    state.metrics.publisher_updated();

    Ok((StatusCode::OK, response_headers, Json(result)))
}

/// Partially update a publisher (PATCH /api/publishers/{id})
///
/// Only the fields present in the body are changed. The body id must match
/// the path id.
pub async fn partial_update_publisher(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let patch: PublisherPatch = read_json(&state, &headers, body, BodyKind::MergePatch).await?;
    debug!(id, ?patch, "REST request to partial update Publisher");

    match patch.id {
        None => {
            return Err(ApiError::bad_request_alert(
                &state.alerts,
                "Invalid id",
                ENTITY_NAME,
                "idnull",
            ));
        }
        Some(body_id) if body_id != id => {
            return Err(ApiError::bad_request_alert(
                &state.alerts,
                "Invalid ID",
                ENTITY_NAME,
                "idinvalid",
            ));
        }
        Some(_) => {}
    }
    if !state.publishers.exists(id)? {
        return Err(ApiError::bad_request_alert(
            &state.alerts,
            "Entity not found",
            ENTITY_NAME,
            "idnotfound",
        ));
    }
    validate_patch(&patch).map_err(map_validation_error)?;

    // The record can disappear between the existence check and the merge
    let result = state
        .publishers
        .partial_update(id, patch)?
        .ok_or(ApiError::NotFound)?;
    let response_headers = state.alerts.entity_updated(ENTITY_NAME, &id.to_string());

    state.metrics.publisher_updated();

    Ok((StatusCode::OK, response_headers, Json(result)))
}

/// List publishers (GET /api/publishers)
///
/// Query parameters carry both the criteria (`name.contains=pen`) and the
/// page request (`page`, `size`, `sort`). The body is the page content;
/// `X-Total-Count` and `Link` describe the full result.
pub async fn list_publishers(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let pairs = || params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let criteria = PublisherCriteria::from_query_pairs(pairs())?;
    let pageable = Pageable::from_query_pairs(pairs(), state.config.pagination.limits())?;
    debug!(%criteria, "REST request to get Publishers by criteria");

    let page = state.publisher_queries.find_by_criteria(&criteria, &pageable)?;
    let response_headers = pagination_headers(uri.path(), &params, &page);

    Ok((StatusCode::OK, response_headers, Json(page.into_content())))
}

/// Count publishers (GET /api/publishers/count)
pub async fn count_publishers(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let criteria =
        PublisherCriteria::from_query_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    debug!(%criteria, "REST request to count Publishers by criteria");

    let count = state.publisher_queries.count_by_criteria(&criteria)?;

    Ok((StatusCode::OK, Json(count)))
}

/// Get one publisher (GET /api/publishers/{id})
///
/// Answers 404 without a body when the id is unknown.
pub async fn get_publisher(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id, "REST request to get Publisher");

    let publisher = state.publishers.find_one(id)?.ok_or(ApiError::NotFound)?;

    Ok((StatusCode::OK, Json(publisher)))
}

/// Delete a publisher (DELETE /api/publishers/{id})
///
/// Deleting an unknown id is not an error.
pub async fn delete_publisher(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id, "REST request to delete Publisher");

    state.publishers.delete(id)?;
    state.metrics.publisher_deleted();

    Ok((
        StatusCode::NO_CONTENT,
        state.alerts.entity_deleted(ENTITY_NAME, &id.to_string()),
    ))
}

/// Health check endpoint (GET /management/health)
///
/// Returns 503 Service Unavailable if the store cannot be read.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    use std::collections::HashMap;

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());

    let store_status = match state.store.stats() {
        Ok(stats) => {
            debug!(publishers = stats.publisher_count, next_id = stats.next_id, "Store healthy");
            "healthy"
        }
        Err(err) => {
            tracing::warn!(%err, "Store health check failed");
            "unhealthy"
        }
    };
    components.insert("store".to_string(), store_status.to_string());

    let all_healthy = components.values().all(|status| status == "healthy");
    let (status_code, overall_status) = if all_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}

fn map_validation_error(err: PublisherValidationError) -> ApiError {
    ApiError::Validation {
        entity_name: ENTITY_NAME,
        field_errors: vec![err.field_error()],
    }
}

/// Checks the content type, reads at most `max_body_bytes` of the body and
/// deserializes it
async fn read_json<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    body: axum::body::Body,
    kind: BodyKind,
) -> Result<T, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    super::utils::parse_content_type(content_type, kind)?;

    let limit = state.config.server.max_body_bytes;
    let data = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|err| super::utils::body_read_error(err, limit))?
        .to_bytes();

    Ok(serde_json::from_slice(&data)?)
}
