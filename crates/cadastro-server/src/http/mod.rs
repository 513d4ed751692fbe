// SPDX-License-Identifier: Apache-2.0

pub(crate) mod associations;
pub(crate) mod meta;
pub(crate) mod products;
pub(crate) mod suppliers;

use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cadastro_api::{ApiError, ApiErrorCode};
use cadastro_store::StoreError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::Ordering;

/// Bounds every request at the configured duration; slow work answers 408
/// instead of holding the connection open.
pub(crate) async fn timeout_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let deadline = state.api.request_timeout;
    match tokio::time::timeout(deadline, next.run(req)).await {
        Ok(resp) => resp,
        Err(_) => {
            tracing::warn!(timeout_ms = deadline.as_millis() as u64, "request timed out");
            api_error_response(&ApiError::new(
                ApiErrorCode::Timeout,
                "request timed out",
                serde_json::json!({"timeout_ms": deadline.as_millis() as u64}),
            ))
        }
    }
}

pub(crate) fn api_error_response(err: &ApiError) -> Response {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": err}))).into_response()
}

pub(crate) fn data_response(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({"data": data}))).into_response()
}

/// Store rejections carry their own classification; this is a 1:1 recode
/// into the wire taxonomy.
pub(crate) fn store_error(err: &StoreError) -> ApiError {
    match err {
        StoreError::DuplicateIdentifier { field, value } => {
            ApiError::duplicate_identifier(field, value)
        }
        StoreError::DuplicateAssociation {
            supplier_id,
            product_id,
        } => ApiError::duplicate_association(*supplier_id, *product_id),
        StoreError::NotFound { entity, id } => ApiError::not_found(entity, *id),
        StoreError::Internal(msg) => {
            tracing::error!(error = %msg, "store failure");
            ApiError::internal("store failure")
        }
        _ => ApiError::internal("unclassified store failure"),
    }
}

pub(crate) fn with_request_id(mut resp: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn page_params(params: &HashMap<String, String>, state: &AppState) -> (usize, usize) {
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .map_or(state.api.default_page_size, |v| {
            v.clamp(1, state.api.max_page_size)
        });
    let offset = params
        .get("offset")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    (limit, offset)
}

pub(crate) fn parse_row_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        ApiError::invalid_payload(json!([{"field": "id", "reason": "must be an integer", "value": raw}]))
    })
}

pub(crate) fn reject_empty_update(is_empty: bool) -> Result<(), ApiError> {
    if is_empty {
        return Err(ApiError::invalid_payload(
            json!([{"field": "body", "reason": "no fields to update"}]),
        ));
    }
    Ok(())
}

pub(crate) fn require_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => Err(ApiError::invalid_payload(
            json!([{"field": "body", "reason": rejection.to_string()}]),
        )),
    }
}

pub(crate) fn list_envelope<T: serde::Serialize>(
    items: &[T],
    limit: usize,
    offset: usize,
) -> Value {
    json!({
        "items": items,
        "stats": {
            "limit": limit,
            "offset": offset,
            "returned": items.len()
        }
    })
}
