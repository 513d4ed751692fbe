// SPDX-License-Identifier: Apache-2.0

use super::{
    api_error_response, data_response, list_envelope, page_params, parse_row_id,
    propagated_request_id, require_body, store_error, with_request_id,
};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cadastro_api::AssociationPayload;
use cadastro_model::AssociationId;
use serde_json::json;
use std::collections::HashMap;
use tracing::info;

pub(crate) async fn list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let (limit, offset) = page_params(&params, &state);
    let result = state.store.lock().await.list_associations(limit, offset);
    let resp = match result {
        Ok(items) => data_response(StatusCode::OK, list_envelope(&items, limit, offset)),
        Err(e) => api_error_response(&store_error(&e)),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AssociationPayload>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/v1/associations", "create association");
    let record = match require_body(body) {
        Ok(payload) => payload.into_record(),
        Err(e) => return with_request_id(api_error_response(&e), &request_id),
    };
    let resp = match state.store.lock().await.create_association(&record) {
        Ok(association) => data_response(StatusCode::CREATED, json!(association)),
        Err(e) => api_error_response(&store_error(&e)),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/v1/associations/:id", "delete association");
    let id = match parse_row_id(&raw_id) {
        Ok(v) => AssociationId(v),
        Err(e) => return with_request_id(api_error_response(&e), &request_id),
    };
    let resp = match state.store.lock().await.delete_association(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => api_error_response(&store_error(&e)),
    };
    with_request_id(resp, &request_id)
}
