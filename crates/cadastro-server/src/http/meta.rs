// SPDX-License-Identifier: Apache-2.0

use super::{data_response, propagated_request_id, with_request_id};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use cadastro_api::API_VERSION;
use cadastro_model::KNOWN_CATEGORIES;
use serde_json::json;

pub(crate) async fn healthz_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    with_request_id((StatusCode::OK, "ok").into_response(), &request_id)
}

pub(crate) async fn version_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = data_response(
        StatusCode::OK,
        json!({
            "api_version": API_VERSION,
            "crate_version": env!("CARGO_PKG_VERSION"),
        }),
    );
    with_request_id(resp, &request_id)
}

pub(crate) async fn categories_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = data_response(StatusCode::OK, json!({"items": KNOWN_CATEGORIES}));
    with_request_id(resp, &request_id)
}
