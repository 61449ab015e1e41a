//! HTTP shim over the dispatcher.
//!
//! The shim owns no business logic: it converts the transport request into
//! an `ApiRequest`, runs the dispatcher, and converts the `ApiResponse`
//! back into status code + JSON body. `/invitations` accepts any method so
//! the unknown-method path is reachable end-to-end; `/healthz` and
//! `/metrics` ride the same listener.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{ApiRequest, ApiResponse};
use crate::config::ServerConfig;
use crate::handlers;
use crate::server::UsherServer;

#[derive(Clone)]
struct AppState {
    server: UsherServer,
    metrics: PrometheusHandle,
}

pub fn router(server: UsherServer, metrics: PrometheusHandle) -> Router {
    let state = AppState { server, metrics };
    Router::new()
        .route("/invitations", any(invitations_handler))
        .route("/healthz", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn invitations_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query_params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&state.server.config, &method, &headers) {
        return into_http(ApiResponse::error(401, "Unauthorized.".to_string()));
    }

    let request = ApiRequest {
        method: method.to_string(),
        query_params,
        body: parse_body(&body),
    };
    into_http(handlers::dispatch(&state.server, request).await)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

fn into_http(response: ApiResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

/// Admin-key guard. Confirmation (PUT) stays public so invitees can redeem
/// their code without credentials; everything else needs the key when one
/// is configured.
fn authorized(config: &ServerConfig, method: &Method, headers: &HeaderMap) -> bool {
    let Some(expected) = config.admin_api_key.as_deref() else {
        return true;
    };
    if method == Method::PUT {
        return true;
    }
    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map_or(false, |presented| presented == expected)
}

/// Absent and malformed bodies both arrive as no body at all.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}
