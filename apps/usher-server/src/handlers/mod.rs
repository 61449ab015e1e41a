//! Handler modules for the invitation lifecycle.
//!
//! One domain module today:
//! - invitations: review, create, confirm, invalidate
//!
//! The dispatcher maps the transport method onto the operation:
//! GET → review, POST → create, PUT → confirm, DELETE → invalidate.
//! Anything else is a 500, so unknown methods are visible rather than
//! silently routed.

pub mod invitations;

use std::time::Instant;
use tracing::debug;

use crate::api::{ApiRequest, ApiResponse};
use crate::metrics;
use crate::server::UsherServer;

pub async fn dispatch(server: &UsherServer, request: ApiRequest) -> ApiResponse {
    let started = Instant::now();
    debug!(method = %request.method, "dispatching request");

    let response = match request.method.as_str() {
        "GET" => invitations::review(server, &request.query_params).await,
        "POST" => invitations::create(server, request.body.as_ref()).await,
        "PUT" => invitations::confirm(server, request.body.as_ref()).await,
        "DELETE" => invitations::invalidate(server, request.body.as_ref()).await,
        other => ApiResponse::error(500, format!("Unknown error: unsupported method {other}")),
    };

    metrics::record_request(&request.method, response.status_code, started.elapsed());
    response
}
