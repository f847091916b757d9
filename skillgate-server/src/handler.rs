//! HTTP boundary: raw body capture, pipeline invocation, error mapping.
//!
//! The body is taken as `Bytes` so the exact wire bytes reach signature
//! verification; JSON parsing happens later, inside the pipeline, over the
//! same buffer. Rejections answer with a generic status text only; which
//! sub-check failed is written to the log, never to the caller.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use skillgate_auth::{AuthConfig, Authenticator, ChainCache, ChainFetcher, RequestHeaders};

use crate::dispatch::EventRouter;

/// Header carrying the certificate chain URL.
pub const HEADER_CHAIN_URL: &str = "SignatureCertChainUrl";
/// Header carrying the base64 body signature.
pub const HEADER_SIGNATURE: &str = "Signature";

/// Shared state behind the webhook route.
pub struct AppState {
    pub auth: AuthConfig,
    pub cache: Box<dyn ChainCache>,
    pub fetcher: Box<dyn ChainFetcher>,
    pub events: EventRouter,
}

/// Build the webhook router. The skill endpoint is `POST /skill`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/skill", post(handle_skill))
        .with_state(state)
}

async fn handle_skill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_headers = RequestHeaders {
        chain_url: header_value(&headers, HEADER_CHAIN_URL),
        signature: header_value(&headers, HEADER_SIGNATURE),
    };

    let authenticator = Authenticator::new(&state.auth, state.cache.as_ref(), state.fetcher.as_ref());
    let event = match authenticator
        .authenticate(&request_headers, &body, Utc::now())
        .await
    {
        Ok(event) => event,
        Err(e) if e.is_client_error() => {
            tracing::warn!(error = %e, "request rejected");
            return bad_request();
        }
        Err(e) => {
            tracing::error!(error = %e, "request failed on fetch/storage");
            return server_error();
        }
    };

    match state.events.dispatch(&event) {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::error!(error = %e, request_type = %event.request.kind, "dispatch failed");
            server_error()
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Bad Request").into_response()
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
