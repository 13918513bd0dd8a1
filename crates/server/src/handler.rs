// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The webhook request handler.
//!
//! Walks one request through lookup, signature verification, event/ref
//! matching, execution, and recording. The response never reveals more
//! than the caller is entitled to know: an unknown target, a disabled
//! target, and a bad signature all produce the same 404; execution
//! results are visible only in the persisted deployment record.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, info};

use ploy_core::{matcher, signature, MatchResult};

use crate::executor;
use crate::state::AppState;

/// Header carrying the `sha1=<hex>` body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Header carrying the webhook event name.
pub const EVENT_HEADER: &str = "x-github-event";

/// Handles `POST /hook/{target}`.
pub async fn hook(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = match state.get_target(&target_id).await {
        Ok(Some(target)) => target,
        Ok(None) => {
            debug!(%target_id, "unknown target");
            return not_found();
        }
        Err(e) => {
            error!(%target_id, error = %e, "target lookup failed");
            return persistence_failure();
        }
    };

    // Disabled targets answer exactly like unknown ones.
    if !target.enabled {
        debug!(%target_id, "target disabled");
        return not_found();
    }

    let offered = header_str(&headers, SIGNATURE_HEADER);
    if !signature::verify(target.key.as_bytes(), &body, offered) {
        debug!(%target_id, "signature verification failed");
        return not_found();
    }

    let event = header_str(&headers, EVENT_HEADER);
    let payload_ref = extract_ref(&body);

    match matcher::matches(&target, event, &payload_ref) {
        MatchResult::EventRejected => {
            debug!(%target_id, %event, "event not accepted by target");
            return StatusCode::NO_CONTENT.into_response();
        }
        MatchResult::RefRejected => {
            debug!(%target_id, %payload_ref, "ref not accepted by target");
            return StatusCode::NO_CONTENT.into_response();
        }
        MatchResult::Accepted => {}
    }

    // Lock only when serialization is enabled; held across execute + save
    // so queued deliveries record in the order they ran.
    let _guard = match state.locks() {
        Some(locks) => Some(locks.acquire(&target.id).await),
        None => None,
    };

    let deployment = executor::execute(&target).await;

    match state.save_deployment(&deployment).await {
        Ok(id) => {
            info!(
                %target_id,
                deployment_id = id,
                outcome = deployment.outcome.label(),
                "deployment recorded"
            );
            StatusCode::OK.into_response()
        }
        Err(e) => {
            // An unrecorded deployment is an audit gap; this request failed.
            error!(%target_id, error = %e, "failed to record deployment");
            persistence_failure()
        }
    }
}

/// The shared 404 for unknown targets, disabled targets, and bad
/// signatures. One body, one content type; indistinguishable by design.
fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "",
    )
        .into_response()
}

fn persistence_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        "deployment could not be recorded\n",
    )
        .into_response()
}

/// A header's value as a string; absent or non-UTF-8 headers become "".
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// The `ref` field of the JSON payload; unparsable bodies and non-string
/// refs become "" and fall out as a ref mismatch.
fn extract_ref(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|payload| payload.get("ref")?.as_str().map(String::from))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
