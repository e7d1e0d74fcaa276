//! Per-request span, HTTP metrics and the headers every response carries.

use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, field, info, info_span};
use uuid::Uuid;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Added to every response. API responses are never cacheable.
const RESPONSE_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::CACHE_CONTROL, "no-store"),
];

/// GET /api/metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics are disabled in the showmark config".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// How a request ended, using the same labels as the flag write counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Ok,
    Rejected,
    Failed,
}

impl RequestOutcome {
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::Failed
        } else if status.is_client_error() {
            Self::Rejected
        } else {
            Self::Ok
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// The show or episode id named by an API path, if any.
fn path_target(path: &str) -> (Option<i32>, Option<i32>) {
    let mut segments = path.trim_start_matches("/api").split('/').skip(1);
    let kind = segments.next();
    let id = segments.next().and_then(|s| s.parse().ok());

    match kind {
        Some("shows") => (id, None),
        Some("episodes") => (None, id),
        _ => (None, None),
    }
}

/// Runs each request inside an `api_request` span tagged with the show or
/// episode it targets, then records `showmark_api_requests_total` and
/// `showmark_api_request_duration_seconds`.
///
/// `user_id` is filled in by the auth middleware once the caller is known.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    // Route templates keep label cardinality bounded.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| path.clone(), |mp| mp.as_str().to_string());

    let span = info_span!(
        "api_request",
        request_id = %request_id,
        method = %method,
        route = %route,
        show_id = field::Empty,
        episode_id = field::Empty,
        user_id = field::Empty,
    );

    match path_target(&path) {
        (Some(show_id), _) => {
            span.record("show_id", show_id);
        }
        (_, Some(episode_id)) => {
            span.record("episode_id", episode_id);
        }
        _ => {}
    }

    async move {
        let mut response = next.run(req).await;

        let status = response.status();
        let outcome = RequestOutcome::from_status(status);
        let elapsed = start.elapsed();

        metrics::counter!(
            "showmark_api_requests_total",
            "method" => method.clone(),
            "route" => route.clone(),
            "outcome" => outcome.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "showmark_api_request_duration_seconds",
            "method" => method,
            "route" => route
        )
        .record(elapsed.as_secs_f64());

        info!(
            status = status.as_u16(),
            outcome = outcome.as_str(),
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Request finished"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID, value);
        }

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in RESPONSE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_follows_status_class() {
        assert_eq!(RequestOutcome::from_status(StatusCode::OK), RequestOutcome::Ok);
        assert_eq!(
            RequestOutcome::from_status(StatusCode::CONFLICT),
            RequestOutcome::Rejected
        );
        assert_eq!(
            RequestOutcome::from_status(StatusCode::BAD_GATEWAY),
            RequestOutcome::Failed
        );
        assert_eq!(RequestOutcome::Rejected.as_str(), "rejected");
    }

    #[test]
    fn path_target_picks_show_or_episode() {
        assert_eq!(path_target("/api/shows/12"), (Some(12), None));
        assert_eq!(path_target("/api/shows/12/season/flag"), (Some(12), None));
        assert_eq!(path_target("/api/episodes/40/flag"), (None, Some(40)));
        assert_eq!(path_target("/api/shows/search/dark"), (None, None));
        assert_eq!(path_target("/api/settings"), (None, None));
    }
}
