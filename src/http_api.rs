use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::{services::ServeFile, trace::TraceLayer};
use tracing::info;

use crate::{
    errors::error_response, favicon::FAVICON_FILE, StaticFiles, StatsTracker, SERVER_NAME,
    SERVER_VERSION,
};

pub const FAVICON_PATH: &str = "/favicon.ico";

/// Field order matches the alphabetical key order clients already parse.
/// The request label stays "(60s)" whatever window is configured.
#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(rename = "Name")]
    name: &'static str,
    #[serde(rename = "Ram Usage")]
    ram_usage: String,
    #[serde(rename = "Requests (60s)")]
    requests: usize,
    #[serde(rename = "Threads")]
    threads: String,
    #[serde(rename = "Uptime")]
    uptime: String,
    #[serde(rename = "Version")]
    version: &'static str,
}

#[derive(Debug, Clone)]
pub struct ApiState {
    pub tracker: Arc<StatsTracker>,
    pub files: Arc<StaticFiles>,
}

async fn index_handler() -> impl IntoResponse {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
	<title>Static Server {version}</title>
	<style>
			body {{
					font-family: monospace, sans-serif;
					display: flex;
					justify-content: center;
					align-items: center;
					height: 100vh;
					margin: 0;
			}}
			p {{
					text-align: center;
			}}
	</style>
</head>
<body>
	<div>
			<p>Static Server {version}</p>
			<p>OMG It works ;)</p>
	</div>
	<span style="position: absolute; bottom: 10px; right: 10px;">{version}</span>
</body>
</html>"#,
        version = SERVER_VERSION
    ))
}

async fn stats_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.tracker.snapshot();

    let response = StatsResponse {
        name: SERVER_NAME,
        ram_usage: snapshot.ram_usage,
        requests: snapshot.requests,
        threads: snapshot.threads,
        uptime: snapshot.uptime,
        version: SERVER_VERSION,
    };

    (StatusCode::OK, Json(response))
}

async fn favicon_handler(State(state): State<ApiState>, request: Request) -> Response {
    let mut response = serve_file(state.files.file(FAVICON_FILE), request).await;

    if response.status() == StatusCode::NOT_FOUND {
        return error_response(StatusCode::NOT_FOUND, "File not found");
    }
    if response.status().is_success() {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("image/x-icon"),
        );
    }

    response
}

async fn static_root_handler(State(state): State<ApiState>, request: Request) -> Response {
    static_file(&state, "", request).await
}

async fn static_handler(
    State(state): State<ApiState>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    static_file(&state, &path, request).await
}

async fn static_file(state: &ApiState, suffix: &str, request: Request) -> Response {
    match state.files.resolve(suffix).await {
        Ok(path) => serve_file(path, request).await,
        Err(e) => e.into_response(),
    }
}

async fn serve_file(path: std::path::PathBuf, mut request: Request) -> Response {
    // Files are served whatever the method, HEAD still gets no body
    if request.method() != Method::HEAD {
        *request.method_mut() = Method::GET;
    }

    let result: Result<_, Infallible> = ServeFile::new(path).oneshot(request).await;
    match result {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Redirect a trailing-slash variant to its canonical route
fn strict_slash(canonical: &'static str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, canonical)],
    )
        .into_response()
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "That file was not found")
}

/// Logs the request line and, once the handler has completed, records the
/// request in the stats ledger. Favicon fetches are neither logged nor counted.
async fn track_requests(State(state): State<ApiState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    if path != FAVICON_PATH && path != "/" {
        info!("{} {}", method, path);
    }

    let response = next.run(request).await;

    if path != FAVICON_PATH {
        state.tracker.record_request();
    }

    response
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", any(index_handler))
        .route("/stats", any(stats_handler))
        .route("/stats/", any(|| async { strict_slash("/stats") }))
        .route(FAVICON_PATH, any(favicon_handler))
        .route("/static/", any(static_root_handler))
        .route("/static/*path", any(static_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
