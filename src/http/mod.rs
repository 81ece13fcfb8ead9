//! HTTP control endpoint.
//!
//! `GET /debug/readprof?seconds=N` opens a profiling window on the given
//! profiler, waits `N` seconds (10 by default), closes the window and
//! answers with the gzip-compressed pprof profile.

use crate::output::encode_compressed;
use crate::sampler::Profiler;
use crate::utils::config::{
    DEFAULT_PROFILE_SECONDS, PROFILE_CONTENT_ENCODING, PROFILE_CONTENT_TYPE, PROFILE_ENDPOINT_PATH,
};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Query parameters of the profile endpoint
#[derive(Debug, Deserialize)]
struct ProfileParams {
    seconds: Option<String>,
}

/// Build a router serving the profile endpoint for `profiler`
///
/// **Public** - mount it into an existing axum application or pass it to [`serve`]
pub fn router(profiler: &'static Profiler) -> Router {
    Router::new()
        .route(PROFILE_ENDPOINT_PATH, get(profile_handler))
        .with_state(profiler)
}

/// Bind `addr` and serve the profile endpoint until the server fails
pub async fn serve(addr: SocketAddr, profiler: &'static Profiler) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Serving read profiles on http://{}{}",
        listener.local_addr()?,
        PROFILE_ENDPOINT_PATH
    );
    axum::serve(listener, router(profiler)).await
}

/// Parse the `seconds` parameter; absent or empty means the default window
fn parse_seconds(raw: Option<&str>) -> Result<u64, String> {
    match raw {
        None | Some("") => Ok(DEFAULT_PROFILE_SECONDS),
        Some(raw) => raw.parse::<u64>().map_err(|e| e.to_string()),
    }
}

async fn profile_handler(
    State(profiler): State<&'static Profiler>,
    Query(params): Query<ProfileParams>,
) -> Response {
    let seconds = match parse_seconds(params.seconds.as_deref()) {
        Ok(seconds) => seconds,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };

    if let Err(e) = profiler.start() {
        warn!("Profile request rejected: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    // Closed by a detached task: dropping the request must not leave the window open
    let window = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(seconds)).await;

        // Stopping builds the profile and reads the process mappings
        let payload = tokio::task::spawn_blocking(move || {
            let profile = profiler.stop().map_err(|e| e.to_string())?;
            encode_compressed(&profile).map_err(|e| e.to_string())
        })
        .await;

        match payload {
            Ok(result) => result,
            Err(e) => Err(e.to_string()),
        }
    });

    let payload = window.await;

    match payload {
        Ok(Ok(body)) => (
            [
                (header::CONTENT_TYPE, PROFILE_CONTENT_TYPE),
                (header::CONTENT_ENCODING, PROFILE_CONTENT_ENCODING),
            ],
            body,
        )
            .into_response(),
        Ok(Err(e)) => (StatusCode::INTERNAL_SERVER_ERROR, e).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
