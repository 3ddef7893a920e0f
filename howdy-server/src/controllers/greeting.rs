use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tracing::debug;

use crate::request_id::RequestId;
use crate::state::AppState;

/// Routes exposed by the greeting controller.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(greet))
}

/// `GET /` returns the configured message verbatim as
/// `text/plain; charset=utf-8`.
///
/// Always 200: an empty configured message yields an empty body, not an
/// error.
async fn greet(State(state): State<AppState>, request_id: RequestId) -> String {
    debug!(%request_id, "serving greeting");
    state.provider.message().to_string()
}
