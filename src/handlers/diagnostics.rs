// GET /api/test-connection - backend connectivity report

use axum::{extract::State, http::HeaderMap, response::Json};

use crate::app::AppState;
use crate::backend::{create_server_client, run_diagnostics, DiagnosticReport};
use crate::error::ApiError;

/// Reports whether the backend is reachable and which probed tables exist.
///
/// Per-table failures are part of the 200 body. Only a client that cannot
/// be built at all (missing configuration) turns into a 500.
pub async fn test_connection(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DiagnosticReport>, ApiError> {
    let client = create_server_client(&state.config.backend, state.http.clone(), &headers)?;
    Ok(Json(run_diagnostics(&client).await))
}
