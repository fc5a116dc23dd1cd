use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::ChatTurn;
use crate::state::AppState;

/// GET /api/history - All completed turns, oldest first
pub async fn list_history(State(state): State<AppState>) -> Json<Vec<ChatTurn>> {
    Json(state.session.read().turns().to_vec())
}

/// DELETE /api/history - Forget every turn. Waits for a running turn to finish.
pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    let _permit = state.turn_semaphore.acquire().await.map_err(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Chat service unavailable".to_string(),
        )
    })?;

    let mut session = state.session.write();
    let dropped = session.len();
    session.clear();
    tracing::info!("Cleared {dropped} turns");

    Ok(StatusCode::NO_CONTENT)
}
