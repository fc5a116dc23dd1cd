use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::config::MEMORY_WINDOW;
use crate::llm::image_describe::validate_image;
use crate::models::{ChatRequest, ChatTurn};
use crate::pipeline::Submission;
use crate::state::AppState;

/// POST /api/chat — run one full turn and return the recorded exchange.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatTurn>, (StatusCode, String)> {
    // ── Step 1: Validate input ────────────────────────────
    if let Some(image) = &req.image {
        validate_image(image).map_err(|e| (StatusCode::BAD_REQUEST, format!("{e:#}")))?;
    }

    let submission = Submission::new(req.message, req.image).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "A message or an image is required".to_string(),
        )
    })?;

    // ── Step 2: One turn at a time ────────────────────────
    let _permit = state
        .turn_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Chat service unavailable".to_string(),
            )
        })?;

    // ── Step 3: Snapshot prior turns ──────────────────────
    let memory = state.session.read().memory(MEMORY_WINDOW);

    // ── Step 4: Run the pipeline ──────────────────────────
    let turn = state
        .pipeline
        .run_turn(&submission, &memory)
        .await
        .map_err(|e| {
            tracing::error!("Turn failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Turn failed: {e:#}"),
            )
        })?;

    // ── Step 5: Record the completed turn ─────────────────
    state.session.write().push(turn.clone());
    tracing::info!("Turn {} recorded", turn.id);

    Ok(Json(turn))
}
