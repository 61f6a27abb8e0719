//! Agent chat endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::agent::process_reply;
use crate::db::TurnRole;

/// Build agent chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/", post(chat)).with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub text: String,
    /// Omit to start a new conversation
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// TTS-safe plain text
    pub text: String,
    /// UI variant, possibly containing HTML markup
    pub text_for_ui: String,
    pub has_html: bool,
    pub conversation_id: String,
    pub session_id: String,
}

/// Forward a user message to the conversational agent
///
/// Creates the conversation on first interaction, carries the vendor session
/// id across turns, persists both sides of the exchange, and reshapes the
/// agent reply into UI and speech variants.
async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let agent = state.agent.as_ref().ok_or(ApiError::NotConfigured(
        "agent not configured (no Agentforce credentials)",
    ))?;

    if request.text.trim().is_empty() {
        return Err(ApiError::validation("text", "must not be empty"));
    }

    // Conversation created on first interaction; 404 for a stale id
    let conversation = match &request.conversation_id {
        Some(id) => state.conversation_repo.get(id)?,
        None => state.conversation_repo.create(None)?,
    };

    state
        .turn_repo
        .create(&conversation.id, TurnRole::User, &request.text)?;

    let reply = agent
        .send(&request.text, conversation.session_id.as_deref())
        .await?;

    // Session rotation is persisted idempotently
    state
        .conversation_repo
        .set_session_id(&conversation.id, &reply.session_id)?;

    let processed = process_reply(&reply.text);

    state
        .turn_repo
        .create(&conversation.id, TurnRole::Agent, &processed.text_for_ui)?;

    tracing::info!(
        conversation_id = %conversation.id,
        session_id = %reply.session_id,
        has_html = processed.has_html,
        "agent turn complete"
    );

    Ok(Json(ChatResponse {
        text: processed.text_for_speech,
        text_for_ui: processed.text_for_ui,
        has_html: processed.has_html,
        conversation_id: conversation.id,
        session_id: reply.session_id,
    }))
}
