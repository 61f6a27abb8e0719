//! Conversation and turn endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::db::{Conversation, Turn, TurnRole};

/// Build conversations router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_conversations).post(create_conversation))
        .route("/{id}", get(get_conversation))
        .route("/{id}/turns", get(list_turns).post(create_turn))
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub session_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            session_id: c.session_id,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateTurnRequest {
    pub role: String,
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub id: String,
    pub conversation_id: String,
    pub role: &'static str,
    pub text: String,
    pub created_at: String,
}

impl From<Turn> for TurnResponse {
    fn from(t: Turn) -> Self {
        Self {
            id: t.id,
            conversation_id: t.conversation_id,
            role: t.role.as_str(),
            text: t.text,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

// --- Handlers ---

/// List all conversations, newest first
async fn list_conversations(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = state.conversation_repo.list()?;
    Ok(Json(
        conversations.into_iter().map(Into::into).collect(),
    ))
}

/// Create a conversation
async fn create_conversation(
    State(state): State<Arc<ApiState>>,
    body: Option<Json<CreateConversationRequest>>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let conversation = state
        .conversation_repo
        .create(request.session_id.as_deref())?;

    Ok((StatusCode::CREATED, Json(conversation.into())))
}

/// Fetch one conversation
async fn get_conversation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let conversation = state.conversation_repo.get(&id)?;
    Ok(Json(conversation.into()))
}

/// List a conversation's turns in chronological order
async fn list_turns(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TurnResponse>>, ApiError> {
    // 404 for an absent conversation rather than an empty list
    if !state.conversation_repo.exists(&id)? {
        return Err(ApiError::NotFound(format!("conversation {id}")));
    }

    let turns = state.turn_repo.list(&id)?;
    Ok(Json(turns.into_iter().map(Into::into).collect()))
}

/// Append a turn to a conversation
async fn create_turn(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(request): Json<CreateTurnRequest>,
) -> Result<(StatusCode, Json<TurnResponse>), ApiError> {
    let Some(role) = TurnRole::from_str(&request.role) else {
        return Err(ApiError::validation(
            "role",
            "must be \"user\" or \"agent\"",
        ));
    };

    if request.text.trim().is_empty() {
        return Err(ApiError::validation("text", "must not be empty"));
    }

    let turn = state.turn_repo.create(&id, role, &request.text)?;
    Ok((StatusCode::CREATED, Json(turn.into())))
}
