//! Settings endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::db::Settings;

/// Build settings router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(get_settings).put(put_settings))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    pub voice: String,
    pub language: String,
    pub speak_replies: bool,
}

impl From<Settings> for SettingsDto {
    fn from(s: Settings) -> Self {
        Self {
            voice: s.voice,
            language: s.language,
            speak_replies: s.speak_replies,
        }
    }
}

/// Read current settings
async fn get_settings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<SettingsDto>, ApiError> {
    let settings = state.settings_repo.get()?;
    Ok(Json(settings.into()))
}

/// Replace settings wholesale
async fn put_settings(
    State(state): State<Arc<ApiState>>,
    Json(dto): Json<SettingsDto>,
) -> Result<Json<SettingsDto>, ApiError> {
    if dto.voice.trim().is_empty() {
        return Err(ApiError::validation("voice", "must not be empty"));
    }
    if dto.language.trim().is_empty() {
        return Err(ApiError::validation("language", "must not be empty"));
    }

    let settings = Settings {
        voice: dto.voice,
        language: dto.language,
        speak_replies: dto.speak_replies,
    };
    state.settings_repo.put(&settings)?;

    Ok(Json(settings.into()))
}
