//! Voice API endpoints for speech-to-text and text-to-speech

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};

/// Maximum accepted audio upload size
const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route(
            "/stt",
            post(transcribe).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .route("/tts", get(synthesize_query).post(synthesize_json))
        .with_state(state)
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    /// Audio duration in seconds
    pub duration: f64,
}

/// Transcribe uploaded audio to text
///
/// Accepts a multipart upload with an `audio` field; only `audio/*` MIME
/// subtypes are accepted and the body is limited to 10 MB.
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let stt = state
        .stt
        .as_ref()
        .ok_or(ApiError::NotConfigured("STT not configured (no OpenAI key)"))?;

    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !mime_type.starts_with("audio/") {
            return Err(ApiError::validation(
                "audio",
                format!("unsupported media type {mime_type}, expected audio/*"),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read audio field: {e}")))?;
        upload = Some((data.to_vec(), mime_type));
        break;
    }

    let Some((audio, mime_type)) = upload else {
        return Err(ApiError::validation("audio", "missing audio field"));
    };

    if audio.is_empty() {
        return Err(ApiError::validation("audio", "audio data is empty"));
    }

    // Language preference feeds the recognizer hint
    let language = state.settings_repo.get()?.language;

    let transcription = stt
        .transcribe(audio, &mime_type, Some(language.as_str()))
        .await?;

    Ok(Json(TranscribeResponse {
        text: transcription.text,
        duration: transcription.duration,
    }))
}

/// Synthesis parameters, accepted as query string (GET) or JSON body (POST)
#[derive(Debug, Deserialize)]
pub struct SynthesizeParams {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
}

/// Synthesize text to speech (GET with query parameters)
async fn synthesize_query(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<SynthesizeParams>,
) -> Result<Response, ApiError> {
    synthesize(&state, params).await
}

/// Synthesize text to speech (POST with JSON body)
async fn synthesize_json(
    State(state): State<Arc<ApiState>>,
    Json(params): Json<SynthesizeParams>,
) -> Result<Response, ApiError> {
    synthesize(&state, params).await
}

/// Synthesize text to speech
///
/// Returns audio in MP3 format. An unknown voice name falls back to the
/// default voice inside the TTS client.
async fn synthesize(state: &ApiState, params: SynthesizeParams) -> Result<Response, ApiError> {
    let tts = state.tts.as_ref().ok_or(ApiError::NotConfigured(
        "TTS not configured (no ElevenLabs key)",
    ))?;

    if params.text.trim().is_empty() {
        return Err(ApiError::validation("text", "must not be empty"));
    }

    // Request voice wins; stored preference is the fallback
    let voice = match params.voice {
        Some(v) if !v.trim().is_empty() => v,
        _ => state.settings_repo.get()?.voice,
    };

    let audio = tts.synthesize(&params.text, &voice).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        audio,
    )
        .into_response())
}
