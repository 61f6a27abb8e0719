//! Text-to-speech (TTS) via the ElevenLabs synthesis API

use crate::{Error, Result};

/// Friendly voice name used when the caller gives none or an unknown one
pub const DEFAULT_VOICE: &str = "rachel";

/// Static mapping from friendly voice names to ElevenLabs voice identifiers
const VOICES: &[(&str, &str)] = &[
    ("rachel", "21m00Tcm4TlvDq8ikWAM"),
    ("domi", "AZnzlk1XvdvUeBnXmlld"),
    ("bella", "EXAVITQu4vr4xnSDxMaL"),
    ("antoni", "ErXwobaYiN019PkySvjV"),
    ("elli", "MF3mGyEYCl7XYWbV9V6O"),
    ("josh", "TxGEqnHWrfWFTfGW9XjX"),
    ("arnold", "VR6AewLTigWG4xSOukaG"),
    ("adam", "pNInz6obpgDQGcFmaJgB"),
    ("sam", "yoZ06aMxZJJ28mfd3POQ"),
];

/// Resolve a friendly voice name to a vendor voice identifier
///
/// Matching is case-insensitive; unknown names fall back to the default
/// voice's identifier.
#[must_use]
pub fn resolve_voice(name: &str) -> &'static str {
    let lower = name.trim().to_lowercase();
    voice_id(&lower).unwrap_or_else(|| voice_id(DEFAULT_VOICE).unwrap_or(VOICES[0].1))
}

fn voice_id(name: &str) -> Option<&'static str> {
    VOICES.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

/// Synthesizes speech from text
#[derive(Debug)]
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl TextToSpeech {
    /// Create a new TTS client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String) -> Result<Self> {
        Self::new_with_model(api_key, "eleven_monolingual_v1".to_string())
    }

    /// Create a new TTS client with a custom model
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new_with_model(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    /// Synthesize text to speech
    ///
    /// # Arguments
    ///
    /// * `text` - Text to synthesize
    /// * `voice` - Friendly voice name; unknown names use the default voice
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SynthesisRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let voice_id = resolve_voice(voice);
        let url = format!("https://api.elevenlabs.io/v1/text-to-speech/{voice_id}");

        let request = SynthesisRequest {
            text,
            model_id: &self.model,
        };

        tracing::debug!(voice, voice_id, chars = text.len(), "starting synthesis");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "ElevenLabs API error");
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
