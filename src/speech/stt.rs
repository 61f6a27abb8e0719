//! Speech-to-text (STT) via the OpenAI Whisper transcription API

use crate::{Error, Result};

/// Response from the Whisper transcription API (`verbose_json` format)
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    duration: f64,
}

/// A completed transcription
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    /// Audio duration in seconds as reported by the vendor
    pub duration: f64,
}

/// Transcribes speech to text
#[derive(Debug)]
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl SpeechToText {
    /// Create a new STT client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for Whisper".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - audio bytes as uploaded by the client
    /// * `mime_type` - content type of the upload (e.g. `audio/webm`)
    /// * `language` - optional BCP 47 hint for the recognizer
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        mime_type: &str,
        language: Option<&str>,
    ) -> Result<Transcription> {
        tracing::debug!(audio_bytes = audio.len(), mime_type, "starting transcription");

        let file_name = file_name_for_mime(mime_type);
        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(file_name)
                    .mime_str(mime_type)
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        if let Some(lang) = language {
            // Whisper expects the bare ISO 639-1 code, not a full BCP 47 tag
            let code = lang.split('-').next().unwrap_or(lang).to_string();
            form = form.text("language", code);
        }

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Whisper response");
            e
        })?;

        tracing::info!(
            transcript = %result.text,
            duration = result.duration,
            "transcription complete"
        );
        Ok(Transcription {
            text: result.text,
            duration: result.duration,
        })
    }
}

/// Pick an upload file name matching the MIME subtype
///
/// Whisper infers the container format from the file extension.
fn file_name_for_mime(mime_type: &str) -> String {
    let subtype = mime_type
        .split('/')
        .nth(1)
        .unwrap_or("wav")
        .split(';')
        .next()
        .unwrap_or("wav");

    let extension = match subtype {
        "mpeg" | "mp3" => "mp3",
        "webm" => "webm",
        "ogg" => "ogg",
        "mp4" | "m4a" | "x-m4a" => "m4a",
        "flac" | "x-flac" => "flac",
        _ => "wav",
    };

    format!("audio.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let err = SpeechToText::new(String::new(), "whisper-1".to_string()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_file_name_follows_mime() {
        assert_eq!(file_name_for_mime("audio/webm"), "audio.webm");
        assert_eq!(file_name_for_mime("audio/mpeg"), "audio.mp3");
        assert_eq!(file_name_for_mime("audio/wav"), "audio.wav");
        assert_eq!(file_name_for_mime("audio/ogg;codecs=opus"), "audio.ogg");
        assert_eq!(file_name_for_mime("audio/unknown-thing"), "audio.wav");
    }
}
