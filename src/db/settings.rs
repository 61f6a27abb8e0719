//! Settings repository (singleton user preferences)

use super::DbPool;
use crate::{Error, Result};

/// User preferences for voice and language
///
/// Stored as a single row; reads fall back to defaults when the row has
/// never been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Friendly TTS voice name (resolved to a vendor id at synthesis time)
    pub voice: String,
    /// BCP 47 language tag for transcription hints
    pub language: String,
    /// Whether agent replies should be spoken aloud in the UI
    pub speak_replies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            voice: "rachel".to_string(),
            language: "en-US".to_string(),
            speak_replies: true,
        }
    }
}

/// Settings repository
#[derive(Clone)]
pub struct SettingsRepo {
    pool: DbPool,
}

impl SettingsRepo {
    /// Create a new settings repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Read current settings, falling back to defaults when never written
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn get(&self) -> Result<Settings> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let row = conn
            .query_row(
                "SELECT voice, language, speak_replies FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(Settings {
                        voice: row.get(0)?,
                        language: row.get(1)?,
                        speak_replies: row.get::<_, i64>(2)? != 0,
                    })
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound("settings".to_string()),
                other => Error::Database(other.to_string()),
            });

        match row {
            Ok(settings) => Ok(settings),
            Err(Error::NotFound(_)) => Ok(Settings::default()),
            Err(e) => Err(e),
        }
    }

    /// Replace settings wholesale
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn put(&self, settings: &Settings) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO settings (id, voice, language, speak_replies, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 voice = excluded.voice,
                 language = excluded.language,
                 speak_replies = excluded.speak_replies,
                 updated_at = excluded.updated_at",
            rusqlite::params![
                &settings.voice,
                &settings.language,
                i64::from(settings.speak_replies),
                &now
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
