//! Configuration management for the Parley gateway

use std::path::PathBuf;

/// Parley gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (database lives here)
    pub data_dir: PathBuf,

    /// HTTP API server configuration
    pub api_server: ApiServerConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Conversational agent configuration
    pub agent: AgentConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Database path override (defaults to `<data_dir>/parley.db`)
    pub db_path: Option<PathBuf>,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "`eleven_monolingual_v1`")
    pub tts_model: String,

    /// Default friendly TTS voice name
    pub tts_voice: String,
}

/// Conversational agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent API base URL
    pub base_url: String,

    /// Vendor agent identifier
    pub agent_id: Option<String>,

    /// Vendor access token
    pub access_token: Option<String>,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for Whisper)
    pub openai: Option<String>,

    /// `ElevenLabs` API key (for TTS)
    pub elevenlabs: Option<String>,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Missing vendor credentials are not an error: the corresponding
    /// endpoints report `not_configured` instead.
    #[must_use]
    pub fn load() -> Self {
        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY").ok(),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY").ok(),
        };

        let api_server = ApiServerConfig {
            port: std::env::var("PARLEY_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(18790),
            db_path: std::env::var("PARLEY_DB_PATH").ok().map(PathBuf::from),
        };

        let voice = VoiceConfig {
            stt_model: std::env::var("PARLEY_STT_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            tts_model: std::env::var("PARLEY_TTS_MODEL")
                .unwrap_or_else(|_| "eleven_monolingual_v1".to_string()),
            tts_voice: std::env::var("PARLEY_TTS_VOICE")
                .unwrap_or_else(|_| crate::speech::DEFAULT_VOICE.to_string()),
        };

        let agent = AgentConfig {
            base_url: std::env::var("AGENTFORCE_BASE_URL").unwrap_or_else(|_| {
                "https://api.salesforce.com/einstein/ai-agent/v1".to_string()
            }),
            agent_id: std::env::var("AGENTFORCE_AGENT_ID").ok(),
            access_token: std::env::var("AGENTFORCE_ACCESS_TOKEN").ok(),
        };

        // Determine data directory (~/.local/share/omni/parley on Linux)
        let data_dir = directories::ProjectDirs::from("dev", "omni", "omni")
            .map_or_else(|| PathBuf::from("."), |d| d.data_dir().join("parley"));

        // Ensure data dir exists
        std::fs::create_dir_all(&data_dir).ok();

        Self {
            data_dir,
            api_server,
            voice,
            agent,
            api_keys,
        }
    }

    /// Resolve the database path
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.api_server
            .db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("parley.db"))
    }
}
