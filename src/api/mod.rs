//! HTTP API server for the Parley gateway

pub mod agentforce;
pub mod conversations;
mod error;
pub mod health;
pub mod settings;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agent::AgentClient;
use crate::db::{ConversationRepo, DbPool, SettingsRepo, TurnRepo};
use crate::speech::{SpeechToText, TextToSpeech};
use crate::Result;

pub use error::ApiError;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub db: DbPool,
    pub conversation_repo: ConversationRepo,
    pub turn_repo: TurnRepo,
    pub settings_repo: SettingsRepo,
    /// Present only when `OPENAI_API_KEY` is set
    pub stt: Option<Arc<SpeechToText>>,
    /// Present only when `ELEVENLABS_API_KEY` is set
    pub tts: Option<Arc<TextToSpeech>>,
    /// Present only when the Agentforce credentials are set
    pub agent: Option<Arc<AgentClient>>,
}

impl ApiState {
    /// Build state from a database pool and optional vendor clients
    #[must_use]
    pub fn new(
        db: DbPool,
        stt: Option<Arc<SpeechToText>>,
        tts: Option<Arc<TextToSpeech>>,
        agent: Option<Arc<AgentClient>>,
    ) -> Self {
        let conversation_repo = ConversationRepo::new(db.clone());
        let turn_repo = TurnRepo::new(db.clone());
        let settings_repo = SettingsRepo::new(db.clone());

        Self {
            db,
            conversation_repo,
            turn_repo,
            settings_repo,
            stt,
            tts,
            agent,
        }
    }
}

/// Build the router with all routes
#[must_use]
pub fn build_router(state: Arc<ApiState>) -> Router {
    let router = Router::new()
        .nest("/api/conversations", conversations::router(state.clone()))
        .nest("/api", voice::router(state.clone()))
        .nest("/api/agentforce", agentforce::router(state.clone()))
        .nest("/api/settings", settings::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state));

    // CORS layer for cross-origin requests from frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create an API server
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, build_router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
