use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_gateway::api::{ApiServer, ApiState};
use parley_gateway::{db, AgentClient, Config, SpeechToText, TextToSpeech};

/// Parley - voice-enabled chat gateway for conversational agents
#[derive(Parser)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "PARLEY_PORT", default_value = "18790")]
    port: u16,

    /// Database path override
    #[arg(long, env = "PARLEY_DB_PATH")]
    db: Option<std::path::PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,parley_gateway=info",
        1 => "info,parley_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    config.api_server.port = cli.port;
    if cli.db.is_some() {
        config.api_server.db_path = cli.db;
    }

    tracing::info!(port = config.api_server.port, "starting parley gateway");

    let pool = db::init(config.db_path())?;

    // Vendor clients are optional; unset credentials disable their endpoints
    let stt = match config.api_keys.openai.clone() {
        Some(key) => Some(Arc::new(SpeechToText::new(
            key,
            config.voice.stt_model.clone(),
        )?)),
        None => {
            tracing::warn!("OPENAI_API_KEY not set, STT endpoint disabled");
            None
        }
    };

    let tts = match config.api_keys.elevenlabs.clone() {
        Some(key) => Some(Arc::new(TextToSpeech::new_with_model(
            key,
            config.voice.tts_model.clone(),
        )?)),
        None => {
            tracing::warn!("ELEVENLABS_API_KEY not set, TTS endpoint disabled");
            None
        }
    };

    let agent = match (
        config.agent.agent_id.clone(),
        config.agent.access_token.clone(),
    ) {
        (Some(agent_id), Some(token)) => Some(Arc::new(AgentClient::new(
            config.agent.base_url.clone(),
            agent_id,
            token,
        )?)),
        _ => {
            tracing::warn!("Agentforce credentials not set, agent endpoint disabled");
            None
        }
    };

    let state = Arc::new(ApiState::new(pool, stt, tts, agent));
    let server = ApiServer::new(state, config.api_server.port);

    tracing::info!("parley gateway ready");
    server.run().await?;

    Ok(())
}
