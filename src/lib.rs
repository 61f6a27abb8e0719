//! Parley Gateway - voice-enabled chat gateway for conversational agents
//!
//! This library provides the core functionality for the Parley gateway:
//! - REST API for conversations, turns, and settings
//! - Speech-to-text and text-to-speech vendor clients
//! - Conversational agent client with session continuity
//! - Agent reply reshaping (HTML for the UI, plain text for TTS)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Web frontend                       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Parley Gateway                       │
//! │   REST API  │  Storage  │  Reply processing         │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Vendor APIs                          │
//! │   Whisper (STT)  │  ElevenLabs (TTS)  │  Agentforce │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod speech;

pub use agent::{process_reply, strip_html, AgentClient, ProcessedReply};
pub use config::Config;
pub use db::{DbConn, DbPool};
pub use error::{Error, Result, UpstreamKind};
pub use speech::{resolve_voice, SpeechToText, TextToSpeech};
