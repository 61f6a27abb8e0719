//! Conversational agent integration: vendor client and reply reshaping

pub mod client;
pub mod response;

pub use client::{AgentClient, AgentReply};
pub use response::{process_reply, strip_html, ProcessedReply};
