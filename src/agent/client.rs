//! Agentforce Agent API client
//!
//! Wraps the vendor's session-oriented chat API. A session is opened lazily
//! on the first message of a conversation; subsequent messages carry the
//! stored session id. The vendor may rotate the session id at any time, so
//! every reply reports the id in effect for the caller to persist.

use uuid::Uuid;

use crate::{Error, Result};

/// Response from the session-creation endpoint
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    session_id: String,
}

/// Response from the message endpoint
#[derive(serde::Deserialize)]
struct MessageResponse {
    #[serde(default)]
    messages: Vec<AgentMessage>,
}

#[derive(serde::Deserialize)]
struct AgentMessage {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// An agent reply plus the session id in effect when it was produced
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// Raw reply text as returned by the vendor
    pub text: String,
    /// Session id used for this exchange (freshly issued or carried over)
    pub session_id: String,
}

/// Client for the Agentforce conversational agent
#[derive(Debug)]
pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
    agent_id: String,
    access_token: String,
}

impl AgentClient {
    /// Create a new agent client
    ///
    /// # Errors
    ///
    /// Returns error if the agent id or access token is missing
    pub fn new(base_url: String, agent_id: String, access_token: String) -> Result<Self> {
        if agent_id.is_empty() {
            return Err(Error::Config("Agentforce agent id required".to_string()));
        }
        if access_token.is_empty() {
            return Err(Error::Config(
                "Agentforce access token required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            agent_id,
            access_token,
        })
    }

    /// Send a message, opening a session when none is carried over
    ///
    /// # Errors
    ///
    /// Returns error if the vendor call fails or the reply is empty/invalid
    pub async fn send(&self, text: &str, session_id: Option<&str>) -> Result<AgentReply> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => self.create_session().await?,
        };

        let reply = self.send_message(&session_id, text).await?;
        Ok(AgentReply {
            text: reply,
            session_id,
        })
    }

    /// Open a new agent session
    async fn create_session(&self) -> Result<String> {
        let url = format!("{}/agents/{}/sessions", self.base_url, self.agent_id);

        let body = serde_json::json!({
            "externalSessionKey": Uuid::new_v4().to_string(),
            "bypassUser": true,
        });

        tracing::debug!(agent_id = %self.agent_id, "opening agent session");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "agent session error");
            return Err(Error::Agent(format!("agent session error {status}: {body}")));
        }

        let result: SessionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse session response");
            e
        })?;

        tracing::info!(session_id = %result.session_id, "agent session opened");
        Ok(result.session_id)
    }

    /// Send one message within an existing session
    async fn send_message(&self, session_id: &str, text: &str) -> Result<String> {
        let url = format!("{}/sessions/{}/messages", self.base_url, session_id);

        let body = serde_json::json!({
            "message": {
                "sequenceId": chrono::Utc::now().timestamp_millis(),
                "type": "Text",
                "text": text,
            }
        });

        tracing::debug!(session_id, chars = text.len(), "sending agent message");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "agent request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "agent API error");
            return Err(Error::Agent(format!("agent API error {status}: {body}")));
        }

        let result: MessageResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse agent response");
            e
        })?;

        extract_reply(&result)
    }
}

/// Pull the first usable reply text out of a vendor message envelope
///
/// Empty or non-string replies are rejected here, before anything reaches
/// the HTTP client.
fn extract_reply(response: &MessageResponse) -> Result<String> {
    let value = response
        .messages
        .first()
        .and_then(|m| m.message.as_ref())
        .ok_or_else(|| Error::Agent("agent returned no messages".to_string()))?;

    let text = value
        .as_str()
        .ok_or_else(|| Error::Agent("agent reply is not a string".to_string()))?;

    if text.trim().is_empty() {
        return Err(Error::Agent("agent returned an empty reply".to_string()));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> MessageResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_requires_credentials() {
        let err = AgentClient::new(
            "https://api.example.com".to_string(),
            String::new(),
            "token".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = AgentClient::new(
            "https://api.example.com".to_string(),
            "agent-1".to_string(),
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_extract_reply_takes_first_message() {
        let response = envelope(r#"{"messages": [{"message": "Hello!"}, {"message": "ignored"}]}"#);
        assert_eq!(extract_reply(&response).unwrap(), "Hello!");
    }

    #[test]
    fn test_extract_reply_rejects_empty() {
        let response = envelope(r#"{"messages": [{"message": "   "}]}"#);
        let err = extract_reply(&response).unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
    }

    #[test]
    fn test_extract_reply_rejects_non_string() {
        let response = envelope(r#"{"messages": [{"message": {"unexpected": true}}]}"#);
        let err = extract_reply(&response).unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
    }

    #[test]
    fn test_extract_reply_rejects_missing_messages() {
        let response = envelope(r"{}");
        let err = extract_reply(&response).unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
    }
}
