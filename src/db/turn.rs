//! Turn repository for CRUD operations

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::conversation::parse_datetime;
use super::DbPool;
use crate::{Error, Result};

/// One message exchanged within a conversation
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: String,
    pub conversation_id: String,
    pub role: TurnRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Agent,
}

impl TurnRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }
}

/// Turn repository
#[derive(Clone)]
pub struct TurnRepo {
    pool: DbPool,
}

impl TurnRepo {
    /// Create a new turn repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append a turn to a conversation
    ///
    /// The conversation must already exist; turns are immutable once created.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist
    pub fn create(&self, conversation_id: &str, role: TurnRole, text: &str) -> Result<Turn> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        // Referential check before insert
        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM conversations WHERE id = ?1",
                [conversation_id],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        if exists == 0 {
            return Err(Error::NotFound(format!("conversation {conversation_id}")));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO turns (id, conversation_id, role, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![&id, conversation_id, role.as_str(), text, &now_str],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        // Keep the conversation's recency current
        conn.execute(
            "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
            [&now_str, conversation_id],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Turn {
            id,
            conversation_id: conversation_id.to_string(),
            role,
            text: text.to_string(),
            created_at: now,
        })
    }

    /// List turns for a conversation in chronological order
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list(&self, conversation_id: &str) -> Result<Vec<Turn>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, conversation_id, role, text, created_at
                 FROM turns WHERE conversation_id = ?1
                 ORDER BY created_at ASC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let turns = stmt
            .query_map([conversation_id], |row| {
                Ok(Turn {
                    id: row.get(0)?,
                    conversation_id: row.get(1)?,
                    role: TurnRole::from_str(&row.get::<_, String>(2)?)
                        .unwrap_or(TurnRole::User),
                    text: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect();

        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_memory, ConversationRepo};

    fn setup() -> (ConversationRepo, TurnRepo) {
        let pool = init_memory().unwrap();
        (
            ConversationRepo::new(pool.clone()),
            TurnRepo::new(pool),
        )
    }

    #[test]
    fn test_create_and_list_turns() {
        let (conversations, turns) = setup();

        let conversation = conversations.create(None).unwrap();

        turns
            .create(&conversation.id, TurnRole::User, "Hello")
            .unwrap();
        turns
            .create(&conversation.id, TurnRole::Agent, "Hi there!")
            .unwrap();

        let listed = turns.list(&conversation.id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].text, "Hello");
        assert_eq!(listed[0].role, TurnRole::User);
        assert_eq!(listed[1].text, "Hi there!");
        assert_eq!(listed[1].role, TurnRole::Agent);
    }

    #[test]
    fn test_create_turn_requires_conversation() {
        let (_conversations, turns) = setup();

        let err = turns
            .create("missing-conversation", TurnRole::User, "Hello")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(TurnRole::from_str("user"), Some(TurnRole::User));
        assert_eq!(TurnRole::from_str("agent"), Some(TurnRole::Agent));
        assert_eq!(TurnRole::from_str("system"), None);
        assert_eq!(TurnRole::User.as_str(), "user");
    }
}
