//! Conversation repository for CRUD operations

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::{Error, Result};

/// A conversation between a user and the agent
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    /// Vendor-assigned session identifier, absent until the agent issues one
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation repository
#[derive(Clone)]
pub struct ConversationRepo {
    pool: DbPool,
}

impl ConversationRepo {
    /// Create a new conversation repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a conversation, optionally seeded with a session identifier
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn create(&self, session_id: Option<&str>) -> Result<Conversation> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO conversations (id, session_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            rusqlite::params![&id, session_id, &now_str],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Conversation {
            id,
            session_id: session_id.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch a conversation by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist
    pub fn get(&self, id: &str) -> Result<Conversation> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        conn.query_row(
            "SELECT id, session_id, created_at, updated_at
             FROM conversations WHERE id = ?1",
            [id],
            |row| {
                Ok(Conversation {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                    updated_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                Error::NotFound(format!("conversation {id}"))
            }
            other => Error::Database(other.to_string()),
        })
    }

    /// Check whether a conversation exists
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn exists(&self, id: &str) -> Result<bool> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM conversations WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// List all conversations, most recently updated first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list(&self) -> Result<Vec<Conversation>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, session_id, created_at, updated_at
                 FROM conversations ORDER BY updated_at DESC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let conversations = stmt
            .query_map([], |row| {
                Ok(Conversation {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                    updated_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect();

        Ok(conversations)
    }

    /// Attach or rotate the vendor session identifier
    ///
    /// Idempotent: writing the value already stored is a no-op, so repeated
    /// agent responses carrying the same session id do not bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist
    pub fn set_session_id(&self, id: &str, session_id: &str) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let current: Option<String> = conn
            .query_row(
                "SELECT session_id FROM conversations WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    Error::NotFound(format!("conversation {id}"))
                }
                other => Error::Database(other.to_string()),
            })?;

        if current.as_deref() == Some(session_id) {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE conversations SET session_id = ?1, updated_at = ?2 WHERE id = ?3",
            [session_id, &now, id],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        tracing::debug!(conversation_id = %id, "session id updated");
        Ok(())
    }
}

pub(super) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory;

    fn setup() -> ConversationRepo {
        let pool = init_memory().unwrap();
        ConversationRepo::new(pool)
    }

    #[test]
    fn test_create_and_get() {
        let repo = setup();

        let conversation = repo.create(None).unwrap();
        assert!(conversation.session_id.is_none());

        let fetched = repo.get(&conversation.id).unwrap();
        assert_eq!(fetched.id, conversation.id);
        assert!(fetched.session_id.is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let repo = setup();

        let err = repo.get("no-such-id").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_list_returns_all() {
        let repo = setup();

        repo.create(None).unwrap();
        repo.create(Some("vendor-session-1")).unwrap();

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_set_session_id_idempotent() {
        let repo = setup();

        let conversation = repo.create(None).unwrap();

        repo.set_session_id(&conversation.id, "session-a").unwrap();
        let after_first = repo.get(&conversation.id).unwrap();
        assert_eq!(after_first.session_id.as_deref(), Some("session-a"));

        // Same value again is a no-op
        repo.set_session_id(&conversation.id, "session-a").unwrap();
        let after_repeat = repo.get(&conversation.id).unwrap();
        assert_eq!(after_repeat.updated_at, after_first.updated_at);

        // Rotation replaces the value
        repo.set_session_id(&conversation.id, "session-b").unwrap();
        let rotated = repo.get(&conversation.id).unwrap();
        assert_eq!(rotated.session_id.as_deref(), Some("session-b"));
    }

    #[test]
    fn test_set_session_id_missing_conversation() {
        let repo = setup();

        let err = repo.set_session_id("missing", "session-a").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
