//! Shared test utilities

use parley_gateway::db::{self, Conversation, ConversationRepo, Turn, TurnRepo, TurnRole};
use parley_gateway::DbPool;

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Create a test conversation in the database
pub fn create_test_conversation(db: &DbPool, session_id: Option<&str>) -> Conversation {
    let repo = ConversationRepo::new(db.clone());
    repo.create(session_id)
        .expect("failed to create test conversation")
}

/// Create a test turn in the database
#[allow(dead_code)]
pub fn create_test_turn(db: &DbPool, conversation_id: &str, role: TurnRole, text: &str) -> Turn {
    let repo = TurnRepo::new(db.clone());
    repo.create(conversation_id, role, text)
        .expect("failed to create test turn")
}
