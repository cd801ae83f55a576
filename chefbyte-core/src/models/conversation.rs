use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

/// One conversation per session identifier. `history` is the literal
/// transcript in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    pub history: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
