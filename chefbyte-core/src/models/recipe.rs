use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe saved by the user, keyed by a generated identifier. The
/// body is stored opaquely — it is whatever the client parsed out of a
/// recipe reply, validated for presence only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedRecipe {
    pub recipe_id: Uuid,
    pub session_id: String,
    pub recipe_data: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}
