use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account row.
///
/// Ids are BIGSERIAL and cross the wire as uint64; `subject_id()` performs
/// the cast at the boundary. The password hash never leaves this service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn subject_id(&self) -> u64 {
        self.id as u64
    }
}
