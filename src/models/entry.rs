use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A pool participant. One per (pool, user).
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Entry {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub eliminated: bool,
    pub created_at: DateTime<Utc>,
}
