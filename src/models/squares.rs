use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Digit assignment for a squares grid. Both axes stay NULL until the
/// commissioner runs the shuffle, which happens exactly once.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct SquaresBoard {
    pub pool_id: Uuid,
    pub row_digits: Option<Vec<i32>>,
    pub col_digits: Option<Vec<i32>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Square {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub row_idx: i32,
    pub col_idx: i32,
    pub owner_entry_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimSquareRequest {
    pub row_idx: i32,
    pub col_idx: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WinningSquareResponse {
    pub row_idx: i32,
    pub col_idx: i32,
    pub owner_entry_id: Option<Uuid>,
}
