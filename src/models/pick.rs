// src/models/pick.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::advancement::PickOutcome;
use crate::scoring::evaluator::Side;

/// A stored pick. Bowl pick'em picks reference a game and a side; golf
/// picks carry a tier and golfer name instead. Grading is derived at
/// read time, never stored.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Pick {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub entry_id: Uuid,
    pub game_id: Option<Uuid>,
    pub picked_side: Option<Side>,
    pub tier: Option<i32>,
    pub golfer: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GamePickRequest {
    pub game_id: Uuid,
    pub picked_side: Side,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GolfPickRequest {
    pub tier: i32,
    pub golfer: String,
}

/// One entry's submission. Either game picks or golf picks depending on
/// the pool kind.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmitPicksRequest {
    #[serde(default)]
    pub game_picks: Vec<GamePickRequest>,
    #[serde(default)]
    pub golf_picks: Vec<GolfPickRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradedPick {
    pub pick: Pick,
    pub outcome: PickOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub entry_id: Uuid,
    pub display_name: String,
    pub won: u32,
    pub lost: u32,
    pub pushed: u32,
    pub pending: u32,
}
