// src/models/game.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::evaluator::{GameSnapshot, GameStatus, Verdict};

/// One scheduled matchup between two sides. The better-seeded side is
/// "higher", the other "lower". Scores and spread stay NULL until the
/// commissioner reports them.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct GameRecord {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub round: i32,
    pub slot: i32,
    pub next_slot: Option<i32>,
    pub feeds_higher_side: bool,
    pub higher_team: Option<String>,
    pub lower_team: Option<String>,
    pub higher_seed: Option<i32>,
    pub lower_seed: Option<i32>,
    pub higher_score: Option<i32>,
    pub lower_score: Option<i32>,
    pub spread: Option<f64>,
    pub status: GameStatus,
    pub higher_owner_id: Option<Uuid>,
    pub lower_owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameRecord {
    /// Immutable snapshot for the evaluator.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            higher_score: self.higher_score,
            lower_score: self.lower_score,
            spread: self.spread,
        }
    }
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateGameRequest {
    pub round: i32,
    pub slot: i32,
    pub next_slot: Option<i32>,
    pub feeds_higher_side: Option<bool>,
    pub higher_team: Option<String>,
    pub lower_team: Option<String>,
    pub higher_seed: Option<i32>,
    pub lower_seed: Option<i32>,
    pub spread: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportScoreRequest {
    pub higher_score: i32,
    pub lower_score: i32,
    pub status: GameStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetSpreadRequest {
    pub spread: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameWithVerdict {
    pub game: GameRecord,
    pub verdict: Verdict,
}

/// What a destructive team change would take with it. Returned by the
/// preview step and re-checked by the confirm step.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CascadeImpact {
    pub dependent_picks: i64,
    pub downstream_games: i64,
    pub clears_result: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamChangeRequest {
    pub side: crate::scoring::evaluator::Side,
    pub new_team: String,
}
