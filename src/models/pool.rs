// src/models/pool.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What kind of contest a pool runs. Determines which operations
/// (draw, squares, bracket propagation) apply to it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    BowlPicks,
    CfpBracket,
    MarchMadness,
    Squares,
    GolfTiers,
}

impl PoolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::BowlPicks => "bowl_picks",
            PoolKind::CfpBracket => "cfp_bracket",
            PoolKind::MarchMadness => "march_madness",
            PoolKind::Squares => "squares",
            PoolKind::GolfTiers => "golf_tiers",
        }
    }

    /// Pool kinds whose games feed a single-elimination bracket.
    pub fn is_bracket(&self) -> bool {
        matches!(self, PoolKind::CfpBracket | PoolKind::MarchMadness)
    }
}

/// Which side of a game an entry advances on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdvancementRule {
    StraightUp,
    AgainstSpread,
}

/// What happens when a spread comparison lands exactly on the number.
/// `WinnerAdvances`: the straight-up winner's owner still advances.
/// `Void`: nobody advances until the commissioner resolves the game.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PushRule {
    WinnerAdvances,
    Void,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Pool {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub kind: PoolKind,
    pub commissioner_id: Uuid,
    pub advancement_rule: AdvancementRule,
    pub push_rule: PushRule,
    pub lock_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pool {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_time.map(|t| now >= t).unwrap_or(false)
    }
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePoolRequest {
    pub name: String,
    pub kind: PoolKind,
    pub advancement_rule: Option<AdvancementRule>,
    pub push_rule: Option<PushRule>,
    pub lock_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinPoolRequest {
    pub display_name: String,
}
