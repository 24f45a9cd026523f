// src/pools/picks.rs
use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::models::entry::Entry;
use crate::models::game::GameRecord;
use crate::models::pick::{GradedPick, LeaderboardRow, Pick, SubmitPicksRequest};
use crate::models::pool::{Pool, PoolKind};
use crate::pools::validation::PoolValidator;
use crate::scoring::advancement::{grade_pick, PickOutcome};
use crate::scoring::evaluator::{evaluate, GameStatus, Verdict};

/// Service for pick submission and leaderboard grading. Grading reuses
/// the pure evaluator on every read; graded results are never stored.
pub struct PickService {
    pool: PgPool,
    validator: PoolValidator,
}

impl PickService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            validator: PoolValidator::new(),
        }
    }

    /// Replace the caller's picks for the pool. Rejected after the
    /// pool's lock time, and game picks are rejected once their game has
    /// started.
    #[tracing::instrument(name = "Submit picks", skip(self, pool_record, request), fields(pool_id = %pool_record.id))]
    pub async fn submit_picks(
        &self,
        pool_record: &Pool,
        user_id: Uuid,
        request: SubmitPicksRequest,
    ) -> Result<Vec<Pick>, PoolError> {
        if pool_record.is_locked(Utc::now()) {
            return Err(PoolError::conflict("Pool is locked; picks are closed"));
        }

        let entry = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE pool_id = $1 AND user_id = $2",
        )
        .bind(pool_record.id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PoolError::NotFound("Entry"))?;

        match pool_record.kind {
            PoolKind::GolfTiers => {
                self.validator.validate_golf_picks(&request.golf_picks)?;
                if !request.game_picks.is_empty() {
                    return Err(PoolError::validation(
                        "Golf pools take tier picks, not game picks",
                    ));
                }
            }
            _ => {
                self.validator.validate_game_picks(&request.game_picks)?;
                if !request.golf_picks.is_empty() {
                    return Err(PoolError::validation(
                        "Tier picks only apply to golf pools",
                    ));
                }
            }
        }

        // Game picks must reference this pool's games, none of which may
        // have started.
        for pick in &request.game_picks {
            let game = sqlx::query_as::<_, GameRecord>(
                "SELECT * FROM games WHERE id = $1 AND pool_id = $2",
            )
            .bind(pick.game_id)
            .bind(pool_record.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PoolError::NotFound("Game"))?;

            if game.status != GameStatus::Scheduled {
                return Err(PoolError::conflict(format!(
                    "Game at slot {} has already started",
                    game.slot
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM picks WHERE entry_id = $1")
            .bind(entry.id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        let mut stored = Vec::with_capacity(request.game_picks.len() + request.golf_picks.len());

        for pick in &request.game_picks {
            let row = sqlx::query_as::<_, Pick>(
                r#"
                INSERT INTO picks (id, pool_id, entry_id, game_id, picked_side, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(pool_record.id)
            .bind(entry.id)
            .bind(pick.game_id)
            .bind(pick.picked_side)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        for pick in &request.golf_picks {
            let row = sqlx::query_as::<_, Pick>(
                r#"
                INSERT INTO picks (id, pool_id, entry_id, tier, golfer, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(pool_record.id)
            .bind(entry.id)
            .bind(pick.tier)
            .bind(pick.golfer.trim())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;

        tracing::info!(
            "Entry {} submitted {} picks in pool {}",
            entry.id,
            stored.len(),
            pool_record.id
        );
        Ok(stored)
    }

    /// Grade every entry's game picks against current verdicts and rank
    /// them. Pending games count as pending, not losses, so the board is
    /// meaningful mid-season.
    pub async fn leaderboard(&self, pool_record: &Pool) -> Result<Vec<LeaderboardRow>, PoolError> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE pool_id = $1 ORDER BY created_at ASC",
        )
        .bind(pool_record.id)
        .fetch_all(&self.pool)
        .await?;

        let games = sqlx::query_as::<_, GameRecord>("SELECT * FROM games WHERE pool_id = $1")
            .bind(pool_record.id)
            .fetch_all(&self.pool)
            .await?;
        let verdicts: HashMap<Uuid, Verdict> = games
            .iter()
            .map(|g| (g.id, evaluate(&g.snapshot())))
            .collect();

        let picks = sqlx::query_as::<_, Pick>("SELECT * FROM picks WHERE pool_id = $1")
            .bind(pool_record.id)
            .fetch_all(&self.pool)
            .await?;

        let mut rows: HashMap<Uuid, LeaderboardRow> = entries
            .iter()
            .map(|e| {
                (
                    e.id,
                    LeaderboardRow {
                        entry_id: e.id,
                        display_name: e.display_name.clone(),
                        won: 0,
                        lost: 0,
                        pushed: 0,
                        pending: 0,
                    },
                )
            })
            .collect();

        for pick in &picks {
            let (Some(game_id), Some(side)) = (pick.game_id, pick.picked_side) else {
                // Golf picks are not game-graded
                continue;
            };
            let Some(verdict) = verdicts.get(&game_id) else {
                continue;
            };
            let Some(row) = rows.get_mut(&pick.entry_id) else {
                continue;
            };
            match grade_pick(side, verdict, pool_record.advancement_rule) {
                PickOutcome::Won => row.won += 1,
                PickOutcome::Lost => row.lost += 1,
                PickOutcome::Push => row.pushed += 1,
                PickOutcome::Pending => row.pending += 1,
            }
        }

        let mut leaderboard: Vec<LeaderboardRow> = rows.into_values().collect();
        leaderboard.sort_by(|a, b| {
            b.won
                .cmp(&a.won)
                .then(b.pushed.cmp(&a.pushed))
                .then(a.display_name.cmp(&b.display_name))
        });
        Ok(leaderboard)
    }

    pub async fn picks_for_entry(&self, entry_id: Uuid) -> Result<Vec<Pick>, PoolError> {
        let picks = sqlx::query_as::<_, Pick>(
            "SELECT * FROM picks WHERE entry_id = $1 ORDER BY created_at ASC",
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(picks)
    }

    /// One entry's picks with their current grading. Golf picks have no
    /// game verdict and stay pending.
    pub async fn graded_picks_for_entry(
        &self,
        pool_record: &Pool,
        entry_id: Uuid,
    ) -> Result<Vec<GradedPick>, PoolError> {
        let picks = self.picks_for_entry(entry_id).await?;

        let games = sqlx::query_as::<_, GameRecord>("SELECT * FROM games WHERE pool_id = $1")
            .bind(pool_record.id)
            .fetch_all(&self.pool)
            .await?;
        let verdicts: HashMap<Uuid, Verdict> = games
            .iter()
            .map(|g| (g.id, evaluate(&g.snapshot())))
            .collect();

        Ok(picks
            .into_iter()
            .map(|pick| {
                let outcome = match (pick.game_id, pick.picked_side) {
                    (Some(game_id), Some(side)) => verdicts
                        .get(&game_id)
                        .map(|verdict| grade_pick(side, verdict, pool_record.advancement_rule))
                        .unwrap_or(PickOutcome::Pending),
                    _ => PickOutcome::Pending,
                };
                GradedPick { pick, outcome }
            })
            .collect())
    }
}
