// src/pools/cascade.rs
//
// Two-phase destructive edit. Changing a team on a game invalidates the
// picks made against it and everything the game fed downstream, so the
// operation is split: `preview_team_change` reports the blast radius
// without mutating, `confirm_team_change` re-checks and applies it in
// one transaction.
use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::models::game::{CascadeImpact, GameRecord, TeamChangeRequest};
use crate::models::pool::Pool;
use crate::pools::pools::PoolService;
use crate::scoring::evaluator::{GameStatus, Side};

pub struct CascadeService {
    pool: PgPool,
}

impl CascadeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get_game(&self, pool_id: Uuid, game_id: Uuid) -> Result<GameRecord, PoolError> {
        sqlx::query_as::<_, GameRecord>("SELECT * FROM games WHERE id = $1 AND pool_id = $2")
            .bind(game_id)
            .bind(pool_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PoolError::NotFound("Game"))
    }

    /// Games reachable through the next_slot chain from this game, in
    /// feed order. Visited slots bound the walk against cyclic linkage.
    async fn downstream_games(&self, game: &GameRecord) -> Result<Vec<GameRecord>, PoolError> {
        let mut downstream = Vec::new();
        let mut visited = HashSet::new();
        let mut slot = game.next_slot;

        while let Some(current) = slot {
            if !visited.insert(current) {
                tracing::warn!(
                    "Pool {} has a next_slot cycle at slot {}",
                    game.pool_id,
                    current
                );
                break;
            }
            let next: Option<GameRecord> =
                sqlx::query_as("SELECT * FROM games WHERE pool_id = $1 AND slot = $2")
                    .bind(game.pool_id)
                    .bind(current)
                    .fetch_optional(&self.pool)
                    .await?;
            let Some(next) = next else { break };
            slot = next.next_slot;
            downstream.push(next);
        }

        Ok(downstream)
    }

    /// The full blast radius: picks on the edited game and on every
    /// downstream game, since the confirm step deletes both. Returns the
    /// downstream list alongside so confirm clears exactly what it
    /// counted.
    async fn impact_for(
        &self,
        game: &GameRecord,
    ) -> Result<(CascadeImpact, Vec<GameRecord>), PoolError> {
        let downstream = self.downstream_games(game).await?;

        let mut game_ids: Vec<Uuid> = Vec::with_capacity(downstream.len() + 1);
        game_ids.push(game.id);
        game_ids.extend(downstream.iter().map(|g| g.id));

        let (dependent_picks,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM picks WHERE game_id = ANY($1)")
                .bind(&game_ids)
                .fetch_one(&self.pool)
                .await?;

        let impact = CascadeImpact {
            dependent_picks,
            downstream_games: downstream.len() as i64,
            clears_result: game.status != GameStatus::Scheduled,
        };
        Ok((impact, downstream))
    }

    pub async fn preview_team_change(
        &self,
        pool_record: &Pool,
        game_id: Uuid,
        user_id: Uuid,
    ) -> Result<CascadeImpact, PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;
        let game = self.get_game(pool_record.id, game_id).await?;
        let (impact, _) = self.impact_for(&game).await?;
        Ok(impact)
    }

    /// Apply the team change: swap the side's team, wipe the game's
    /// result, delete dependent picks, and clear every downstream slot
    /// this game fed. Returns the impact that was actually applied so
    /// the caller can compare it with the preview it showed.
    #[tracing::instrument(name = "Confirm team change", skip(self, pool_record, request), fields(game_id = %game_id))]
    pub async fn confirm_team_change(
        &self,
        pool_record: &Pool,
        game_id: Uuid,
        user_id: Uuid,
        request: TeamChangeRequest,
    ) -> Result<CascadeImpact, PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;
        if request.new_team.trim().is_empty() {
            return Err(PoolError::validation("Team name cannot be empty"));
        }

        let game = self.get_game(pool_record.id, game_id).await?;
        let (impact, downstream) = self.impact_for(&game).await?;

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        sqlx::query("DELETE FROM picks WHERE game_id = $1")
            .bind(game_id)
            .execute(&mut *tx)
            .await?;

        let update = match request.side {
            Side::Higher => {
                "UPDATE games SET higher_team = $1, higher_owner_id = NULL,
                 higher_score = NULL, lower_score = NULL, status = 'scheduled',
                 updated_at = $2 WHERE id = $3"
            }
            Side::Lower => {
                "UPDATE games SET lower_team = $1, lower_owner_id = NULL,
                 higher_score = NULL, lower_score = NULL, status = 'scheduled',
                 updated_at = $2 WHERE id = $3"
            }
        };
        sqlx::query(update)
            .bind(request.new_team.trim())
            .bind(now)
            .bind(game_id)
            .execute(&mut *tx)
            .await?;

        // Clear the chain this game fed: each downstream game loses the
        // side filled from upstream and any result built on it.
        let mut into_higher = game.feeds_higher_side;
        for next in &downstream {
            let clear = if into_higher {
                "UPDATE games SET higher_team = NULL, higher_seed = NULL,
                 higher_owner_id = NULL, higher_score = NULL, lower_score = NULL,
                 status = 'scheduled', updated_at = $1 WHERE id = $2"
            } else {
                "UPDATE games SET lower_team = NULL, lower_seed = NULL,
                 lower_owner_id = NULL, higher_score = NULL, lower_score = NULL,
                 status = 'scheduled', updated_at = $1 WHERE id = $2"
            };
            sqlx::query(clear)
                .bind(now)
                .bind(next.id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM picks WHERE game_id = $1")
                .bind(next.id)
                .execute(&mut *tx)
                .await?;

            into_higher = next.feeds_higher_side;
        }

        tx.commit().await?;

        tracing::info!(
            "Team change on game {} removed {} picks and cleared {} downstream games",
            game_id,
            impact.dependent_picks,
            impact.downstream_games
        );
        Ok(impact)
    }
}
