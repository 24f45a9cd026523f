// src/pools/brackets.rs
use chrono::Utc;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::models::entry::Entry;
use crate::models::game::GameRecord;
use crate::models::pool::{Pool, PoolKind};
use crate::pools::pools::PoolService;
use crate::scoring::advancement::advancing_side;
use crate::scoring::evaluator::{Side, Verdict};

/// Service for single-elimination bracket mechanics: slot linkage, the
/// March Madness blind draw, and elimination flags. Who advances is
/// decided by the pure scoring module; this service only moves the
/// result through the slot graph.
pub struct BracketService {
    pool: PgPool,
}

impl BracketService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Push a final game's outcome into the bracket. Idempotent: called
    /// again after a score correction it overwrites the fed slot and
    /// resets anything downstream that the correction invalidated.
    pub async fn propagate_result(
        &self,
        pool_record: &Pool,
        game: &GameRecord,
        verdict: &Verdict,
    ) -> Result<(), PoolError> {
        if !pool_record.kind.is_bracket() {
            return Ok(());
        }

        self.update_elimination(pool_record, game, verdict).await?;

        let Some(next_slot) = game.next_slot else {
            return Ok(());
        };

        let side = advancing_side(verdict, pool_record.advancement_rule, pool_record.push_rule);

        let (team, seed, owner) = match side {
            Some(Side::Higher) => (
                game.higher_team.clone(),
                game.higher_seed,
                game.higher_owner_id,
            ),
            Some(Side::Lower) => (
                game.lower_team.clone(),
                game.lower_seed,
                game.lower_owner_id,
            ),
            // Voided push: the slot stays empty until the commissioner
            // resolves the game.
            None => (None, None, None),
        };

        self.feed_slot(pool_record.id, next_slot, game.feeds_higher_side, team, seed, owner)
            .await
    }

    /// Write one side of a downstream game and reset everything past it
    /// if the occupant changed.
    async fn feed_slot(
        &self,
        pool_id: Uuid,
        slot: i32,
        feeds_higher_side: bool,
        team: Option<String>,
        seed: Option<i32>,
        owner: Option<Uuid>,
    ) -> Result<(), PoolError> {
        // Iterative walk down the next_slot chain; the first write may
        // invalidate every game after it. Visited slots bound the walk
        // in case the stored linkage loops back on itself.
        let mut visited = std::collections::HashSet::new();
        let mut cursor = Some((slot, feeds_higher_side, team, seed, owner));
        let mut invalidated = false;

        while let Some((slot, into_higher, team, seed, owner)) = cursor.take() {
            if !visited.insert(slot) {
                tracing::warn!("Pool {} has a next_slot cycle at slot {}", pool_id, slot);
                return Ok(());
            }
            let next: Option<GameRecord> =
                sqlx::query_as("SELECT * FROM games WHERE pool_id = $1 AND slot = $2")
                    .bind(pool_id)
                    .bind(slot)
                    .fetch_optional(&self.pool)
                    .await?;

            let Some(next) = next else {
                tracing::warn!("Pool {} has a dangling next_slot {}", pool_id, slot);
                return Ok(());
            };

            let current_team = if into_higher {
                next.higher_team.clone()
            } else {
                next.lower_team.clone()
            };

            if !invalidated && current_team == team {
                // Same occupant, nothing downstream changes. Still sync
                // the owner in case a re-draw moved entries around.
                self.write_side(next.id, into_higher, &team, seed, owner, false)
                    .await?;
                return Ok(());
            }

            // Occupant changed: overwrite this side and wipe the game's
            // own result, then keep walking to clear the slots it fed.
            invalidated = true;
            self.write_side(next.id, into_higher, &team, seed, owner, true)
                .await?;
            tracing::info!(
                "Reset game at slot {} in pool {} after upstream change",
                next.slot,
                pool_id
            );

            cursor = next
                .next_slot
                .map(|downstream| (downstream, next.feeds_higher_side, None, None, None));
        }

        Ok(())
    }

    async fn write_side(
        &self,
        game_id: Uuid,
        into_higher: bool,
        team: &Option<String>,
        seed: Option<i32>,
        owner: Option<Uuid>,
        reset_result: bool,
    ) -> Result<(), PoolError> {
        let query = match (into_higher, reset_result) {
            (true, false) => {
                "UPDATE games SET higher_team = $1, higher_seed = $2, higher_owner_id = $3,
                 updated_at = $4 WHERE id = $5"
            }
            (false, false) => {
                "UPDATE games SET lower_team = $1, lower_seed = $2, lower_owner_id = $3,
                 updated_at = $4 WHERE id = $5"
            }
            (true, true) => {
                "UPDATE games SET higher_team = $1, higher_seed = $2, higher_owner_id = $3,
                 updated_at = $4, higher_score = NULL, lower_score = NULL,
                 status = 'scheduled' WHERE id = $5"
            }
            (false, true) => {
                "UPDATE games SET lower_team = $1, lower_seed = $2, lower_owner_id = $3,
                 updated_at = $4, higher_score = NULL, lower_score = NULL,
                 status = 'scheduled' WHERE id = $5"
            }
        };

        sqlx::query(query)
            .bind(team)
            .bind(seed)
            .bind(owner)
            .bind(Utc::now())
            .bind(game_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// March Madness elimination flags: the losing side's owner is out,
    /// the advancing side's owner is (re)instated. Score corrections can
    /// flip both.
    async fn update_elimination(
        &self,
        pool_record: &Pool,
        game: &GameRecord,
        verdict: &Verdict,
    ) -> Result<(), PoolError> {
        if pool_record.kind != PoolKind::MarchMadness {
            return Ok(());
        }
        let Some(winner) = verdict.winner else {
            return Ok(());
        };

        let (advancing_owner, eliminated_owner) = match winner {
            Side::Higher => (game.higher_owner_id, game.lower_owner_id),
            Side::Lower => (game.lower_owner_id, game.higher_owner_id),
        };

        if let Some(owner) = eliminated_owner {
            sqlx::query("UPDATE entries SET eliminated = TRUE WHERE id = $1")
                .bind(owner)
                .execute(&self.pool)
                .await?;
        }
        if let Some(owner) = advancing_owner {
            sqlx::query("UPDATE entries SET eliminated = FALSE WHERE id = $1")
                .bind(owner)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Blind draw: randomly assign every entry to one first-round side.
    /// Commissioner-only, March Madness pools, and only while no game
    /// has started. Requires exactly one entry per side so the draw is
    /// fair by construction.
    #[tracing::instrument(name = "Run blind draw", skip(self, pool_record), fields(pool_id = %pool_record.id))]
    pub async fn run_draw(&self, pool_record: &Pool, user_id: Uuid) -> Result<(), PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;
        if pool_record.kind != PoolKind::MarchMadness {
            return Err(PoolError::validation(
                "Blind draw only applies to March Madness pools",
            ));
        }

        let started: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM games WHERE pool_id = $1 AND status <> 'scheduled' LIMIT 1")
                .bind(pool_record.id)
                .fetch_optional(&self.pool)
                .await?;
        if started.is_some() {
            return Err(PoolError::conflict(
                "Cannot run the draw once games have started",
            ));
        }

        let (first_round,): (Option<i32>,) =
            sqlx::query_as("SELECT MIN(round) FROM games WHERE pool_id = $1")
                .bind(pool_record.id)
                .fetch_one(&self.pool)
                .await?;
        let Some(first_round) = first_round else {
            return Err(PoolError::validation("Pool has no games to draw into"));
        };

        let games = sqlx::query_as::<_, GameRecord>(
            "SELECT * FROM games WHERE pool_id = $1 AND round = $2 ORDER BY slot ASC",
        )
        .bind(pool_record.id)
        .bind(first_round)
        .fetch_all(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE pool_id = $1 ORDER BY created_at ASC",
        )
        .bind(pool_record.id)
        .fetch_all(&self.pool)
        .await?;

        let sides = games.len() * 2;
        if entries.len() != sides {
            return Err(PoolError::validation(format!(
                "Draw needs exactly {} entries (one per side), have {}",
                sides,
                entries.len()
            )));
        }

        let mut shuffled: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        shuffled.shuffle(&mut rand::thread_rng());

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for (game, pair) in games.iter().zip(shuffled.chunks(2)) {
            sqlx::query(
                r#"
                UPDATE games
                SET higher_owner_id = $1, lower_owner_id = $2, updated_at = $3
                WHERE id = $4
                "#,
            )
            .bind(pair[0])
            .bind(pair[1])
            .bind(now)
            .bind(game.id)
            .execute(&mut *tx)
            .await?;
        }

        // A fresh draw clears any stale elimination flags
        sqlx::query("UPDATE entries SET eliminated = FALSE WHERE pool_id = $1")
            .bind(pool_record.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Blind draw assigned {} entries across {} first-round games",
            shuffled.len(),
            games.len()
        );
        Ok(())
    }

    /// Entries still alive in the bracket, for standings displays.
    pub async fn surviving_entries(&self, pool_id: Uuid) -> Result<Vec<Entry>, PoolError> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE pool_id = $1 AND eliminated = FALSE ORDER BY created_at ASC",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
