// src/pools/games.rs
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::models::game::{CreateGameRequest, GameRecord, GameWithVerdict, ReportScoreRequest};
use crate::models::pool::Pool;
use crate::pools::brackets::BracketService;
use crate::pools::pools::PoolService;
use crate::pools::validation::PoolValidator;
use crate::scoring::evaluator::{evaluate, GameStatus, Verdict};

/// Service for individual game operations: creation, spread entry and
/// commissioner score reporting. Scoring itself is delegated to the pure
/// evaluator; this service only persists and re-propagates.
pub struct GameService {
    pool: PgPool,
    brackets: BracketService,
    validator: PoolValidator,
}

impl GameService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            brackets: BracketService::new(pool.clone()),
            pool,
            validator: PoolValidator::new(),
        }
    }

    pub async fn create_game(
        &self,
        pool_record: &Pool,
        user_id: Uuid,
        request: CreateGameRequest,
    ) -> Result<GameRecord, PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;
        self.validator
            .validate_slot(request.slot, request.round, request.next_slot)?;
        if let Some(spread) = request.spread {
            self.validator.validate_spread(spread)?;
        }

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM games WHERE pool_id = $1 AND slot = $2")
                .bind(pool_record.id)
                .bind(request.slot)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(PoolError::conflict(format!(
                "Slot {} is already taken in this pool",
                request.slot
            )));
        }

        let now = Utc::now();
        let game = sqlx::query_as::<_, GameRecord>(
            r#"
            INSERT INTO games (
                id, pool_id, round, slot, next_slot, feeds_higher_side,
                higher_team, lower_team, higher_seed, lower_seed,
                spread, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'scheduled', $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pool_record.id)
        .bind(request.round)
        .bind(request.slot)
        .bind(request.next_slot)
        .bind(request.feeds_higher_side.unwrap_or(true))
        .bind(&request.higher_team)
        .bind(&request.lower_team)
        .bind(request.higher_seed)
        .bind(request.lower_seed)
        .bind(request.spread)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "Created game in pool {} (round {}, slot {})",
            pool_record.id,
            game.round,
            game.slot
        );
        Ok(game)
    }

    pub async fn get_game(&self, game_id: Uuid) -> Result<GameRecord, PoolError> {
        sqlx::query_as::<_, GameRecord>("SELECT * FROM games WHERE id = $1")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PoolError::NotFound("Game"))
    }

    /// All games of a pool, each with its evaluated verdict. The same
    /// evaluator call grades one game or a whole list.
    pub async fn list_games(&self, pool_id: Uuid) -> Result<Vec<GameWithVerdict>, PoolError> {
        let games = sqlx::query_as::<_, GameRecord>(
            "SELECT * FROM games WHERE pool_id = $1 ORDER BY round ASC, slot ASC",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(games
            .into_iter()
            .map(|game| {
                let verdict = evaluate(&game.snapshot());
                GameWithVerdict { game, verdict }
            })
            .collect())
    }

    pub async fn verdict(&self, pool_id: Uuid, game_id: Uuid) -> Result<GameWithVerdict, PoolError> {
        let game = self.get_game(game_id).await?;
        if game.pool_id != pool_id {
            return Err(PoolError::NotFound("Game"));
        }
        let verdict = evaluate(&game.snapshot());
        Ok(GameWithVerdict { game, verdict })
    }

    /// Set or clear the point spread. Rejected once the game is final:
    /// a line change after grading would silently alter results.
    pub async fn set_spread(
        &self,
        pool_record: &Pool,
        game_id: Uuid,
        user_id: Uuid,
        spread: Option<f64>,
    ) -> Result<GameRecord, PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;
        if let Some(value) = spread {
            self.validator.validate_spread(value)?;
        }

        let game = self.get_game(game_id).await?;
        if game.pool_id != pool_record.id {
            return Err(PoolError::NotFound("Game"));
        }
        if game.status == GameStatus::Final {
            return Err(PoolError::conflict("Cannot change the spread of a final game"));
        }

        let updated = sqlx::query_as::<_, GameRecord>(
            "UPDATE games SET spread = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(spread)
        .bind(Utc::now())
        .bind(game_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Report a score. Validates the status transition and the scores,
    /// persists, re-runs the evaluator, and propagates bracket
    /// advancement when the game is final. Re-entering final with
    /// corrected scores re-runs the whole chain; the evaluator is pure,
    /// so repeating it is safe.
    #[tracing::instrument(name = "Report score", skip(self, pool_record), fields(game_id = %game_id))]
    pub async fn report_score(
        &self,
        pool_record: &Pool,
        game_id: Uuid,
        user_id: Uuid,
        request: ReportScoreRequest,
    ) -> Result<(GameRecord, Verdict), PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;

        let game = self.get_game(game_id).await?;
        if game.pool_id != pool_record.id {
            return Err(PoolError::NotFound("Game"));
        }

        self.validator
            .validate_status_transition(game.status, request.status)?;
        self.validator
            .validate_scores(request.higher_score, request.lower_score, request.status)?;
        if request.status == GameStatus::Final
            && (game.higher_team.is_none() || game.lower_team.is_none())
        {
            return Err(PoolError::validation(
                "Both sides must be assigned before a game can go final",
            ));
        }

        let updated = sqlx::query_as::<_, GameRecord>(
            r#"
            UPDATE games
            SET higher_score = $1, lower_score = $2, status = $3, updated_at = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(request.higher_score)
        .bind(request.lower_score)
        .bind(request.status)
        .bind(Utc::now())
        .bind(game_id)
        .fetch_one(&self.pool)
        .await?;

        let verdict = evaluate(&updated.snapshot());

        if updated.status == GameStatus::Final {
            self.brackets
                .propagate_result(pool_record, &updated, &verdict)
                .await?;
        }

        tracing::info!(
            "Game {} now {}: {} - {} (winner: {:?}, covering: {:?}, push: {})",
            game_id,
            updated.status.as_str(),
            request.higher_score,
            request.lower_score,
            verdict.winner,
            verdict.covering_side,
            verdict.push
        );

        Ok((updated, verdict))
    }
}
