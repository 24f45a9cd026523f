// src/pools/squares.rs
use chrono::Utc;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::models::pool::{Pool, PoolKind};
use crate::models::squares::{Square, SquaresBoard, WinningSquareResponse};
use crate::pools::pools::PoolService;
use crate::pools::validation::PoolValidator;
use crate::scoring::squares::winning_square;

/// Service for squares pools: claiming grid cells, the one-time digit
/// shuffle, and winning-square lookup against a game's scores.
pub struct SquaresService {
    pool: PgPool,
    validator: PoolValidator,
}

impl SquaresService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            validator: PoolValidator::new(),
        }
    }

    fn require_squares_pool(pool_record: &Pool) -> Result<(), PoolError> {
        if pool_record.kind != PoolKind::Squares {
            return Err(PoolError::validation("Not a squares pool"));
        }
        Ok(())
    }

    pub async fn board(&self, pool_id: Uuid) -> Result<Option<SquaresBoard>, PoolError> {
        let board =
            sqlx::query_as::<_, SquaresBoard>("SELECT * FROM squares_boards WHERE pool_id = $1")
                .bind(pool_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(board)
    }

    pub async fn list_squares(&self, pool_id: Uuid) -> Result<Vec<Square>, PoolError> {
        let squares = sqlx::query_as::<_, Square>(
            "SELECT * FROM squares WHERE pool_id = $1 ORDER BY row_idx ASC, col_idx ASC",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(squares)
    }

    /// Claim one cell for the caller's entry. Closed once the digits
    /// have been assigned: the shuffle happens only after the grid is
    /// sold, and claims after it would let buyers pick known digits.
    pub async fn claim_square(
        &self,
        pool_record: &Pool,
        user_id: Uuid,
        row_idx: i32,
        col_idx: i32,
    ) -> Result<Square, PoolError> {
        Self::require_squares_pool(pool_record)?;
        self.validator.validate_square_indices(row_idx, col_idx)?;

        if let Some(board) = self.board(pool_record.id).await? {
            if board.row_digits.is_some() {
                return Err(PoolError::conflict(
                    "Digits are assigned; the grid is closed",
                ));
            }
        }

        let entry = sqlx::query_as::<_, crate::models::entry::Entry>(
            "SELECT * FROM entries WHERE pool_id = $1 AND user_id = $2",
        )
        .bind(pool_record.id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PoolError::NotFound("Entry"))?;

        let taken: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM squares WHERE pool_id = $1 AND row_idx = $2 AND col_idx = $3",
        )
        .bind(pool_record.id)
        .bind(row_idx)
        .bind(col_idx)
        .fetch_optional(&self.pool)
        .await?;
        if taken.is_some() {
            return Err(PoolError::conflict("Square is already claimed"));
        }

        let square = sqlx::query_as::<_, Square>(
            r#"
            INSERT INTO squares (id, pool_id, row_idx, col_idx, owner_entry_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pool_record.id)
        .bind(row_idx)
        .bind(col_idx)
        .bind(entry.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(square)
    }

    /// Shuffle and persist the axis digits. Runs exactly once per pool.
    #[tracing::instrument(name = "Assign square digits", skip(self, pool_record), fields(pool_id = %pool_record.id))]
    pub async fn assign_digits(
        &self,
        pool_record: &Pool,
        user_id: Uuid,
    ) -> Result<SquaresBoard, PoolError> {
        PoolService::require_commissioner(pool_record, user_id)?;
        Self::require_squares_pool(pool_record)?;

        if let Some(board) = self.board(pool_record.id).await? {
            if board.row_digits.is_some() {
                return Err(PoolError::conflict("Digits have already been assigned"));
            }
        }

        let mut rng = rand::thread_rng();
        let mut row_digits: Vec<i32> = (0..10).collect();
        let mut col_digits: Vec<i32> = (0..10).collect();
        row_digits.shuffle(&mut rng);
        col_digits.shuffle(&mut rng);

        let board = sqlx::query_as::<_, SquaresBoard>(
            r#"
            INSERT INTO squares_boards (pool_id, row_digits, col_digits, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (pool_id) DO UPDATE
                SET row_digits = EXCLUDED.row_digits, col_digits = EXCLUDED.col_digits
                WHERE squares_boards.row_digits IS NULL
            RETURNING *
            "#,
        )
        .bind(pool_record.id)
        .bind(&row_digits)
        .bind(&col_digits)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Assigned digits for squares pool {}", pool_record.id);
        Ok(board)
    }

    /// Who holds the winning square for a game's current scores. `None`
    /// data (missing scores, unshuffled board, unclaimed cell) comes
    /// back as a 404-shaped NotFound at the handler.
    pub async fn winning_square_for_game(
        &self,
        pool_id: Uuid,
        game_id: Uuid,
    ) -> Result<Option<WinningSquareResponse>, PoolError> {
        let game = sqlx::query_as::<_, crate::models::game::GameRecord>(
            "SELECT * FROM games WHERE id = $1 AND pool_id = $2",
        )
        .bind(game_id)
        .bind(pool_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PoolError::NotFound("Game"))?;

        let Some(board) = self.board(game.pool_id).await? else {
            return Ok(None);
        };

        let Some((row_idx, col_idx)) = winning_square(game.higher_score, game.lower_score, &board)
        else {
            return Ok(None);
        };

        let owner: Option<(Option<Uuid>,)> = sqlx::query_as(
            "SELECT owner_entry_id FROM squares WHERE pool_id = $1 AND row_idx = $2 AND col_idx = $3",
        )
        .bind(game.pool_id)
        .bind(row_idx)
        .bind(col_idx)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(WinningSquareResponse {
            row_idx,
            col_idx,
            owner_entry_id: owner.and_then(|(id,)| id),
        }))
    }
}
