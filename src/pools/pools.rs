// src/pools/pools.rs
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::models::entry::Entry;
use crate::models::pool::{AdvancementRule, CreatePoolRequest, Pool, PushRule};
use crate::pools::validation::PoolValidator;
use crate::utils::slug::slugify;

/// Service for pool lifecycle and membership.
pub struct PoolService {
    pool: PgPool,
    validator: PoolValidator,
}

impl PoolService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            validator: PoolValidator::new(),
        }
    }

    pub async fn create_pool(
        &self,
        commissioner_id: Uuid,
        request: CreatePoolRequest,
    ) -> Result<Pool, PoolError> {
        self.validator.validate_pool_name(&request.name)?;

        let slug = slugify(&request.name);
        if slug.is_empty() {
            return Err(PoolError::validation(
                "Pool name does not produce a usable slug",
            ));
        }

        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM pools WHERE slug = $1")
            .bind(&slug)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(PoolError::conflict(format!(
                "A pool with slug '{}' already exists",
                slug
            )));
        }

        let now = Utc::now();
        let created = sqlx::query_as::<_, Pool>(
            r#"
            INSERT INTO pools (
                id, name, slug, kind, commissioner_id,
                advancement_rule, push_rule, lock_time, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(&slug)
        .bind(request.kind)
        .bind(commissioner_id)
        .bind(request.advancement_rule.unwrap_or(AdvancementRule::StraightUp))
        .bind(request.push_rule.unwrap_or(PushRule::WinnerAdvances))
        .bind(request.lock_time)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created {} pool '{}' ({})", created.kind.as_str(), created.name, created.id);
        Ok(created)
    }

    pub async fn get_pool(&self, pool_id: Uuid) -> Result<Pool, PoolError> {
        sqlx::query_as::<_, Pool>("SELECT * FROM pools WHERE id = $1")
            .bind(pool_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PoolError::NotFound("Pool"))
    }

    pub async fn list_pools(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Pool>, PoolError> {
        let limit = limit.unwrap_or(50).clamp(1, 200);
        let offset = (page.unwrap_or(1).max(1) - 1) * limit;
        let pools = sqlx::query_as::<_, Pool>(
            "SELECT * FROM pools ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(pools)
    }

    /// Join a pool: one entry per (pool, user).
    pub async fn join_pool(
        &self,
        pool_id: Uuid,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<Entry, PoolError> {
        self.validator.validate_display_name(display_name)?;

        // Surface a clean 404 before the FK does
        let pool = self.get_pool(pool_id).await?;

        if pool.is_locked(Utc::now()) {
            return Err(PoolError::conflict("Pool is locked; no new entries"));
        }

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM entries WHERE pool_id = $1 AND user_id = $2")
                .bind(pool_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(PoolError::conflict("Already joined this pool"));
        }

        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (id, pool_id, user_id, display_name, eliminated, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pool_id)
        .bind(user_id)
        .bind(display_name.trim())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("User {} joined pool {} as '{}'", user_id, pool_id, entry.display_name);
        Ok(entry)
    }

    pub async fn list_entries(&self, pool_id: Uuid) -> Result<Vec<Entry>, PoolError> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE pool_id = $1 ORDER BY created_at ASC",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn entry_for_user(&self, pool_id: Uuid, user_id: Uuid) -> Result<Entry, PoolError> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE pool_id = $1 AND user_id = $2")
            .bind(pool_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PoolError::NotFound("Entry"))
    }

    /// Remove a pool and everything under it. Admin-only moderation
    /// path; deletes children in FK order rather than leaning on
    /// cascades, since games hold references into entries.
    #[tracing::instrument(name = "Delete pool", skip(self), fields(pool_id = %pool_id))]
    pub async fn delete_pool(&self, pool_id: Uuid) -> Result<(), PoolError> {
        // 404 before mutating anything
        self.get_pool(pool_id).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM picks WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM squares WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM squares_boards WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM games WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM entries WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM pools WHERE id = $1")
            .bind(pool_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("Deleted pool {}", pool_id);
        Ok(())
    }

    /// Commissioner gate shared by score entry, draws, shuffles and
    /// destructive edits.
    pub fn require_commissioner(pool: &Pool, user_id: Uuid) -> Result<(), PoolError> {
        if pool.commissioner_id != user_id {
            return Err(PoolError::forbidden(
                "Only the pool commissioner may do this",
            ));
        }
        Ok(())
    }
}
