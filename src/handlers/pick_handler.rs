use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::pool_handler::{claims_user_id, load_pool};
use crate::middleware::auth::Claims;
use crate::models::pick::SubmitPicksRequest;
use crate::pools::picks::PickService;
use crate::pools::pools::PoolService;

#[tracing::instrument(
    name = "Submit picks",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, username = %claims.username)
)]
pub async fn submit_picks(
    pool_id: Uuid,
    request: web::Json<SubmitPicksRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let user_id = match claims_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let pool_record = match load_pool(pool.get_ref(), pool_id).await {
        Ok(p) => p,
        Err(e) => return Ok(e.to_response()),
    };

    let service = PickService::new(pool.get_ref().clone());
    match service
        .submit_picks(&pool_record, user_id, request.into_inner())
        .await
    {
        Ok(picks) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "message": "Picks submitted",
            "data": picks,
            "total_count": picks.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "Get my picks", skip(pool, claims), fields(pool_id = %pool_id))]
pub async fn my_picks(
    pool_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let user_id = match claims_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let pool_record = match load_pool(pool.get_ref(), pool_id).await {
        Ok(p) => p,
        Err(e) => return Ok(e.to_response()),
    };

    let pools = PoolService::new(pool.get_ref().clone());
    let entry = match pools.entry_for_user(pool_id, user_id).await {
        Ok(entry) => entry,
        Err(e) => return Ok(e.to_response()),
    };

    let service = PickService::new(pool.get_ref().clone());
    match service.graded_picks_for_entry(&pool_record, entry.id).await {
        Ok(picks) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": picks,
            "total_count": picks.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "Get leaderboard", skip(pool), fields(pool_id = %pool_id))]
pub async fn leaderboard(pool_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let pool_record = match load_pool(pool.get_ref(), pool_id).await {
        Ok(p) => p,
        Err(e) => return Ok(e.to_response()),
    };

    let service = PickService::new(pool.get_ref().clone());
    match service.leaderboard(&pool_record).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rows,
            "total_count": rows.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}
