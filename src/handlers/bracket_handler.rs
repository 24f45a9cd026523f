use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::pool_handler::{claims_user_id, load_pool};
use crate::middleware::auth::Claims;
use crate::pools::brackets::BracketService;

#[tracing::instrument(
    name = "Run blind draw",
    skip(pool, claims),
    fields(pool_id = %pool_id, username = %claims.username)
)]
pub async fn run_draw(
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

    let service = BracketService::new(pool.get_ref().clone());
    match service.run_draw(&pool_record, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Blind draw complete"
        }))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "List surviving entries", skip(pool), fields(pool_id = %pool_id))]
pub async fn surviving_entries(pool_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    if let Err(e) = load_pool(pool.get_ref(), pool_id).await {
        return Ok(e.to_response());
    }

    let service = BracketService::new(pool.get_ref().clone());
    match service.surviving_entries(pool_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries,
            "total_count": entries.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}
