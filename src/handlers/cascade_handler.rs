use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::pool_handler::{claims_user_id, load_pool};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::game::TeamChangeRequest;
use crate::pools::cascade::CascadeService;

#[tracing::instrument(
    name = "Preview team change",
    skip(pool, claims),
    fields(pool_id = %pool_id, game_id = %game_id)
)]
pub async fn preview_team_change(
    pool_id: Uuid,
    game_id: Uuid,
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

    let service = CascadeService::new(pool.get_ref().clone());
    match service
        .preview_team_change(&pool_record, game_id, user_id)
        .await
    {
        Ok(impact) => Ok(HttpResponse::Ok().json(ApiResponse::success("Team change impact", impact))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Confirm team change",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, game_id = %game_id, username = %claims.username)
)]
pub async fn confirm_team_change(
    pool_id: Uuid,
    game_id: Uuid,
    request: web::Json<TeamChangeRequest>,
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

    let service = CascadeService::new(pool.get_ref().clone());
    match service
        .confirm_team_change(&pool_record, game_id, user_id, request.into_inner())
        .await
    {
        Ok(impact) => Ok(HttpResponse::Ok().json(ApiResponse::success("Team change applied", impact))),
        Err(e) => Ok(e.to_response()),
    }
}
