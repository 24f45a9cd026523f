use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::pool_handler::{claims_user_id, load_pool};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::game::{CreateGameRequest, ReportScoreRequest, SetSpreadRequest};
use crate::pools::games::GameService;

#[tracing::instrument(
    name = "Create game",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, slot = %request.slot)
)]
pub async fn create_game(
    pool_id: Uuid,
    request: web::Json<CreateGameRequest>,
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

    let service = GameService::new(pool.get_ref().clone());
    match service
        .create_game(&pool_record, user_id, request.into_inner())
        .await
    {
        Ok(game) => Ok(HttpResponse::Created().json(ApiResponse::success("Game created", game))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "List games", skip(pool), fields(pool_id = %pool_id))]
pub async fn list_games(pool_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    if let Err(e) = load_pool(pool.get_ref(), pool_id).await {
        return Ok(e.to_response());
    }

    let service = GameService::new(pool.get_ref().clone());
    match service.list_games(pool_id).await {
        Ok(games) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": games,
            "total_count": games.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Get game verdict",
    skip(pool),
    fields(pool_id = %pool_id, game_id = %game_id)
)]
pub async fn get_verdict(
    pool_id: Uuid,
    game_id: Uuid,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let service = GameService::new(pool.get_ref().clone());
    match service.verdict(pool_id, game_id).await {
        Ok(graded) => Ok(HttpResponse::Ok().json(ApiResponse::success("Verdict", graded))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Set spread",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, game_id = %game_id)
)]
pub async fn set_spread(
    pool_id: Uuid,
    game_id: Uuid,
    request: web::Json<SetSpreadRequest>,
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

    let service = GameService::new(pool.get_ref().clone());
    match service
        .set_spread(&pool_record, game_id, user_id, request.spread)
        .await
    {
        Ok(game) => Ok(HttpResponse::Ok().json(ApiResponse::success("Spread updated", game))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Report score",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, game_id = %game_id, reporter = %claims.username)
)]
pub async fn report_score(
    pool_id: Uuid,
    game_id: Uuid,
    request: web::Json<ReportScoreRequest>,
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

    let service = GameService::new(pool.get_ref().clone());
    match service
        .report_score(&pool_record, game_id, user_id, request.into_inner())
        .await
    {
        Ok((game, verdict)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Score reported",
            "data": {
                "game": game,
                "verdict": verdict
            }
        }))),
        Err(e) => Ok(e.to_response()),
    }
}
