use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::pool_handler::{claims_user_id, load_pool};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::squares::ClaimSquareRequest;
use crate::pools::squares::SquaresService;

#[tracing::instrument(name = "Get squares board", skip(pool), fields(pool_id = %pool_id))]
pub async fn get_board(pool_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    if let Err(e) = load_pool(pool.get_ref(), pool_id).await {
        return Ok(e.to_response());
    }

    let service = SquaresService::new(pool.get_ref().clone());
    let board = match service.board(pool_id).await {
        Ok(board) => board,
        Err(e) => return Ok(e.to_response()),
    };
    let squares = match service.list_squares(pool_id).await {
        Ok(squares) => squares,
        Err(e) => return Ok(e.to_response()),
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "board": board,
            "squares": squares
        }
    })))
}

#[tracing::instrument(
    name = "Claim square",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, username = %claims.username)
)]
pub async fn claim_square(
    pool_id: Uuid,
    request: web::Json<ClaimSquareRequest>,
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

    let service = SquaresService::new(pool.get_ref().clone());
    match service
        .claim_square(&pool_record, user_id, request.row_idx, request.col_idx)
        .await
    {
        Ok(square) => Ok(HttpResponse::Created().json(ApiResponse::success("Square claimed", square))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Assign square digits",
    skip(pool, claims),
    fields(pool_id = %pool_id, username = %claims.username)
)]
pub async fn assign_digits(
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

    let service = SquaresService::new(pool.get_ref().clone());
    match service.assign_digits(&pool_record, user_id).await {
        Ok(board) => Ok(HttpResponse::Ok().json(ApiResponse::success("Digits assigned", board))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Get winning square",
    skip(pool),
    fields(pool_id = %pool_id, game_id = %game_id)
)]
pub async fn winning_square(
    pool_id: Uuid,
    game_id: Uuid,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let service = SquaresService::new(pool.get_ref().clone());
    match service.winning_square_for_game(pool_id, game_id).await {
        Ok(Some(winner)) => Ok(HttpResponse::Ok().json(ApiResponse::success("Winning square", winner))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "No winning square yet"
        }))),
        Err(e) => Ok(e.to_response()),
    }
}
