// src/routes/pools.rs
use actix_web::{get, post, put, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::{
    bracket_handler, cascade_handler, game_handler, pick_handler, pool_handler, squares_handler,
};
use crate::middleware::auth::Claims;
use crate::models::common::PaginationQuery;
use crate::models::game::{CreateGameRequest, ReportScoreRequest, SetSpreadRequest, TeamChangeRequest};
use crate::models::pick::SubmitPicksRequest;
use crate::models::pool::{CreatePoolRequest, JoinPoolRequest};
use crate::models::squares::ClaimSquareRequest;

/// Create a new pool
#[post("")]
async fn create_pool(
    request: web::Json<CreatePoolRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    pool_handler::create_pool(request, pool, claims).await
}

/// List pools
#[get("")]
async fn list_pools(
    query: web::Query<PaginationQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    pool_handler::list_pools(query, pool).await
}

/// Get a pool by ID
#[get("/{pool_id}")]
async fn get_pool(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pool_handler::get_pool(pool_id, pool).await
}

/// Join a pool
#[post("/{pool_id}/entries")]
async fn join_pool(
    path: web::Path<Uuid>,
    request: web::Json<JoinPoolRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pool_handler::join_pool(pool_id, request, pool, claims).await
}

/// List a pool's entries
#[get("/{pool_id}/entries")]
async fn list_entries(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pool_handler::list_entries(pool_id, pool).await
}

/// Add a game to a pool
#[post("/{pool_id}/games")]
async fn create_game(
    path: web::Path<Uuid>,
    request: web::Json<CreateGameRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    game_handler::create_game(pool_id, request, pool, claims).await
}

/// List a pool's games with verdicts
#[get("/{pool_id}/games")]
async fn list_games(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    game_handler::list_games(pool_id, pool).await
}

/// Get a single game's verdict
#[get("/{pool_id}/games/{game_id}/verdict")]
async fn get_verdict(
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();
    game_handler::get_verdict(pool_id, game_id, pool).await
}

/// Set or clear a game's spread
#[put("/{pool_id}/games/{game_id}/spread")]
async fn set_spread(
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<SetSpreadRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();
    game_handler::set_spread(pool_id, game_id, request, pool, claims).await
}

/// Report a game's score
#[put("/{pool_id}/games/{game_id}/score")]
async fn report_score(
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<ReportScoreRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();
    game_handler::report_score(pool_id, game_id, request, pool, claims).await
}

/// Run the March Madness blind draw
#[post("/{pool_id}/draw")]
async fn run_draw(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    bracket_handler::run_draw(pool_id, pool, claims).await
}

/// Entries still alive in the bracket
#[get("/{pool_id}/survivors")]
async fn surviving_entries(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    bracket_handler::surviving_entries(pool_id, pool).await
}

/// Get the squares board and claimed cells
#[get("/{pool_id}/squares")]
async fn get_board(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    squares_handler::get_board(pool_id, pool).await
}

/// Claim a square
#[post("/{pool_id}/squares")]
async fn claim_square(
    path: web::Path<Uuid>,
    request: web::Json<ClaimSquareRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    squares_handler::claim_square(pool_id, request, pool, claims).await
}

/// Shuffle and assign the board digits
#[post("/{pool_id}/squares/digits")]
async fn assign_digits(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    squares_handler::assign_digits(pool_id, pool, claims).await
}

/// Winning square for a game's current scores
#[get("/{pool_id}/games/{game_id}/winning-square")]
async fn winning_square(
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();
    squares_handler::winning_square(pool_id, game_id, pool).await
}

/// Submit or replace picks
#[post("/{pool_id}/picks")]
async fn submit_picks(
    path: web::Path<Uuid>,
    request: web::Json<SubmitPicksRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pick_handler::submit_picks(pool_id, request, pool, claims).await
}

/// Get the caller's picks
#[get("/{pool_id}/picks/mine")]
async fn my_picks(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pick_handler::my_picks(pool_id, pool, claims).await
}

/// Pool leaderboard
#[get("/{pool_id}/leaderboard")]
async fn leaderboard(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pick_handler::leaderboard(pool_id, pool).await
}

/// Preview the impact of a team change
#[get("/{pool_id}/games/{game_id}/team-change")]
async fn preview_team_change(
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();
    cascade_handler::preview_team_change(pool_id, game_id, pool, claims).await
}

/// Apply a team change
#[put("/{pool_id}/games/{game_id}/team-change")]
async fn confirm_team_change(
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<TeamChangeRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let (pool_id, game_id) = path.into_inner();
    cascade_handler::confirm_team_change(pool_id, game_id, request, pool, claims).await
}
