use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::PoolError;
use crate::middleware::auth::Claims;
use crate::models::common::{ApiResponse, PaginationQuery};
use crate::models::pool::{CreatePoolRequest, JoinPoolRequest};
use crate::pools::pools::PoolService;

pub(crate) fn claims_user_id(claims: &Claims) -> Result<Uuid, HttpResponse> {
    claims.user_id().ok_or_else(|| {
        HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid user id in token"
        }))
    })
}

#[tracing::instrument(
    name = "Create pool",
    skip(request, pool, claims),
    fields(pool_name = %request.name, commissioner = %claims.username)
)]
pub async fn create_pool(
    request: web::Json<CreatePoolRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let user_id = match claims_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let service = PoolService::new(pool.get_ref().clone());
    match service.create_pool(user_id, request.into_inner()).await {
        Ok(created) => Ok(HttpResponse::Created().json(ApiResponse::success("Pool created", created))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "List pools", skip(query, pool))]
pub async fn list_pools(
    query: web::Query<PaginationQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let service = PoolService::new(pool.get_ref().clone());
    match service.list_pools(query.page, query.limit).await {
        Ok(pools) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": pools,
            "total_count": pools.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "Get pool", skip(pool), fields(pool_id = %pool_id))]
pub async fn get_pool(pool_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PoolService::new(pool.get_ref().clone());
    match service.get_pool(pool_id).await {
        Ok(found) => Ok(HttpResponse::Ok().json(ApiResponse::success("Pool", found))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(
    name = "Join pool",
    skip(request, pool, claims),
    fields(pool_id = %pool_id, username = %claims.username)
)]
pub async fn join_pool(
    pool_id: Uuid,
    request: web::Json<JoinPoolRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let user_id = match claims_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let service = PoolService::new(pool.get_ref().clone());
    match service.join_pool(pool_id, user_id, &request.display_name).await {
        Ok(entry) => Ok(HttpResponse::Created().json(ApiResponse::success("Joined pool", entry))),
        Err(e) => Ok(e.to_response()),
    }
}

#[tracing::instrument(name = "List entries", skip(pool), fields(pool_id = %pool_id))]
pub async fn list_entries(pool_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = PoolService::new(pool.get_ref().clone());

    // 404 for unknown pools instead of an empty list
    if let Err(e) = service.get_pool(pool_id).await {
        return Ok(e.to_response());
    }

    match service.list_entries(pool_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries,
            "total_count": entries.len()
        }))),
        Err(e) => Ok(e.to_response()),
    }
}

/// Shared helper for handlers that need the pool row up front.
pub async fn load_pool(
    pool: &PgPool,
    pool_id: Uuid,
) -> Result<crate::models::pool::Pool, PoolError> {
    PoolService::new(pool.clone()).get_pool(pool_id).await
}
