use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::pools::pools::PoolService;

#[tracing::instrument(
    name = "Admin delete pool",
    skip(pool, claims),
    fields(pool_id = %pool_id, admin = %claims.username)
)]
pub async fn delete_pool(
    pool_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let service = PoolService::new(pool.get_ref().clone());
    match service.delete_pool(pool_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Pool deleted"
        }))),
        Err(e) => Ok(e.to_response()),
    }
}
