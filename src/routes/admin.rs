// src/routes/admin.rs
use actix_web::{delete, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::admin_handler;
use crate::middleware::auth::Claims;

/// Remove a pool and all of its entries, games and picks
#[delete("/pools/{pool_id}")]
async fn delete_pool(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    admin_handler::delete_pool(pool_id, pool, claims).await
}
