use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::auth::jwt::generate_token;
use crate::config::jwt::JwtSettings;
use crate::models::user::{LoginRequest, LoginResponse, User};
use crate::utils::password::verify_password;

#[tracing::instrument(
    name = "User login",
    skip(login_form, pool, jwt_settings),
    fields(username = %login_form.username)
)]
pub async fn login(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    let user = match sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&login_form.username)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "message": "Invalid username or password"
            }));
        }
        Err(e) => {
            tracing::error!("Failed to query user: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    if !verify_password(login_form.password.expose_secret(), &user.password_hash) {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "message": "Invalid username or password"
        }));
    }

    match generate_token(&user, &jwt_settings) {
        Ok(token) => HttpResponse::Ok().json(LoginResponse {
            token,
            user_id: user.id,
            username: user.username,
        }),
        Err(e) => {
            tracing::error!("Failed to generate token: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
