use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod pools;
pub mod registration;

use crate::middleware::admin::AdminMiddleware;
use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    // Pool routes (require authentication)
    cfg.service(
        web::scope("/pools")
            .wrap(AuthMiddleware)
            .service(pools::create_pool)
            .service(pools::list_pools)
            .service(pools::run_draw)
            .service(pools::get_pool)
            .service(pools::join_pool)
            .service(pools::list_entries)
            .service(pools::create_game)
            .service(pools::list_games)
            .service(pools::get_verdict)
            .service(pools::set_spread)
            .service(pools::report_score)
            .service(pools::surviving_entries)
            .service(pools::get_board)
            .service(pools::claim_square)
            .service(pools::assign_digits)
            .service(pools::winning_square)
            .service(pools::submit_picks)
            .service(pools::my_picks)
            .service(pools::leaderboard)
            .service(pools::preview_team_change)
            .service(pools::confirm_team_change),
    );

    // Admin routes (require an active admin account)
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            .service(admin::delete_pool),
    );
}
