pub mod admin_handler;
pub mod auth_handler;
pub mod backend_health_handler;
pub mod bracket_handler;
pub mod cascade_handler;
pub mod game_handler;
pub mod pick_handler;
pub mod pool_handler;
pub mod registration_handler;
pub mod squares_handler;
