pub mod common;
pub mod entry;
pub mod game;
pub mod pick;
pub mod pool;
pub mod squares;
pub mod user;
