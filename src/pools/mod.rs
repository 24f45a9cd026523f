pub mod brackets;
pub mod cascade;
pub mod games;
pub mod picks;
pub mod pools;
pub mod squares;
pub mod validation;
