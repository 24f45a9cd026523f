pub mod advancement;
pub mod evaluator;
pub mod squares;

pub use advancement::{advancing_owner, advancing_side, grade_pick, PickOutcome};
pub use evaluator::{evaluate, GameSnapshot, GameStatus, Side, Verdict};
pub use squares::winning_square;
