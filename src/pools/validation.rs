// src/pools/validation.rs
use crate::errors::PoolError;
use crate::models::pick::{GamePickRequest, GolfPickRequest};
use crate::scoring::evaluator::GameStatus;

/// Centralized input validation for pool operations. Everything here is
/// a precondition of the scoring core: ties at final, negative scores
/// and off-increment spreads must never reach a stored game row.
pub struct PoolValidator;

impl PoolValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_pool_name(&self, name: &str) -> Result<(), PoolError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(PoolError::validation("Pool name cannot be empty"));
        }

        if trimmed.len() > 255 {
            return Err(PoolError::validation(
                "Pool name too long (maximum 255 characters)",
            ));
        }

        if !trimmed.chars().any(|c| c.is_alphanumeric()) {
            return Err(PoolError::validation(
                "Pool name must contain alphanumeric characters",
            ));
        }

        Ok(())
    }

    pub fn validate_display_name(&self, name: &str) -> Result<(), PoolError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PoolError::validation("Display name cannot be empty"));
        }
        if trimmed.len() > 100 {
            return Err(PoolError::validation(
                "Display name too long (max 100 characters)",
            ));
        }
        Ok(())
    }

    /// Scores must be non-negative, within sanity bounds, and a final
    /// score cannot be a tie (single-elimination games have no draws).
    pub fn validate_scores(
        &self,
        higher_score: i32,
        lower_score: i32,
        status: GameStatus,
    ) -> Result<(), PoolError> {
        const MAX_REASONABLE_SCORE: i32 = 200;

        if higher_score < 0 || lower_score < 0 {
            return Err(PoolError::validation("Scores cannot be negative"));
        }

        if higher_score > MAX_REASONABLE_SCORE || lower_score > MAX_REASONABLE_SCORE {
            return Err(PoolError::validation(format!(
                "Score exceeds maximum of {}",
                MAX_REASONABLE_SCORE
            )));
        }

        if status == GameStatus::Final && higher_score == lower_score {
            return Err(PoolError::validation("A final score cannot be a tie"));
        }

        Ok(())
    }

    /// Spreads move in half-point increments.
    pub fn validate_spread(&self, spread: f64) -> Result<(), PoolError> {
        if !spread.is_finite() {
            return Err(PoolError::validation("Spread must be a finite number"));
        }
        if spread.abs() > 100.0 {
            return Err(PoolError::validation("Spread out of range (max 100 points)"));
        }
        if (spread * 2.0).fract() != 0.0 {
            return Err(PoolError::validation(
                "Spread must be in half-point increments",
            ));
        }
        Ok(())
    }

    /// Status only moves forward: scheduled -> in_progress -> final.
    /// Staying at final is allowed (score corrections re-enter the
    /// terminal state; they do not transition).
    pub fn validate_status_transition(
        &self,
        current: GameStatus,
        next: GameStatus,
    ) -> Result<(), PoolError> {
        let ok = match (current, next) {
            (GameStatus::Scheduled, _) => true,
            (GameStatus::InProgress, GameStatus::InProgress) => true,
            (GameStatus::InProgress, GameStatus::Final) => true,
            (GameStatus::Final, GameStatus::Final) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(PoolError::validation(format!(
                "Invalid status transition: {} -> {}",
                current.as_str(),
                next.as_str()
            )))
        }
    }

    pub fn validate_slot(
        &self,
        slot: i32,
        round: i32,
        next_slot: Option<i32>,
    ) -> Result<(), PoolError> {
        if slot < 1 {
            return Err(PoolError::validation(format!(
                "Slot must be positive: {}",
                slot
            )));
        }
        if round < 1 {
            return Err(PoolError::validation(format!(
                "Round must be positive: {}",
                round
            )));
        }
        match next_slot {
            Some(next) if next < 1 => Err(PoolError::validation(format!(
                "Next slot must be positive: {}",
                next
            ))),
            // A game cannot feed itself
            Some(next) if next == slot => Err(PoolError::validation(format!(
                "Slot {} cannot feed into itself",
                slot
            ))),
            _ => Ok(()),
        }
    }

    pub fn validate_game_picks(&self, picks: &[GamePickRequest]) -> Result<(), PoolError> {
        if picks.is_empty() {
            return Err(PoolError::validation("No picks submitted"));
        }
        let mut seen = std::collections::HashSet::new();
        for pick in picks {
            if !seen.insert(pick.game_id) {
                return Err(PoolError::validation(format!(
                    "Duplicate pick for game {}",
                    pick.game_id
                )));
            }
        }
        Ok(())
    }

    /// Golf tier rules: tiers distinct and positive, one golfer each.
    pub fn validate_golf_picks(&self, picks: &[GolfPickRequest]) -> Result<(), PoolError> {
        if picks.is_empty() {
            return Err(PoolError::validation("No picks submitted"));
        }
        let mut seen = std::collections::HashSet::new();
        for pick in picks {
            if pick.tier < 1 {
                return Err(PoolError::validation(format!(
                    "Tier must be positive: {}",
                    pick.tier
                )));
            }
            if !seen.insert(pick.tier) {
                return Err(PoolError::validation(format!(
                    "Multiple golfers picked in tier {}",
                    pick.tier
                )));
            }
            if pick.golfer.trim().is_empty() {
                return Err(PoolError::validation("Golfer name cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn validate_square_indices(&self, row_idx: i32, col_idx: i32) -> Result<(), PoolError> {
        if !(0..10).contains(&row_idx) || !(0..10).contains(&col_idx) {
            return Err(PoolError::validation(
                "Square indices must be between 0 and 9",
            ));
        }
        Ok(())
    }
}

impl Default for PoolValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::scoring::evaluator::Side;

    #[test]
    fn rejects_tie_at_final_but_not_in_progress() {
        let v = PoolValidator::new();
        assert!(v.validate_scores(21, 21, GameStatus::Final).is_err());
        assert!(v.validate_scores(21, 21, GameStatus::InProgress).is_ok());
    }

    #[test]
    fn rejects_negative_and_absurd_scores() {
        let v = PoolValidator::new();
        assert!(v.validate_scores(-1, 7, GameStatus::InProgress).is_err());
        assert!(v.validate_scores(7, -1, GameStatus::InProgress).is_err());
        assert!(v.validate_scores(201, 0, GameStatus::Final).is_err());
    }

    #[test]
    fn spread_must_be_half_point_increments() {
        let v = PoolValidator::new();
        assert!(v.validate_spread(-7.0).is_ok());
        assert!(v.validate_spread(3.5).is_ok());
        assert!(v.validate_spread(0.0).is_ok());
        assert!(v.validate_spread(-7.3).is_err());
        assert!(v.validate_spread(f64::NAN).is_err());
        assert!(v.validate_spread(250.0).is_err());
    }

    #[test]
    fn status_only_moves_forward() {
        let v = PoolValidator::new();
        assert!(v
            .validate_status_transition(GameStatus::Scheduled, GameStatus::InProgress)
            .is_ok());
        assert!(v
            .validate_status_transition(GameStatus::InProgress, GameStatus::Final)
            .is_ok());
        // Score corrections re-enter final
        assert!(v
            .validate_status_transition(GameStatus::Final, GameStatus::Final)
            .is_ok());
        assert!(v
            .validate_status_transition(GameStatus::Final, GameStatus::Scheduled)
            .is_err());
        assert!(v
            .validate_status_transition(GameStatus::InProgress, GameStatus::Scheduled)
            .is_err());
    }

    #[test]
    fn slot_linkage_cannot_self_reference() {
        let v = PoolValidator::new();
        assert!(v.validate_slot(1, 1, Some(2)).is_ok());
        assert!(v.validate_slot(1, 1, None).is_ok());
        assert!(v.validate_slot(1, 1, Some(1)).is_err());
        assert!(v.validate_slot(3, 2, Some(0)).is_err());
        assert!(v.validate_slot(0, 1, Some(2)).is_err());
    }

    #[test]
    fn golf_picks_need_distinct_tiers() {
        let v = PoolValidator::new();
        let picks = vec![
            GolfPickRequest {
                tier: 1,
                golfer: "A. Golfer".into(),
            },
            GolfPickRequest {
                tier: 1,
                golfer: "B. Golfer".into(),
            },
        ];
        assert!(v.validate_golf_picks(&picks).is_err());

        let picks = vec![
            GolfPickRequest {
                tier: 1,
                golfer: "A. Golfer".into(),
            },
            GolfPickRequest {
                tier: 2,
                golfer: "B. Golfer".into(),
            },
        ];
        assert!(v.validate_golf_picks(&picks).is_ok());
    }

    #[test]
    fn game_picks_cannot_double_up_on_a_game() {
        let v = PoolValidator::new();
        let game_id = Uuid::new_v4();
        let picks = vec![
            GamePickRequest {
                game_id,
                picked_side: Side::Higher,
            },
            GamePickRequest {
                game_id,
                picked_side: Side::Lower,
            },
        ];
        assert!(v.validate_game_picks(&picks).is_err());
    }
}
