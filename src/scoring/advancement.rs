// src/scoring/advancement.rs
//
// Maps an evaluated verdict to the pool-level outcomes: which side (and
// therefore which entry) advances in an elimination bracket, and how a
// stored pick grades out. Pure functions, same never-fail semantics as
// the evaluator.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::game::GameRecord;
use crate::models::pool::{AdvancementRule, PushRule};
use crate::scoring::evaluator::{Side, Verdict};

/// Grading of a single pick against a verdict.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PickOutcome {
    Won,
    Lost,
    Push,
    Pending,
}

/// Which side advances under the pool's rules, if any yet.
///
/// Straight-up pools advance the outright winner. Against-the-spread
/// pools advance the covering side; on a push the `push_rule` decides:
/// `WinnerAdvances` falls back to the straight-up winner, `Void` leaves
/// the game unresolved for advancement.
pub fn advancing_side(
    verdict: &Verdict,
    advancement_rule: AdvancementRule,
    push_rule: PushRule,
) -> Option<Side> {
    match advancement_rule {
        AdvancementRule::StraightUp => verdict.winner,
        AdvancementRule::AgainstSpread => match verdict.covering_side {
            Some(side) => Some(side),
            // A game with no spread set grades straight-up.
            None if !verdict.push => verdict.winner,
            None => match push_rule {
                PushRule::WinnerAdvances => verdict.winner,
                PushRule::Void => None,
            },
        },
    }
}

/// The entry that advances: the owner of the advancing side. `None` when
/// the game is undetermined, voided by a push, or the side is unowned.
pub fn advancing_owner(
    game: &GameRecord,
    verdict: &Verdict,
    advancement_rule: AdvancementRule,
    push_rule: PushRule,
) -> Option<Uuid> {
    match advancing_side(verdict, advancement_rule, push_rule)? {
        Side::Higher => game.higher_owner_id,
        Side::Lower => game.lower_owner_id,
    }
}

/// Grade one pick. Straight-up pools grade against the winner;
/// against-the-spread pools grade against the covering side, with a push
/// grading as `Push` rather than a loss.
pub fn grade_pick(
    picked_side: Side,
    verdict: &Verdict,
    advancement_rule: AdvancementRule,
) -> PickOutcome {
    match advancement_rule {
        AdvancementRule::StraightUp => match verdict.winner {
            Some(winner) if winner == picked_side => PickOutcome::Won,
            Some(_) => PickOutcome::Lost,
            None => PickOutcome::Pending,
        },
        AdvancementRule::AgainstSpread => {
            if verdict.push {
                return PickOutcome::Push;
            }
            match verdict.covering_side.or(verdict.winner) {
                Some(covering) if covering == picked_side => PickOutcome::Won,
                Some(_) => PickOutcome::Lost,
                None => PickOutcome::Pending,
            }
        }
    }
}
