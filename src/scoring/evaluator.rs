// src/scoring/evaluator.rs
//
// Pure spread-cover evaluation over a single game snapshot. No I/O, no
// state. Partial input (missing scores, no spread, game not final) is a
// normal condition and degrades to `None` results rather than erroring,
// so the same call works from a list view grading many games and from a
// detail view grading one.
use serde::{Deserialize, Serialize};

/// Commissioner-driven lifecycle of a game. Unknown stored values clamp
/// to `Scheduled`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl From<String> for GameStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "in_progress" => GameStatus::InProgress,
            "final" => GameStatus::Final,
            _ => GameStatus::Scheduled,
        }
    }
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Final => "final",
        }
    }
}

/// One of the two sides of a game. The better-seeded side is `Higher`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Higher,
    Lower,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Higher => Side::Lower,
            Side::Lower => Side::Higher,
        }
    }
}

/// The fields the evaluator reads, detached from the persisted row so it
/// can be called on immutable copies without any database in sight.
///
/// Spread sign convention: negative favors the higher side, positive the
/// lower side, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub higher_score: Option<i32>,
    pub lower_score: Option<i32>,
    pub spread: Option<f64>,
}

/// Derived facts about a game. Every field is undetermined (`None` /
/// `false`) until the inputs that define it are present.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub winner: Option<Side>,
    pub covering_side: Option<Side>,
    pub push: bool,
    pub is_upset: bool,
}

impl Verdict {
    pub const UNDETERMINED: Verdict = Verdict {
        winner: None,
        covering_side: None,
        push: false,
        is_upset: false,
    };
}

/// Compute winner, spread-covering side, push and upset flags for one
/// game. Idempotent and total: never panics, never errors.
///
/// - `winner` is `Some` only for decided games (final, both scores
///   present, scores unequal). A tie at final is a precondition
///   violation kept out by input validation; if one reaches us anyway it
///   degrades to undetermined.
/// - `covering_side` additionally needs a spread. Exact equality of
///   `higher + spread` and `lower` is a push: no covering side.
/// - `is_upset` is true iff winner and covering side both exist and
///   disagree. A push is not an upset.
pub fn evaluate(game: &GameSnapshot) -> Verdict {
    if game.status != GameStatus::Final {
        return Verdict::UNDETERMINED;
    }

    let (higher, lower) = match (game.higher_score, game.lower_score) {
        (Some(h), Some(l)) => (h, l),
        _ => return Verdict::UNDETERMINED,
    };

    let winner = if higher > lower {
        Side::Higher
    } else if lower > higher {
        Side::Lower
    } else {
        return Verdict::UNDETERMINED;
    };

    let (covering_side, push) = match game.spread {
        Some(spread) => {
            let adjusted = f64::from(higher) + spread;
            let lower = f64::from(lower);
            if adjusted > lower {
                (Some(Side::Higher), false)
            } else if adjusted < lower {
                (Some(Side::Lower), false)
            } else {
                (None, true)
            }
        }
        None => (None, false),
    };

    let is_upset = matches!(covering_side, Some(side) if side != winner);

    Verdict {
        winner: Some(winner),
        covering_side,
        push,
        is_upset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(
        status: GameStatus,
        higher: Option<i32>,
        lower: Option<i32>,
        spread: Option<f64>,
    ) -> GameSnapshot {
        GameSnapshot {
            status,
            higher_score: higher,
            lower_score: lower,
            spread,
        }
    }

    #[test]
    fn non_final_games_are_undetermined() {
        for status in [GameStatus::Scheduled, GameStatus::InProgress] {
            let verdict = evaluate(&game(status, Some(31), Some(10), Some(-3.5)));
            assert_eq!(verdict, Verdict::UNDETERMINED);
        }
    }

    #[test]
    fn missing_scores_are_undetermined_even_when_final() {
        assert_eq!(
            evaluate(&game(GameStatus::Final, Some(21), None, Some(-7.0))),
            Verdict::UNDETERMINED
        );
        assert_eq!(
            evaluate(&game(GameStatus::Final, None, Some(14), None)),
            Verdict::UNDETERMINED
        );
        assert_eq!(
            evaluate(&game(GameStatus::Final, None, None, None)),
            Verdict::UNDETERMINED
        );
    }

    #[test]
    fn winner_is_the_strictly_greater_score() {
        let verdict = evaluate(&game(GameStatus::Final, Some(35), Some(28), None));
        assert_eq!(verdict.winner, Some(Side::Higher));

        let verdict = evaluate(&game(GameStatus::Final, Some(13), Some(27), None));
        assert_eq!(verdict.winner, Some(Side::Lower));
    }

    #[test]
    fn no_spread_means_no_covering_side() {
        let verdict = evaluate(&game(GameStatus::Final, Some(35), Some(28), None));
        assert_eq!(verdict.covering_side, None);
        assert!(!verdict.push);
        assert!(!verdict.is_upset);
    }

    #[test]
    fn higher_covers_when_adjusted_score_exceeds_lower() {
        // Higher favored by 3, wins by 7: covers.
        let verdict = evaluate(&game(GameStatus::Final, Some(24), Some(17), Some(-3.0)));
        assert_eq!(verdict.winner, Some(Side::Higher));
        assert_eq!(verdict.covering_side, Some(Side::Higher));
        assert!(!verdict.push);
        assert!(!verdict.is_upset);
    }

    #[test]
    fn lower_covers_when_adjusted_score_falls_short() {
        // Higher wins 20-17 but was favored by 7.
        let verdict = evaluate(&game(GameStatus::Final, Some(20), Some(17), Some(-7.0)));
        assert_eq!(verdict.winner, Some(Side::Higher));
        assert_eq!(verdict.covering_side, Some(Side::Lower));
        assert!(!verdict.push);
        assert!(verdict.is_upset);
    }

    #[test]
    fn exact_equality_is_a_push() {
        // 24-17 with the higher side laying 7.
        let verdict = evaluate(&game(GameStatus::Final, Some(24), Some(17), Some(-7.0)));
        assert_eq!(verdict.winner, Some(Side::Higher));
        assert_eq!(verdict.covering_side, None);
        assert!(verdict.push);
        assert!(!verdict.is_upset);
    }

    #[test]
    fn positive_spread_favors_the_lower_side() {
        // Lower favored by 5; higher pulls the outright win and covers.
        let verdict = evaluate(&game(GameStatus::Final, Some(28), Some(24), Some(5.0)));
        assert_eq!(verdict.winner, Some(Side::Higher));
        assert_eq!(verdict.covering_side, Some(Side::Higher));
        assert!(!verdict.is_upset);

        // Lower favored by 5 wins by only 3: 21 + 5 = 26 beats 24, so the
        // higher side covers and the winner failed its number.
        let verdict = evaluate(&game(GameStatus::Final, Some(21), Some(24), Some(5.0)));
        assert_eq!(verdict.winner, Some(Side::Lower));
        assert_eq!(verdict.covering_side, Some(Side::Higher));
        assert!(verdict.is_upset);

        // Lower favored by 5 and winning by 6 covers its own number.
        let verdict = evaluate(&game(GameStatus::Final, Some(18), Some(24), Some(5.0)));
        assert_eq!(verdict.winner, Some(Side::Lower));
        assert_eq!(verdict.covering_side, Some(Side::Lower));
        assert!(!verdict.is_upset);
    }

    #[test]
    fn half_point_spreads_cannot_push() {
        let verdict = evaluate(&game(GameStatus::Final, Some(24), Some(17), Some(-6.5)));
        assert_eq!(verdict.covering_side, Some(Side::Higher));
        assert!(!verdict.push);

        let verdict = evaluate(&game(GameStatus::Final, Some(24), Some(17), Some(-7.5)));
        assert_eq!(verdict.covering_side, Some(Side::Lower));
        assert!(!verdict.push);
    }

    #[test]
    fn in_progress_game_with_scores_is_all_none() {
        let verdict = evaluate(&game(GameStatus::InProgress, Some(10), Some(20), Some(5.0)));
        assert_eq!(verdict.winner, None);
        assert_eq!(verdict.covering_side, None);
        assert!(!verdict.push);
        assert!(!verdict.is_upset);
    }

    #[test]
    fn tie_at_final_degrades_instead_of_panicking() {
        // Unmodeled case: validation rejects ties before storage, but the
        // evaluator still has to stay total.
        let verdict = evaluate(&game(GameStatus::Final, Some(21), Some(21), Some(-3.0)));
        assert_eq!(verdict, Verdict::UNDETERMINED);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let snapshot = game(GameStatus::Final, Some(20), Some(17), Some(-7.0));
        assert_eq!(evaluate(&snapshot), evaluate(&snapshot));
    }

    #[test]
    fn unknown_status_strings_clamp_to_scheduled() {
        assert_eq!(GameStatus::from("final".to_string()), GameStatus::Final);
        assert_eq!(
            GameStatus::from("in_progress".to_string()),
            GameStatus::InProgress
        );
        assert_eq!(
            GameStatus::from("postponed".to_string()),
            GameStatus::Scheduled
        );
        assert_eq!(GameStatus::from("".to_string()), GameStatus::Scheduled);
    }
}
