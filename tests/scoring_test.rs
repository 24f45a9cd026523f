use poolplay_backend::models::pool::{AdvancementRule, PushRule};
use poolplay_backend::models::squares::SquaresBoard;
use poolplay_backend::scoring::{
    advancing_side, evaluate, grade_pick, winning_square, GameSnapshot, GameStatus, PickOutcome,
    Side, Verdict,
};

fn final_game(higher: i32, lower: i32, spread: Option<f64>) -> GameSnapshot {
    GameSnapshot {
        status: GameStatus::Final,
        higher_score: Some(higher),
        lower_score: Some(lower),
        spread,
    }
}

#[test]
fn evaluator_is_total_over_a_score_grid() {
    // No input combination may panic, and non-final games never produce
    // a winner.
    for status in [
        GameStatus::Scheduled,
        GameStatus::InProgress,
        GameStatus::Final,
    ] {
        for higher in [None, Some(0), Some(17), Some(63)] {
            for lower in [None, Some(0), Some(17), Some(63)] {
                for spread in [None, Some(-7.0), Some(-0.5), Some(0.0), Some(3.5)] {
                    let verdict = evaluate(&GameSnapshot {
                        status,
                        higher_score: higher,
                        lower_score: lower,
                        spread,
                    });
                    if status != GameStatus::Final {
                        assert_eq!(verdict, Verdict::UNDETERMINED);
                    }
                }
            }
        }
    }
}

#[test]
fn covering_side_and_push_are_mutually_exclusive() {
    for higher in 0..40 {
        for lower in 0..40 {
            for spread in [-10.0, -7.0, -3.5, 0.0, 2.5, 7.0] {
                let verdict = evaluate(&final_game(higher, lower, Some(spread)));
                if verdict.push {
                    assert_eq!(verdict.covering_side, None);
                    assert!(!verdict.is_upset);
                }
                if verdict.winner.is_some() && !verdict.push {
                    assert!(verdict.covering_side.is_some());
                }
            }
        }
    }
}

#[test]
fn upset_means_winner_failed_to_cover() {
    for higher in 0..40 {
        for lower in 0..40 {
            let verdict = evaluate(&final_game(higher, lower, Some(-6.5)));
            if verdict.is_upset {
                assert_ne!(verdict.winner, verdict.covering_side);
                assert!(verdict.winner.is_some());
                assert!(verdict.covering_side.is_some());
            }
        }
    }
}

#[test]
fn favorite_winning_big_covers_and_is_never_an_upset() {
    let verdict = evaluate(&final_game(42, 10, Some(-14.0)));
    assert_eq!(verdict.winner, Some(Side::Higher));
    assert_eq!(verdict.covering_side, Some(Side::Higher));
    assert!(!verdict.is_upset);
}

#[test]
fn underdog_outright_win_covers_too() {
    // Lower is the underdog getting 10 and wins outright.
    let verdict = evaluate(&final_game(20, 24, Some(-10.0)));
    assert_eq!(verdict.winner, Some(Side::Lower));
    assert_eq!(verdict.covering_side, Some(Side::Lower));
    assert!(!verdict.is_upset);
}

#[test]
fn advancement_respects_the_push_rule_everywhere_else_agrees() {
    let push = evaluate(&final_game(27, 20, Some(-7.0)));
    assert!(push.push);

    assert_eq!(
        advancing_side(&push, AdvancementRule::AgainstSpread, PushRule::WinnerAdvances),
        push.winner
    );
    assert_eq!(
        advancing_side(&push, AdvancementRule::AgainstSpread, PushRule::Void),
        None
    );
    // Straight-up pools never consult the push rule.
    assert_eq!(
        advancing_side(&push, AdvancementRule::StraightUp, PushRule::Void),
        push.winner
    );
}

#[test]
fn grading_never_turns_a_push_into_a_loss() {
    let push = evaluate(&final_game(27, 20, Some(-7.0)));
    for side in [Side::Higher, Side::Lower] {
        assert_eq!(
            grade_pick(side, &push, AdvancementRule::AgainstSpread),
            PickOutcome::Push
        );
    }
}

fn board(row_digits: Option<Vec<i32>>, col_digits: Option<Vec<i32>>) -> SquaresBoard {
    SquaresBoard {
        pool_id: uuid::Uuid::new_v4(),
        row_digits,
        col_digits,
        created_at: chrono::Utc::now(),
    }
}

#[test]
fn winning_square_needs_scores_and_digits() {
    let shuffled = board(
        Some(vec![3, 1, 4, 5, 9, 2, 6, 8, 7, 0]),
        Some(vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]),
    );
    assert_eq!(winning_square(None, Some(10), &shuffled), None);
    assert_eq!(winning_square(Some(10), None, &shuffled), None);

    let unshuffled = board(None, None);
    assert_eq!(winning_square(Some(21), Some(17), &unshuffled), None);
}

#[test]
fn winning_square_uses_last_digits() {
    // Row digit 1 (from 21) sits at index 1; col digit 7 (from 17) at
    // index 2.
    let shuffled = board(
        Some(vec![3, 1, 4, 5, 9, 2, 6, 8, 7, 0]),
        Some(vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]),
    );
    assert_eq!(winning_square(Some(21), Some(17), &shuffled), Some((1, 2)));
}

#[test]
fn winning_square_covers_every_digit_pair() {
    let identity = board(Some((0..10).collect()), Some((0..10).collect()));
    for higher in 0..30 {
        for lower in 0..30 {
            assert_eq!(
                winning_square(Some(higher), Some(lower), &identity),
                Some((higher % 10, lower % 10))
            );
        }
    }
}
