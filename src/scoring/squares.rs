// src/scoring/squares.rs
//
// Winning-square lookup for a squares grid. Rows track the higher side's
// score, columns the lower side's. Undetermined until both scores exist
// and the digit shuffle has run.
use crate::models::squares::SquaresBoard;

/// Find the (row_idx, col_idx) of the winning square for a pair of
/// scores, by matching each score's last digit against the shuffled axis
/// digits. Returns `None` while either score or the digit assignment is
/// missing, or if the stored assignment is malformed.
pub fn winning_square(
    higher_score: Option<i32>,
    lower_score: Option<i32>,
    board: &SquaresBoard,
) -> Option<(i32, i32)> {
    let higher = higher_score?;
    let lower = lower_score?;
    let row_digits = board.row_digits.as_ref()?;
    let col_digits = board.col_digits.as_ref()?;

    let row_digit = higher.rem_euclid(10);
    let col_digit = lower.rem_euclid(10);

    let row_idx = row_digits.iter().position(|&d| d == row_digit)?;
    let col_idx = col_digits.iter().position(|&d| d == col_digit)?;
    Some((row_idx as i32, col_idx as i32))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn board(row: Option<Vec<i32>>, col: Option<Vec<i32>>) -> SquaresBoard {
        SquaresBoard {
            pool_id: Uuid::new_v4(),
            row_digits: row,
            col_digits: col,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn undetermined_until_scores_and_digits_exist() {
        let unshuffled = board(None, None);
        assert_eq!(winning_square(Some(14), Some(7), &unshuffled), None);

        let shuffled = board(Some((0..10).collect()), Some((0..10).collect()));
        assert_eq!(winning_square(None, Some(7), &shuffled), None);
        assert_eq!(winning_square(Some(14), None, &shuffled), None);
    }

    #[test]
    fn matches_last_digit_of_each_score() {
        // Identity assignment: digit d sits at index d.
        let shuffled = board(Some((0..10).collect()), Some((0..10).collect()));
        assert_eq!(winning_square(Some(14), Some(7), &shuffled), Some((4, 7)));
        assert_eq!(winning_square(Some(30), Some(0), &shuffled), Some((0, 0)));
    }

    #[test]
    fn respects_a_shuffled_assignment() {
        let shuffled = board(
            Some(vec![3, 1, 4, 0, 5, 9, 2, 6, 8, 7]),
            Some(vec![7, 0, 8, 2, 5, 3, 9, 4, 6, 1]),
        );
        // Higher 24 -> digit 4 at row index 2; lower 17 -> digit 7 at col index 0.
        assert_eq!(winning_square(Some(24), Some(17), &shuffled), Some((2, 0)));
    }

    #[test]
    fn malformed_assignment_degrades_to_none() {
        let bad = board(Some(vec![0, 1, 2]), Some((0..10).collect()));
        assert_eq!(winning_square(Some(14), Some(7), &bad), None);
    }
}
