//! The EGD rating system.
//!
//! Ratings are updated by `r' = r + con * (Sa - Se) + bonus`, where `Sa` is the actual game result
//! and `Se` the expected result given by the Bradley-Terry formula over the [`beta`] transform of
//! both players' ratings. See <https://europeangodatabase.eu/EGD/EGF_rating_system.php>.

use crate::message::{Game, RatingResponse};

/// The rating ceiling.
///
/// Both [`beta`] and [`con`] take the logarithm or power of the distance to this value, so ratings
/// are only meaningful strictly below it.
pub const MAX_RATING: f64 = 3300.0;

/// Multiplier of the logarithm in [`beta`].
pub const BETA_SCALE: f64 = 7.0;

pub const CON_DIVISOR: f64 = 200.0;
pub const CON_EXPONENT: f64 = 1.6;

/// The rating at which the deflation bonus takes its midpoint value `ln(2) / 5`.
pub const BONUS_PIVOT: f64 = 2300.0;
pub const BONUS_SPREAD: f64 = 80.0;
pub const BONUS_DIVISOR: f64 = 5.0;

/// The mapping of a rating onto the scale used by the Bradley-Terry formula.
pub fn beta(rating: f64) -> f64 {
    -BETA_SCALE * (MAX_RATING - rating).ln()
}

/// The winning probability of a player with `beta_player` against one with `beta_opponent`.
pub fn expected_result(beta_player: f64, beta_opponent: f64) -> f64 {
    1.0 / (1.0 + (beta_opponent - beta_player).exp())
}

/// The rating volatility factor, analogous to K in the Elo system.
pub fn con(rating: f64) -> f64 {
    ((MAX_RATING - rating) / CON_DIVISOR).powf(CON_EXPONENT)
}

/// Term counteracting rating deflation, larger for weaker players.
pub fn bonus(rating: f64) -> f64 {
    (1.0 + ((BONUS_PIVOT - rating) / BONUS_SPREAD).exp()).ln() / BONUS_DIVISOR
}

/// Compute the player's new rating after `game`.
///
/// Ratings at or above [`MAX_RATING`] are not rejected here; they yield non-finite fields.
pub fn update(game: &Game) -> RatingResponse {
    let player = game.player_rating();

    let beta_player = beta(player);
    let beta_opponent = beta(game.opponent_rating());
    let expected_result = expected_result(beta_player, beta_opponent);

    let con = con(player);
    let bonus = bonus(player);
    let new_rating = player + con * (game.result() - expected_result) + bonus;

    RatingResponse {
        new_rating,
        gor_change: new_rating - player,
        expected_result,
        con,
        bonus,
        beta: beta_player,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::message::RatingRequest;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-9;

    fn game(player: f64, opponent: f64, result: f64) -> Game {
        RatingRequest {
            player_rating: Some(player),
            opponent_rating: Some(opponent),
            result: Some(result),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_update_matches_closed_form() {
        for (player, opponent, result) in [
            (2300.0, 2002.0, 1.0),
            (2300.0, 2002.0, 0.0),
            (1500.0, 1800.0, 0.5),
            (100.0, 2700.0, 1.0),
            (0.0, 0.0, 0.0),
            (3000.0, 2950.0, 0.5),
            (-900.0, 20.0, 1.0),
        ] {
            let rating = update(&game(player, opponent, result));

            let beta_player = -7.0 * (3300.0 - player).ln();
            let beta_opponent = -7.0 * (3300.0 - opponent).ln();
            let se = 1.0 / (1.0 + (beta_opponent - beta_player).exp());
            let con = ((3300.0 - player) / 200.0).powf(1.6);
            let bonus = (1.0 + ((2300.0 - player) / 80.0).exp()).ln() / 5.0;
            let new_rating = player + con * (result - se) + bonus;

            assert_abs_diff_eq!(rating.beta, beta_player, epsilon = EPSILON);
            assert_abs_diff_eq!(rating.expected_result, se, epsilon = EPSILON);
            assert_abs_diff_eq!(rating.con, con, epsilon = EPSILON);
            assert_abs_diff_eq!(rating.bonus, bonus, epsilon = EPSILON);
            assert_abs_diff_eq!(rating.new_rating, new_rating, epsilon = EPSILON);
            assert_abs_diff_eq!(rating.gor_change, new_rating - player, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_scenario_2300_beats_2002() {
        let rating = update(&game(2300.0, 2002.0, 1.0));

        assert_abs_diff_eq!(rating.beta, -7.0 * 1000f64.ln(), epsilon = EPSILON);
        assert_abs_diff_eq!(rating.beta, -48.354286952875, epsilon = EPSILON);

        // Se = 1 / (1 + ((MAX - r1) / (MAX - r2))^7)
        let se = 1.0 / (1.0 + (1000.0f64 / 1298.0).powi(7));
        assert_abs_diff_eq!(rating.expected_result, se, epsilon = EPSILON);

        assert_abs_diff_eq!(rating.con, 5f64.powf(1.6), epsilon = EPSILON);
        assert_abs_diff_eq!(rating.bonus, 2f64.ln() / 5.0, epsilon = EPSILON);
        assert_abs_diff_eq!(
            rating.new_rating,
            2300.0 + 5f64.powf(1.6) * (1.0 - se) + 2f64.ln() / 5.0,
            epsilon = EPSILON
        );
        assert!(rating.gor_change > 0.0);
    }

    #[test]
    fn test_equal_ratings_expect_even_result() {
        let rating = update(&game(1900.0, 1900.0, 0.5));
        assert_eq!(rating.expected_result, 0.5);
        assert_abs_diff_eq!(rating.gor_change, rating.bonus, epsilon = EPSILON);
    }

    #[test]
    fn test_update_is_deterministic() {
        let g = game(1734.25, 2011.5, 0.5);
        let a = update(&g);
        let b = update(&g);
        assert_eq!(a.new_rating.to_bits(), b.new_rating.to_bits());
        assert_eq!(a.gor_change.to_bits(), b.gor_change.to_bits());
        assert_eq!(a.expected_result.to_bits(), b.expected_result.to_bits());
        assert_eq!(a.con.to_bits(), b.con.to_bits());
        assert_eq!(a.bonus.to_bits(), b.bonus.to_bits());
        assert_eq!(a.beta.to_bits(), b.beta.to_bits());
    }

    #[test]
    fn test_con_and_bonus_shrink_with_rating() {
        assert!(con(1000.0) > con(2000.0));
        assert!(con(2000.0) > con(3000.0));
        assert!(bonus(1000.0) > bonus(2000.0));
        assert!(bonus(2000.0) > bonus(3000.0));
        assert_abs_diff_eq!(bonus(BONUS_PIVOT), 2f64.ln() / 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_ratings_at_ceiling_are_not_finite() {
        let rating = update(&game(MAX_RATING, 2000.0, 1.0));
        assert_eq!(rating.beta, f64::INFINITY);

        let rating = update(&game(2000.0, 3500.0, 1.0));
        assert!(rating.expected_result.is_nan());
        assert!(rating.new_rating.is_nan());
    }
}
