use super::filter::AnnotatedRecord;
use super::model::BowlingType;

/// Decimal places shown for the residual column.
pub const RESIDUAL_DIGITS: i32 = 3;
/// Decimal places shown for the t-statistic column.
pub const T_STAT_DIGITS: i32 = 2;

/// One leaderboard row: `(Batter, Type, Balls, Residual, T-Stat)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub batter: String,
    pub bowling_type: BowlingType,
    pub balls: u32,
    pub residual: f64,
    pub t_stat: f64,
    pub elite: bool,
}

impl DisplayRow {
    pub const HEADERS: [&'static str; 5] = ["Batter", "Type", "Balls", "Residual", "T-Stat"];
}

/// Round to `digits` decimal places, ties to even.
///
/// The value is scaled by `10^digits` and rounded there, so `0.0625` at
/// three places becomes `0.062` and `2.375` at two places becomes `2.38`.
pub fn round_half_even(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale
}

/// Presentation-only projection of ranked records. Never feed the result
/// back into export; it has lost precision.
pub fn project_for_display(records: &[AnnotatedRecord]) -> Vec<DisplayRow> {
    records
        .iter()
        .map(|r| DisplayRow {
            batter: r.record.batter_id.clone(),
            bowling_type: r.record.bowling_type,
            balls: r.record.n_balls,
            residual: round_half_even(r.record.mean_residual, RESIDUAL_DIGITS),
            t_stat: round_half_even(r.record.t_stat, T_STAT_DIGITS),
            elite: r.elite,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::annotate_elite;
    use crate::data::model::record;

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_half_even(0.0625, 3), 0.062);
        assert_eq!(round_half_even(0.1875, 3), 0.188);
        assert_eq!(round_half_even(2.125, 2), 2.12);
        assert_eq!(round_half_even(2.375, 2), 2.38);
        assert_eq!(round_half_even(-2.125, 2), -2.12);
    }

    #[test]
    fn non_ties_round_to_nearest() {
        assert_eq!(round_half_even(1.23456, 3), 1.235);
        assert_eq!(round_half_even(12.0, 2), 12.0);
    }

    #[test]
    fn projection_rounds_without_touching_source() {
        let ranked = annotate_elite(vec![record("P1", BowlingType::Pace, 150, 0.123456, 2.4567)]);
        let rows = project_for_display(&ranked);

        assert_eq!(
            rows,
            vec![DisplayRow {
                batter: "P1".into(),
                bowling_type: BowlingType::Pace,
                balls: 150,
                residual: 0.123,
                t_stat: 2.46,
                elite: true,
            }]
        );
        assert_eq!(ranked[0].record.mean_residual, 0.123456);
    }
}
