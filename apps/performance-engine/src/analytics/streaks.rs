//! Consecutive win/loss runs.

use rust_decimal::Decimal;

use crate::domain::{ClosedTrade, Streaks};

/// Chronological replay of trade outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator;

impl StreakCalculator {
    /// Longest winning and losing runs, replayed by entry time ascending.
    ///
    /// A positive R extends the win run and ends the loss run, a negative R
    /// does the opposite. A trade at exactly 0R ends both runs.
    #[must_use]
    pub fn max_streaks<T: ClosedTrade>(trades: &[T]) -> Streaks {
        let mut ordered: Vec<&T> = trades.iter().collect();
        ordered.sort_by_key(|t| t.opened_at());

        let mut streaks = Streaks::default();
        let mut current_wins = 0u64;
        let mut current_losses = 0u64;

        for trade in ordered {
            let r = trade.outcome_r();
            if r > Decimal::ZERO {
                current_wins += 1;
                current_losses = 0;
                streaks.max_consecutive_wins = streaks.max_consecutive_wins.max(current_wins);
            } else if r < Decimal::ZERO {
                current_losses += 1;
                current_wins = 0;
                streaks.max_consecutive_losses = streaks.max_consecutive_losses.max(current_losses);
            } else {
                current_wins = 0;
                current_losses = 0;
            }
        }

        streaks
    }
}
