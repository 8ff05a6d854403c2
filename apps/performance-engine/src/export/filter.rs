//! Trade selection for export.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{BrokerClock, TradeRecord};

/// Selector value that disables a text filter.
const ANY: &str = "All";

/// Export selection. Every criterion is optional; bounds are inclusive and
/// compare against local entry time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    /// Earliest local entry time.
    pub start: Option<NaiveDateTime>,
    /// Latest local entry time.
    pub end: Option<NaiveDateTime>,
    /// Exact symbol, or `All`.
    pub symbol: Option<String>,
    /// Exact strategy tag, or `All`.
    pub strategy: Option<String>,
}

impl TradeFilter {
    /// Filter that keeps everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to whole calendar days, `to` included up to its last second.
    #[must_use]
    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.start = from.map(|d| d.and_time(NaiveTime::MIN));
        self.end = to.and_then(|d| d.and_hms_opt(23, 59, 59));
        self
    }

    /// Restrict to a symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Restrict to a strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Whether `trade` is selected.
    #[must_use]
    pub fn matches(&self, trade: &TradeRecord, clock: &BrokerClock) -> bool {
        let entry = trade.local_entry_time(clock);
        if self.start.is_some_and(|start| entry < start) {
            return false;
        }
        if self.end.is_some_and(|end| entry > end) {
            return false;
        }
        text_matches(self.symbol.as_deref(), &trade.symbol)
            && text_matches(self.strategy.as_deref(), &trade.strategy)
    }
}

fn text_matches(selector: Option<&str>, value: &str) -> bool {
    match selector.map(str::trim) {
        None => true,
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case(ANY) => true,
        Some(s) => s == value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::fixtures::timed;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn all_keeps_everything() {
        let t = timed(1, dec!(5), "2024-01-10 10:00", "2024-01-10 11:00");
        assert!(TradeFilter::all().matches(&t, &BrokerClock::default()));
        assert!(
            TradeFilter::all()
                .with_symbol("all")
                .with_strategy("")
                .matches(&t, &BrokerClock::default())
        );
    }

    #[test]
    fn date_bounds_use_local_entry_time() {
        // 23:00 broker is 01:00 the next day locally.
        let t = timed(1, dec!(5), "2024-01-10 23:00", "2024-01-10 23:30");
        let clock = BrokerClock::default();
        let jan_10 = TradeFilter::all().with_dates(Some(date("2024-01-10")), Some(date("2024-01-10")));
        let jan_11 = TradeFilter::all().with_dates(Some(date("2024-01-11")), Some(date("2024-01-11")));
        assert!(!jan_10.matches(&t, &clock));
        assert!(jan_11.matches(&t, &clock));
        assert!(jan_10.matches(&t, &BrokerClock::identity()));
    }

    #[test]
    fn symbol_and_strategy_are_exact() {
        let t = timed(1, dec!(5), "2024-01-10 10:00", "2024-01-10 11:00");
        let clock = BrokerClock::default();
        assert!(TradeFilter::all().with_symbol("EURUSD").matches(&t, &clock));
        assert!(!TradeFilter::all().with_symbol("GBPUSD").matches(&t, &clock));
        assert!(!TradeFilter::all().with_strategy("RangeRider").matches(&t, &clock));
    }
}
