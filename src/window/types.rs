//! Window-related types for timestamp-addressed up/down markets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{Duration, OffsetDateTime};

/// Interval class of an up/down market window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Interval {
    /// 5-minute market.
    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinute,
    /// 15-minute market.
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinute,
    /// Hourly market.
    #[strum(serialize = "hourly")]
    Hourly,
}

impl Interval {
    /// Cycle length in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Interval::FiveMinute => 300,
            Interval::FifteenMinute => 900,
            Interval::Hourly => 3600,
        }
    }

    /// Cycle length as a [`time::Duration`].
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.seconds())
    }
}

/// A deterministically computable scheduling slot for one up/down market.
///
/// Invariants: `close_timestamp % interval.seconds() == 0` and
/// `open_time == close_time - interval.duration()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketWindow {
    /// Interval class this window belongs to.
    pub interval: Interval,
    /// When the market opens.
    #[serde(with = "time::serde::rfc3339")]
    pub open_time: OffsetDateTime,
    /// When the market closes.
    #[serde(with = "time::serde::rfc3339")]
    pub close_time: OffsetDateTime,
    /// Market close time in Unix epoch seconds (UTC).
    pub close_timestamp: i64,
    /// Market slug derived from interval and close timestamp.
    pub slug: String,
}

impl MarketWindow {
    /// Build a window ending at an interval-aligned close timestamp.
    pub fn at_close(interval: Interval, close_timestamp: i64) -> Self {
        let close_time = OffsetDateTime::from_unix_timestamp(close_timestamp)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        Self {
            interval,
            open_time: close_time - interval.duration(),
            close_time,
            close_timestamp,
            slug: format!("btc-updown-{}-{}", interval, close_timestamp),
        }
    }

    /// Canonical event page URL for this window.
    pub fn event_url(&self, site_url: &str) -> String {
        format!("{}/event/{}", site_url.trim_end_matches('/'), self.slug)
    }

    /// Whether the market is open at `now`.
    pub fn is_open_at(&self, now: OffsetDateTime) -> bool {
        self.open_time <= now && now < self.close_time
    }

    /// Minutes until this window closes, negative once closed.
    pub fn minutes_until_close(&self, now: OffsetDateTime) -> i64 {
        (self.close_time - now).whole_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use time::macros::datetime;

    #[test]
    fn interval_from_string_works() {
        assert_eq!(Interval::from_str("5m").unwrap(), Interval::FiveMinute);
        assert_eq!(Interval::from_str("15m").unwrap(), Interval::FifteenMinute);
        assert_eq!(Interval::from_str("hourly").unwrap(), Interval::Hourly);
        assert!(Interval::from_str("30m").is_err());
    }

    #[test]
    fn interval_display_matches_slug_token() {
        assert_eq!(Interval::FiveMinute.to_string(), "5m");
        assert_eq!(Interval::FifteenMinute.to_string(), "15m");
        assert_eq!(Interval::Hourly.to_string(), "hourly");
    }

    #[test]
    fn window_open_time_is_close_minus_interval() {
        let window = MarketWindow::at_close(Interval::FifteenMinute, 1_765_301_400);
        assert_eq!(window.close_time - window.open_time, Duration::seconds(900));
        assert_eq!(window.slug, "btc-updown-15m-1765301400");
    }

    #[test]
    fn window_open_query_is_half_open() {
        let window = MarketWindow::at_close(Interval::FiveMinute, 1_765_301_400);
        assert!(window.is_open_at(window.open_time));
        assert!(!window.is_open_at(window.close_time));
    }

    #[test]
    fn event_url_joins_slug() {
        let window = MarketWindow::at_close(Interval::FiveMinute, 300);
        assert_eq!(
            window.event_url("https://polymarket.com/"),
            "https://polymarket.com/event/btc-updown-5m-300"
        );
    }

    #[test]
    fn minutes_until_close_counts_down() {
        let window = MarketWindow::at_close(Interval::Hourly, 3600);
        let now = datetime!(1970-01-01 00:30:00 UTC);
        assert_eq!(window.minutes_until_close(now), 30);
    }
}
