//! Window generation from the wall clock.
//!
//! Pure computation: given a clock reading, an interval set and a lookahead,
//! emit every upcoming window whose close lands on the interval's round
//! boundary grid. There is no failure mode here; callers skip unrecognized
//! interval tokens before they reach this module.

use time::{Duration, OffsetDateTime};

use super::types::{Interval, MarketWindow};

/// Generate upcoming windows for the given intervals, ordered per interval by
/// close time, covering `look_ahead` from now.
pub fn generate_windows(intervals: &[Interval], look_ahead: Duration) -> Vec<MarketWindow> {
    generate_windows_at(intervals, look_ahead, OffsetDateTime::now_utc())
}

/// [`generate_windows`] with an explicit clock reading, for determinism.
pub fn generate_windows_at(
    intervals: &[Interval],
    look_ahead: Duration,
    now: OffsetDateTime,
) -> Vec<MarketWindow> {
    let mut windows = Vec::new();
    let end = now + look_ahead;

    for &interval in intervals {
        let step = interval.seconds();

        // Next close on the round-boundary grid, strictly after now. A clock
        // reading exactly on a boundary belongs to the window that just
        // closed, so the next close is a full cycle out.
        let mut close_ts = (now.unix_timestamp().div_euclid(step) + 1) * step;

        loop {
            let window = MarketWindow::at_close(interval, close_ts);
            if window.close_time > end {
                break;
            }
            windows.push(window);
            close_ts += step;
        }
    }

    windows
}

/// Windows that are currently open (`open_time <= now < close_time`),
/// searched over a one-hour lookahead. Typically 0-1 per interval.
pub fn active_windows(intervals: &[Interval]) -> Vec<MarketWindow> {
    active_windows_at(intervals, OffsetDateTime::now_utc())
}

/// [`active_windows`] with an explicit clock reading.
pub fn active_windows_at(intervals: &[Interval], now: OffsetDateTime) -> Vec<MarketWindow> {
    generate_windows_at(intervals, Duration::hours(1), now)
        .into_iter()
        .filter(|w| w.is_open_at(now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn all_windows_align_to_interval_grid() {
        let now = datetime!(2026-02-14 13:37:42.5 UTC);
        let windows = generate_windows_at(
            &[Interval::FiveMinute, Interval::FifteenMinute, Interval::Hourly],
            Duration::hours(2),
            now,
        );

        assert!(!windows.is_empty());
        for window in &windows {
            let step = window.interval.seconds();
            assert_eq!(window.close_timestamp % step, 0, "{}", window.slug);
            assert_eq!(
                window.close_time - window.open_time,
                window.interval.duration()
            );
            assert!(window.close_time > now);
        }
    }

    #[test]
    fn aligned_clock_yields_exact_count() {
        // Clock at :00:00 exactly: a 1-hour lookahead covers exactly 60/M
        // windows per interval, the last closing at now + 1h.
        let now = datetime!(2026-02-14 13:00:00 UTC);

        let five = generate_windows_at(&[Interval::FiveMinute], Duration::hours(1), now);
        assert_eq!(five.len(), 12);

        let fifteen = generate_windows_at(&[Interval::FifteenMinute], Duration::hours(1), now);
        assert_eq!(fifteen.len(), 4);

        let hourly = generate_windows_at(&[Interval::Hourly], Duration::hours(1), now);
        assert_eq!(hourly.len(), 1);

        // First close is a full cycle out, not on the boundary we sit on.
        assert_eq!(five[0].close_time, now + Duration::minutes(5));
        assert_eq!(hourly[0].close_time, now + Duration::hours(1));
    }

    #[test]
    fn windows_are_ordered_and_contiguous_per_interval() {
        let now = datetime!(2026-02-14 13:02:11 UTC);
        let windows = generate_windows_at(&[Interval::FiveMinute], Duration::hours(1), now);

        for pair in windows.windows(2) {
            assert_eq!(
                pair[1].close_timestamp - pair[0].close_timestamp,
                Interval::FiveMinute.seconds()
            );
        }
    }

    #[test]
    fn active_windows_cover_now() {
        let now = datetime!(2026-02-14 13:07:30 UTC);
        let active = active_windows_at(&[Interval::FiveMinute, Interval::FifteenMinute], now);

        // One open window per interval at this instant.
        assert_eq!(active.len(), 2);
        for window in &active {
            assert!(window.open_time <= now && now < window.close_time);
        }
        assert_eq!(active[0].slug, format!("btc-updown-5m-{}", active[0].close_timestamp));
    }

    #[test]
    fn active_windows_empty_input_yields_nothing() {
        let now = datetime!(2026-02-14 13:07:30 UTC);
        assert!(active_windows_at(&[], now).is_empty());
    }

    #[test]
    fn generation_is_deterministic() {
        let now = datetime!(2026-02-14 09:41:03 UTC);
        let a = generate_windows_at(&[Interval::FifteenMinute], Duration::hours(2), now);
        let b = generate_windows_at(&[Interval::FifteenMinute], Duration::hours(2), now);
        assert_eq!(a, b);
    }
}
