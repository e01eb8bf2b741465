//! "HH:MM" remaining-time value

use core::fmt::{self, Write};

use heapless::String;

/// Length of the formatted `HH:MM` string
pub const TIME_LEFT_LEN: usize = 5;

const MS_PER_MINUTE: u64 = 60_000;

/// Largest value representable with two-digit fields
const MAX_HOURS: u64 = 99;
const MAX_MINUTES: u64 = 59;

/// Remaining countdown time in whole hours and minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeLeft {
    /// Whole hours (0-99)
    pub hours: u8,
    /// Minutes past the hour (0-59)
    pub minutes: u8,
}

impl TimeLeft {
    /// Nothing left
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Convert remaining milliseconds, rounding down to whole minutes
    ///
    /// Durations beyond 99:59 saturate there. Such durations only arise
    /// from out-of-range hour counts, which callers reject.
    pub fn from_millis(remaining_ms: u64) -> Self {
        let minutes_left = remaining_ms / MS_PER_MINUTE;
        let (hours, minutes) = if minutes_left / 60 > MAX_HOURS {
            (MAX_HOURS, MAX_MINUTES)
        } else {
            (minutes_left / 60, minutes_left % 60)
        };

        Self {
            hours: hours as u8,
            minutes: minutes as u8,
        }
    }

    /// Format as a zero-padded `HH:MM` string
    pub fn to_hhmm(&self) -> String<TIME_LEFT_LEN> {
        let mut out = String::new();
        // Both fields are bounded to two digits, so this always fits
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero() {
        assert_eq!(TimeLeft::ZERO.to_hhmm().as_str(), "00:00");
        assert_eq!(TimeLeft::from_millis(0), TimeLeft::ZERO);
    }

    #[test]
    fn test_rounds_down_to_minutes() {
        assert_eq!(TimeLeft::from_millis(59_999).to_hhmm().as_str(), "00:00");
        assert_eq!(TimeLeft::from_millis(60_000).to_hhmm().as_str(), "00:01");
        assert_eq!(TimeLeft::from_millis(119_999).to_hhmm().as_str(), "00:01");
    }

    #[test]
    fn test_hours_and_minutes() {
        let left = TimeLeft::from_millis(3 * 3_600_000 + 25 * 60_000);
        assert_eq!(left, TimeLeft { hours: 3, minutes: 25 });
        assert_eq!(left.to_hhmm().as_str(), "03:25");
    }

    #[test]
    fn test_full_day() {
        assert_eq!(
            TimeLeft::from_millis(24 * 3_600_000).to_hhmm().as_str(),
            "24:00"
        );
    }

    #[test]
    fn test_saturates_beyond_two_digits() {
        let left = TimeLeft::from_millis(255 * 3_600_000);
        assert_eq!(left.to_hhmm().as_str(), "99:59");

        // Just inside the limit is still exact
        let edge = TimeLeft::from_millis(99 * 3_600_000 + 59 * 60_000);
        assert_eq!(edge.to_hhmm().as_str(), "99:59");
    }

    proptest! {
        #[test]
        fn prop_always_five_chars(ms in any::<u64>()) {
            let text = TimeLeft::from_millis(ms).to_hhmm();
            prop_assert_eq!(text.len(), TIME_LEFT_LEN);
            prop_assert_eq!(text.as_bytes()[2], b':');
        }

        #[test]
        fn prop_minutes_below_sixty(ms in 0u64..(100 * 3_600_000)) {
            let left = TimeLeft::from_millis(ms);
            prop_assert!(left.minutes < 60);
            prop_assert_eq!(
                u64::from(left.hours) * 60 + u64::from(left.minutes),
                ms / 60_000
            );
        }
    }
}
