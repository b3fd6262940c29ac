//! Time and duration conversion utilities.

use std::time::Duration;

/// Extension trait for safe Duration conversions.
pub trait DurationExt {
    /// Convert duration to milliseconds as u64, saturating at `u64::MAX`.
    fn as_millis_u64(&self) -> u64;
}

impl DurationExt for Duration {
    fn as_millis_u64(&self) -> u64 {
        u64::try_from(self.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Format a playback position for display.
///
/// `m:ss` below an hour, `h:mm:ss` from an hour on. With `show_millis`, a
/// non-zero millisecond part is appended as `.mmm` (sub-hour only).
#[must_use]
pub fn format_clock(position: Duration, show_millis: bool) -> String {
    let total_secs = position.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = position.subsec_millis();

    if hours > 0 {
        return format!("{hours}:{minutes:02}:{seconds:02}");
    }

    if show_millis && millis > 0 {
        format!("{minutes}:{seconds:02}.{millis:03}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_millis_u64() {
        assert_eq!(Duration::from_millis(1234).as_millis_u64(), 1234);
        assert_eq!(Duration::ZERO.as_millis_u64(), 0);
    }

    #[test]
    fn test_format_clock_minutes() {
        assert_eq!(format_clock(Duration::ZERO, false), "0:00");
        assert_eq!(format_clock(Duration::from_secs(65), false), "1:05");
        assert_eq!(format_clock(Duration::from_secs(59 * 60 + 59), false), "59:59");
    }

    #[test]
    fn test_format_clock_hours() {
        assert_eq!(format_clock(Duration::from_secs(3600), false), "1:00:00");
        assert_eq!(format_clock(Duration::from_millis(3_725_500), true), "1:02:05");
    }

    #[test]
    fn test_format_clock_millis() {
        assert_eq!(format_clock(Duration::from_millis(62_500), true), "1:02.500");
        assert_eq!(format_clock(Duration::from_millis(62_500), false), "1:02");
        assert_eq!(format_clock(Duration::from_secs(62), true), "1:02");
    }
}
