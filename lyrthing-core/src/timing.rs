//! Line timing classification.
//!
//! Given a playback position and a line's `[start, end)` interval, decide
//! whether the line is active and how far through it playback is. All values
//! are milliseconds as `f64` so negative positions and offsets are accepted.

use serde::{Deserialize, Serialize};

/// Classification of one line at one playback position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    /// Position lies within `[start, end)`
    pub is_active: bool,
    /// Progress through the line, 0 before it and 100 after it
    pub percentage: f64,
    /// Time since the line started (active) or since it ended (past)
    #[serde(rename = "secondsAfterActive")]
    pub ms_after_active: f64,
    /// Time until the line starts, 0 once it has started
    #[serde(rename = "secondsBeforeActive")]
    pub ms_before_active: f64,
}

impl LineStatus {
    /// Whether a renderer should scroll this line into view.
    ///
    /// True during the first half of an active line.
    #[must_use]
    pub fn is_scroll_anchor(&self) -> bool {
        self.percentage > 0.0 && self.percentage < 50.0
    }

    /// Line has finished
    #[must_use]
    pub fn is_past(&self) -> bool {
        !self.is_active && self.percentage >= 100.0
    }
}

/// Classify a line at `current_ms + offset_ms`.
///
/// The adjusted position is rounded to whole milliseconds first. Then:
///
/// - before `start_ms`: inactive, 0%, time remaining in `ms_before_active`
/// - before `end_ms`: active, percentage rounded to 2 decimals
/// - otherwise: inactive, 100%, time since end in `ms_after_active`
///
/// A line with `end_ms <= start_ms` can never satisfy the active branch and
/// falls through to the before or after case.
#[must_use]
pub fn classify_line(current_ms: f64, start_ms: f64, end_ms: f64, offset_ms: f64) -> LineStatus {
    let adjusted = round_to(current_ms + offset_ms, 0);

    if adjusted < start_ms {
        LineStatus {
            is_active: false,
            percentage: 0.0,
            ms_after_active: 0.0,
            ms_before_active: start_ms - adjusted,
        }
    } else if adjusted < end_ms {
        let elapsed = adjusted - start_ms;
        LineStatus {
            is_active: true,
            percentage: round_to(elapsed / (end_ms - start_ms) * 100.0, 2),
            ms_after_active: elapsed,
            ms_before_active: 0.0,
        }
    } else {
        LineStatus {
            is_active: false,
            percentage: 100.0,
            ms_after_active: adjusted - end_ms,
            ms_before_active: 0.0,
        }
    }
}

/// [`classify_line`] with no offset
#[must_use]
pub fn classify_line_at(current_ms: f64, start_ms: f64, end_ms: f64) -> LineStatus {
    classify_line(current_ms, start_ms, end_ms, 0.0)
}

/// Round half away from zero to `places` decimal places
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
