//! Active line selection across a whole document.

use crate::document::TimedLyricsDocument;
use crate::timing::{classify_line, LineStatus};

#[allow(clippy::cast_precision_loss)]
fn ms(value: u64) -> f64 {
    value as f64
}

/// Classify every line of `document` at `position_ms + offset_ms`.
///
/// Each line spans from its own start to the next line's start, or to the
/// document end time for the last line.
#[must_use]
pub fn line_statuses(
    document: &TimedLyricsDocument,
    position_ms: f64,
    offset_ms: f64,
) -> Vec<LineStatus> {
    document
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let end = document.line_end(i).unwrap_or(line.time);
            classify_line(position_ms, ms(line.time), ms(end), offset_ms)
        })
        .collect()
}

/// Index of the line active at `position_ms + offset_ms`.
///
/// `None` before the first line, after the last, during zero-length gaps and
/// for empty documents.
#[must_use]
pub fn active_line(document: &TimedLyricsDocument, position_ms: f64, offset_ms: f64) -> Option<usize> {
    (0..document.len()).find(|&i| {
        let start = document.lines()[i].time;
        let end = document.line_end(i).unwrap_or(start);
        classify_line(position_ms, ms(start), ms(end), offset_ms).is_active
    })
}

/// Remembers the last active line and reports only changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveLineTracker {
    current: Option<usize>,
    offset_ms: f64,
}

impl ActiveLineTracker {
    #[must_use]
    pub const fn new(offset_ms: f64) -> Self {
        Self {
            current: None,
            offset_ms,
        }
    }

    /// Last reported active line
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Recompute the active line; returns `Some(new)` when it changed.
    pub fn update(
        &mut self,
        document: &TimedLyricsDocument,
        position_ms: f64,
    ) -> Option<Option<usize>> {
        let active = active_line(document, position_ms, self.offset_ms);
        if active == self.current {
            None
        } else {
            self.current = active;
            Some(active)
        }
    }

    /// Forget the last active line (new track or new document)
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TimedLine;

    fn doc() -> TimedLyricsDocument {
        TimedLyricsDocument::new(
            vec![
                TimedLine::new(1000, "one"),
                TimedLine::new(2000, ""),
                TimedLine::new(3000, "three"),
                TimedLine::new(5000, "four"),
            ],
            "test",
            None,
        )
    }

    #[test]
    fn test_active_line_selection() {
        let doc = doc();
        assert_eq!(active_line(&doc, 0.0, 0.0), None);
        assert_eq!(active_line(&doc, 1000.0, 0.0), Some(0));
        assert_eq!(active_line(&doc, 1999.0, 0.0), Some(0));
        assert_eq!(active_line(&doc, 2000.0, 0.0), Some(1));
        assert_eq!(active_line(&doc, 4999.0, 0.0), Some(2));
    }

    #[test]
    fn test_last_line_spans_to_end_time() {
        // end time equals the last start, so the last line has zero length
        let doc = doc();
        assert_eq!(active_line(&doc, 5000.0, 0.0), None);
        assert_eq!(active_line(&doc, 9000.0, 0.0), None);
    }

    #[test]
    fn test_active_line_with_offset() {
        let doc = doc();
        assert_eq!(active_line(&doc, 950.0, 100.0), Some(0));
        assert_eq!(active_line(&doc, 1050.0, -100.0), None);
    }

    #[test]
    fn test_active_line_empty_document() {
        let doc = TimedLyricsDocument::new(vec![], "test", None);
        assert_eq!(active_line(&doc, 1000.0, 0.0), None);
        assert!(line_statuses(&doc, 1000.0, 0.0).is_empty());
    }

    #[test]
    fn test_unordered_lines_never_double_active() {
        let doc = TimedLyricsDocument::new(
            vec![TimedLine::new(1000, "a"), TimedLine::new(500, "b")],
            "test",
            None,
        );
        // line 0 spans [1000, 500) and can never be active
        let statuses = line_statuses(&doc, 700.0, 0.0);
        assert!(!statuses[0].is_active);
        assert!(statuses[1].is_active);
    }

    #[test]
    fn test_line_statuses() {
        let statuses = line_statuses(&doc(), 2500.0, 0.0);
        assert_eq!(statuses.len(), 4);
        assert!(statuses[0].is_past());
        assert!(statuses[1].is_active);
        assert_eq!(statuses[1].percentage, 50.0);
        assert_eq!(statuses[2].ms_before_active, 500.0);
        assert_eq!(statuses.iter().filter(|s| s.is_active).count(), 1);
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let doc = doc();
        let mut tracker = ActiveLineTracker::new(0.0);

        assert_eq!(tracker.update(&doc, 500.0), None);
        assert_eq!(tracker.update(&doc, 1000.0), Some(Some(0)));
        assert_eq!(tracker.update(&doc, 1500.0), None);
        assert_eq!(tracker.update(&doc, 2100.0), Some(Some(1)));
        assert_eq!(tracker.current(), Some(1));
        assert_eq!(tracker.update(&doc, 6000.0), Some(None));

        tracker.reset();
        assert_eq!(tracker.current(), None);
    }
}
