//! LRC parsing into [`TimedLyricsDocument`]s.
//!
//! Only the `[mm:ss.xx]` tag form is recognized. Lines without such a tag
//! (ID tags like `[ar:...]`, blank lines, free text) are dropped.

use crate::document::{LyricsMetadata, TimedLine, TimedLyricsDocument};
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;
use tracing::debug;

const LOG_TARGET: &str = "lyrthing::lrc";

/// Source label used when the caller does not supply one
pub const DEFAULT_SOURCE: &str = "LRCLib";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// `[mm:ss.xx]` with exactly two ASCII digits in each field
#[allow(clippy::expect_used)]
static TIMESTAMP_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]{2}):([0-9]{2}\.[0-9]{2})\]").expect("timestamp tag pattern is valid")
});

/// Parse raw LRC text into a timed lyrics document.
///
/// Each line contributes at most one entry: the first `[mm:ss.xx]` tag found
/// anywhere in the line sets the start time, and the line with that one tag
/// removed (trimmed) becomes the text. Entries keep input order. The document
/// end time is the largest start time seen.
///
/// Never fails. When no line carries a tag the document is empty, which the
/// caller should treat as "no lyrics found".
#[must_use]
pub fn parse_lrc(
    raw: &str,
    metadata: LyricsMetadata,
    source: Option<&str>,
) -> TimedLyricsDocument {
    let mut lines = Vec::new();
    let mut end_time = 0;
    let mut skipped = 0usize;

    for line in raw.split('\n') {
        match parse_line(line) {
            Some(timed) => {
                end_time = end_time.max(timed.time);
                lines.push(timed);
            }
            None => skipped += 1,
        }
    }

    debug!(
        target: LOG_TARGET,
        "Parsed {} timed lines ({} untagged skipped, end at {}ms)",
        lines.len(),
        skipped,
        end_time
    );

    TimedLyricsDocument::from_parts(
        lines,
        end_time,
        source.unwrap_or(DEFAULT_SOURCE).to_string(),
        Some(metadata),
    )
}

fn parse_line(line: &str) -> Option<TimedLine> {
    let caps = TIMESTAMP_TAG.captures(line)?;
    let tag = caps.get(0)?;

    let minutes: u32 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    let time = tag_to_millis(minutes, seconds);

    let mut text = String::with_capacity(line.len() - tag.len());
    text.push_str(&line[..tag.start()]);
    text.push_str(&line[tag.end()..]);

    Some(TimedLine::new(time, trim_text(&text)))
}

/// Whitespace trim that also drops a byte order mark
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

/// `(minutes * 60 + seconds) * 1000`, rounded to the nearest millisecond
fn tag_to_millis(minutes: u32, seconds: f64) -> u64 {
    let millis = (f64::from(minutes) * 60.0 + seconds) * 1000.0;
    // Both inputs come from two-digit fields, so the value is small and non-negative
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let millis = millis.round() as u64;
    millis
}

/// Format milliseconds as an LRC tag body (`mm:ss.xx`).
///
/// Sub-hundredth precision is truncated. Minutes above 99 produce a
/// three-digit field that [`parse_lrc`] will not recognize.
#[must_use]
pub fn format_tag(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let hundredths = (millis % 1000) / 10;

    format!("{minutes:02}:{seconds:02}.{hundredths:02}")
}

/// Write a document back out as LRC text, one tagged line per entry.
#[must_use]
pub fn to_lrc(document: &TimedLyricsDocument) -> String {
    let mut output = String::new();

    for line in document.lines() {
        let _ = writeln!(output, "[{}]{}", format_tag(line.time), line.text);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> LyricsMetadata {
        LyricsMetadata::new("Artist", "Title", "Album")
    }

    #[test]
    fn test_parse_simple_line() {
        let doc = parse_lrc("[00:12.34]Hello world", meta(), None);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.lines()[0].time, 12340);
        assert_eq!(doc.lines()[0].text, "Hello world");
        assert_eq!(doc.end_time(), 12340);
    }

    #[test]
    fn test_parse_multiple_lines() {
        let input = "[00:05.00]First line\n[00:10.00]Second line\n[00:15.00]Third line";
        let doc = parse_lrc(input, meta(), None);
        let texts: Vec<_> = doc.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["First line", "Second line", "Third line"]);
        assert_eq!(doc.end_time(), 15000);
    }

    #[test]
    fn test_untagged_lines_ignored() {
        let doc = parse_lrc("no timestamp here\n[01:02.50]hello", meta(), None);
        assert_eq!(doc.lines(), [TimedLine::new(62500, "hello")]);
    }

    #[test]
    fn test_id_tags_and_blank_lines_ignored() {
        let input = "[ar:Artist]\n[ti:Title]\n\n[00:01.00]one\n\n[length:03:00]\n";
        let doc = parse_lrc(input, meta(), None);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.lines()[0].text, "one");
    }

    #[test]
    fn test_end_time_tracks_maximum_not_last() {
        let doc = parse_lrc("[00:01.00]a\n[00:00.50]b", meta(), None);
        assert_eq!(doc.end_time(), 1000);
        assert_eq!(doc.lines()[1].time, 500);
        // not re-sorted
        assert_eq!(doc.lines()[0].text, "a");
    }

    #[test]
    fn test_duplicates_kept() {
        let doc = parse_lrc("[00:01.00]a\n[00:01.00]a", meta(), None);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        for input in ["", "plain text\nno tags"] {
            let doc = parse_lrc(input, meta(), None);
            assert!(doc.is_empty());
            assert_eq!(doc.end_time(), 0);
        }
    }

    #[test]
    fn test_empty_text_is_instrumental() {
        let doc = parse_lrc("[00:20.00]   \r", meta(), None);
        assert_eq!(doc.len(), 1);
        assert!(doc.lines()[0].is_instrumental());
    }

    #[test]
    fn test_tag_found_anywhere_first_only_removed() {
        let doc = parse_lrc("intro [00:03.00] words [00:04.00] more", meta(), None);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.lines()[0].time, 3000);
        assert_eq!(doc.lines()[0].text, "intro  words [00:04.00] more");
    }

    #[test]
    fn test_malformed_tags_skipped() {
        let input = "[0:01.00]a\n[00:1.00]b\n[00:01.0]c\n[00:01:00]d\n[aa:bb.cc]e\n[123:45.67]f";
        assert!(parse_lrc(input, meta(), None).is_empty());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Arabic-Indic digits are not accepted as timestamp fields
        assert!(parse_lrc("[٠١:٠٢.٠٣]x", meta(), None).is_empty());
    }

    #[test]
    fn test_timestamp_math_across_range() {
        for minutes in [0u32, 1, 9, 42, 99] {
            for (sec_str, secs) in [("00.00", 0.0), ("07.25", 7.25), ("59.99", 59.99)] {
                let input = format!("[{minutes:02}:{sec_str}]text");
                let doc = parse_lrc(&input, meta(), None);
                let expected = (f64::from(minutes) * 60.0 + secs) * 1000.0;
                #[allow(clippy::cast_precision_loss)]
                let actual = doc.lines()[0].time as f64;
                assert!((actual - expected).abs() < 1.0, "{input}: {actual} vs {expected}");
                assert_eq!(doc.lines()[0].text, "text");
            }
        }
    }

    #[test]
    fn test_cjk_text() {
        let doc = parse_lrc("[00:05.00]你好世界", meta(), None);
        assert_eq!(doc.lines()[0].text, "你好世界");
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = parse_lrc("[00:05.00]one\r\n[00:06.00]two\r\n", meta(), None);
        assert_eq!(doc.lines()[0].text, "one");
        assert_eq!(doc.lines()[1].text, "two");
    }

    #[test]
    fn test_leading_byte_order_mark_stripped() {
        let doc = parse_lrc("\u{feff}[00:01.00]first\n[00:02.00]second", meta(), None);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.lines()[0].time, 1000);
        assert_eq!(doc.lines()[0].text, "first");

        let doc = parse_lrc("\u{feff}[00:01.00]", meta(), None);
        assert!(doc.lines()[0].is_instrumental());
    }

    #[test]
    fn test_source_and_metadata() {
        let doc = parse_lrc("[00:01.00]x", meta(), None);
        assert_eq!(doc.source(), DEFAULT_SOURCE);
        assert_eq!(doc.metadata(), Some(&meta()));

        let doc = parse_lrc("[00:01.00]x", meta(), Some("Local"));
        assert_eq!(doc.source(), "Local");
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag(0), "00:00.00");
        assert_eq!(format_tag(12_340), "00:12.34");
        assert_eq!(format_tag(90_000), "01:30.00");
        assert_eq!(format_tag(345_678), "05:45.67");
    }

    #[test]
    fn test_to_lrc_reparses() {
        let input = "[00:05.00]Hello world\n[00:07.50]\n[01:10.25]Second line\n";
        let doc = parse_lrc(input, meta(), None);
        let written = to_lrc(&doc);
        assert_eq!(written, input);

        let reparsed = parse_lrc(&written, meta(), None);
        assert_eq!(reparsed, doc);
    }
}
