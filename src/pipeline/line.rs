//! Line records with provenance back to the source file

use serde::Serialize;
use std::fmt;

/// Where a line came from in the original source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LineNumber {
    /// 1-based line number in the original file
    Exact(u32),
    /// Position in a re-split text (minified output); only approximates the source
    Approx(u32),
}

impl LineNumber {
    pub fn value(&self) -> u32 {
        match self {
            LineNumber::Exact(n) | LineNumber::Approx(n) => *n,
        }
    }

    pub fn is_approx(&self) -> bool {
        matches!(self, LineNumber::Approx(_))
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineNumber::Exact(n) => write!(f, "{}", n),
            LineNumber::Approx(n) => write!(f, "~{}", n),
        }
    }
}

/// One line flowing through the pipeline.
///
/// Once `retained` is false no later stage sets it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: LineNumber,
    pub text: String,
    pub retained: bool,
}

impl Line {
    pub fn new(number: LineNumber, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            retained: true,
        }
    }

    /// Same line, excluded from the view
    pub fn excluded(self) -> Self {
        Self {
            retained: false,
            ..self
        }
    }

    /// Same provenance, new text. Retention is unchanged.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self
        }
    }
}

/// Split raw source into retained lines numbered `Exact(1..)`.
///
/// Splits on `\n` and strips a trailing `\r`, so CRLF input keeps its
/// numbering.
pub fn lines_from_source(source: &str) -> Vec<Line> {
    source
        .split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            Line::new(LineNumber::Exact(i as u32 + 1), text)
        })
        .collect()
}

/// Re-split text into retained lines numbered `Approx(1..)`
pub fn approx_lines(text: &str) -> Vec<Line> {
    text.split('\n')
        .enumerate()
        .map(|(i, raw)| Line::new(LineNumber::Approx(i as u32 + 1), raw))
        .collect()
}

/// Only the retained lines
pub fn retained(lines: &[Line]) -> impl Iterator<Item = &Line> {
    lines.iter().filter(|l| l.retained)
}

pub fn retained_count(lines: &[Line]) -> usize {
    retained(lines).count()
}

/// Texts of retained lines joined with `\n`
pub fn joined_text(lines: &[Line]) -> String {
    retained(lines)
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_from_source_numbers_from_one() {
        let lines = lines_from_source("a\r\nb\nc");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, LineNumber::Exact(1));
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[2].number, LineNumber::Exact(3));
        assert!(lines.iter().all(|l| l.retained));
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let lines = lines_from_source("x\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "");
    }

    #[test]
    fn test_line_number_display() {
        assert_eq!(LineNumber::Exact(12).to_string(), "12");
        assert_eq!(LineNumber::Approx(3).to_string(), "~3");
        assert!(LineNumber::Approx(3).is_approx());
        assert_eq!(LineNumber::Approx(3).value(), 3);
    }

    #[test]
    fn test_joined_text_skips_excluded() {
        let lines = vec![
            Line::new(LineNumber::Exact(1), "a"),
            Line::new(LineNumber::Exact(2), "b").excluded(),
            Line::new(LineNumber::Exact(3), "c"),
        ];
        assert_eq!(joined_text(&lines), "a\nc");
        assert_eq!(retained_count(&lines), 2);
    }

    #[test]
    fn test_with_text_keeps_exclusion() {
        let line = Line::new(LineNumber::Exact(4), "x").excluded().with_text("y");
        assert!(!line.retained);
        assert_eq!(line.text, "y");
        assert_eq!(line.number, LineNumber::Exact(4));
    }
}
