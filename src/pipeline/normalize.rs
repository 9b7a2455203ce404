//! Comment and whitespace normalization
//!
//! Produces a same-length sequence. Retained lines get their comments removed
//! (when asked) and whitespace collapsed; a line left empty is excluded.

use once_cell::sync::Lazy;
use regex::Regex;

use super::line::Line;
use crate::lang::{BlockStyle, Language};

static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("Invalid whitespace regex"));

/// Line comments carrying one of these markers survive stripping
const PRESERVE_MARKERS: &[&str] = &["preserve", "keep", "#"];

/// What the normalizer removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    StripComments,
    WhitespaceOnly,
}

/// Carried between lines for brace-family block comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Code,
    InBlockComment,
}

/// Normalize a line sequence.
///
/// Unrecognized languages only get whitespace collapse.
pub fn normalize(lines: Vec<Line>, language: Language, mode: NormalizeMode) -> Vec<Line> {
    let style = match mode {
        NormalizeMode::WhitespaceOnly => BlockStyle::None,
        NormalizeMode::StripComments => language.block_style(),
    };

    let out: Vec<Line> = lines
        .into_iter()
        .scan(CommentState::Code, |state, line| {
            if !line.retained {
                return Some(line);
            }
            let stripped = match style {
                BlockStyle::Braces => {
                    let (text, next) = strip_brace_comments(&line.text, *state);
                    *state = next;
                    text
                }
                BlockStyle::Keywords => strip_keyword_comment(&line.text).to_string(),
                BlockStyle::None => line.text.clone(),
            };
            Some(finish(line, &stripped))
        })
        .collect();

    tracing::debug!(
        language = %language,
        ?mode,
        retained = super::line::retained_count(&out),
        "normalized"
    );
    out
}

/// Collapse runs of spaces/tabs to one space and trim
pub fn collapse_whitespace(text: &str) -> String {
    HORIZONTAL_WS.replace_all(text, " ").trim().to_string()
}

fn finish(line: Line, stripped: &str) -> Line {
    let text = collapse_whitespace(stripped);
    if text.is_empty() {
        line.with_text(text).excluded()
    } else {
        line.with_text(text)
    }
}

/// Remove `/* */` spans and `//` comments from one line.
fn strip_brace_comments(text: &str, state: CommentState) -> (String, CommentState) {
    let mut rest = text;

    if state == CommentState::InBlockComment {
        match rest.find("*/") {
            Some(end) => rest = &rest[end + 2..],
            None => return (String::new(), CommentState::InBlockComment),
        }
    }

    let mut out = String::with_capacity(rest.len());
    loop {
        let block = rest.find("/*");
        let line_comment = rest.find("//");

        match (block, line_comment) {
            (Some(open), lc) if lc.map_or(true, |lc| open < lc) => {
                out.push_str(&rest[..open]);
                let inside = &rest[open + 2..];
                match inside.find("*/") {
                    Some(close) => rest = &inside[close + 2..],
                    None => return (out, CommentState::InBlockComment),
                }
            }
            _ => {
                out.push_str(strip_line_comment(rest));
                return (out, CommentState::Code);
            }
        }
    }
}

/// Cut at the first `//` whose remainder carries no preservation marker
fn strip_line_comment(text: &str) -> &str {
    for (idx, _) in text.match_indices("//") {
        let remainder = &text[idx + 2..];
        if !PRESERVE_MARKERS.iter().any(|m| remainder.contains(m)) {
            return &text[..idx];
        }
    }
    text
}

/// Remove a VB comment: the first `'` outside a string literal, or a
/// leading `REM` statement.
fn strip_keyword_comment(text: &str) -> &str {
    let trimmed = text.trim_start();
    if let Some(head) = trimmed.get(..3) {
        let after = &trimmed[3..];
        if head.eq_ignore_ascii_case("rem") && (after.is_empty() || after.starts_with([' ', '\t'])) {
            return "";
        }
    }

    let mut in_string = false;
    for (idx, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '\'' if !in_string => return &text[..idx],
            _ => {}
        }
    }
    text
}
