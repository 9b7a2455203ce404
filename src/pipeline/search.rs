//! Search and highlight projection over a finished view
//!
//! A non-empty query keeps only lines containing it (case-insensitive,
//! matched literally) and records every occurrence so renderers can
//! highlight it. Counting always uses the unhighlighted text.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::line::{Line, LineNumber};

/// Shown instead of an empty listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// A non-empty query matched nothing
    NoMatches,
    /// The view itself is empty
    NoContent,
}

impl Placeholder {
    pub fn message(&self) -> &'static str {
        match self {
            Placeholder::NoMatches => "No lines match your code search.",
            Placeholder::NoContent => "No content after processing.",
        }
    }
}

/// A retained line plus the byte ranges of its query matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedLine {
    pub number: LineNumber,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<Range<usize>>,
}

/// What a view shows after search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Lines(Vec<ProjectedLine>),
    Placeholder(Placeholder),
}

impl Projection {
    pub fn lines(&self) -> &[ProjectedLine] {
        match self {
            Projection::Lines(lines) => lines,
            Projection::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            Projection::Lines(_) => None,
            Projection::Placeholder(p) => Some(*p),
        }
    }

    /// Unhighlighted text of the shown lines, joined with `\n`
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Project retained lines through an optional query
pub fn project(lines: &[Line], query: Option<&str>) -> Projection {
    let retained = lines.iter().filter(|l| l.retained);

    let Some(query) = query.filter(|q| !q.is_empty()) else {
        let shown: Vec<ProjectedLine> = retained
            .map(|l| ProjectedLine {
                number: l.number,
                text: l.text.clone(),
                spans: Vec::new(),
            })
            .collect();
        return if shown.is_empty() {
            Projection::Placeholder(Placeholder::NoContent)
        } else {
            Projection::Lines(shown)
        };
    };

    let matcher = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!(error = %e, "search query could not be compiled");
            return Projection::Placeholder(Placeholder::NoMatches);
        }
    };

    let shown: Vec<ProjectedLine> = retained
        .filter_map(|l| {
            let spans: Vec<Range<usize>> = matcher.find_iter(&l.text).map(|m| m.range()).collect();
            (!spans.is_empty()).then(|| ProjectedLine {
                number: l.number,
                text: l.text.clone(),
                spans,
            })
        })
        .collect();

    tracing::debug!(query, matches = shown.len(), "projected search");

    if shown.is_empty() {
        Projection::Placeholder(Placeholder::NoMatches)
    } else {
        Projection::Lines(shown)
    }
}
