//! Pipeline orchestration: pick and sequence stages for a view mode
//!
//! `build_view` runs one file; `build_aggregate` runs many (each with its own
//! numbering and language) and sums their statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::line::{joined_text, lines_from_source, Line};
use super::minify::minify;
use super::normalize::{normalize, NormalizeMode};
use super::scope::filter_scopes;
use super::search::{project, Placeholder, Projection};
use super::signatures::extract_signatures;
use crate::core::error::ConfigError;
use crate::core::tokenizer::TokenCounter;
use crate::lang::{CategorySet, Language};

/// Which transformation a view applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Full,
    Readable,
    Signatures,
    Minified,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Full,
        ViewMode::Readable,
        ViewMode::Signatures,
        ViewMode::Minified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Full => "full",
            ViewMode::Readable => "readable",
            ViewMode::Signatures => "signatures",
            ViewMode::Minified => "minified",
        }
    }

    pub fn available() -> &'static [&'static str] {
        &["full", "readable", "signatures", "minified"]
    }

    /// Whether element-category filtering applies in this mode
    pub fn honors_categories(&self) -> bool {
        matches!(self, ViewMode::Full | ViewMode::Readable)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ViewMode::Full),
            "readable" | "clean" => Ok(ViewMode::Readable),
            "signatures" | "signature" | "sig" | "sigs" => Ok(ViewMode::Signatures),
            "minified" | "minify" | "min" => Ok(ViewMode::Minified),
            _ => Err(ConfigError::mode(s, ViewMode::available())),
        }
    }
}

/// Everything that shapes a view except the search query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub mode: ViewMode,
    pub include_comments: bool,
    pub categories: CategorySet,
}

impl ViewConfig {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    pub fn with_categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    /// True when an element-scope filter will run
    pub fn filters_elements(&self) -> bool {
        self.mode.honors_categories() && self.categories.is_restrictive()
    }
}

/// One file's transformed view
#[derive(Debug, Clone)]
pub struct FileView {
    pub language: Language,
    pub mode: ViewMode,
    /// Full same-length sequence (excluded lines included) for non-minified
    /// modes; the re-split text for minified.
    pub lines: Vec<Line>,
    pub original_tokens: usize,
    pub processed_tokens: usize,
    /// Identifiers renamed by the minifier (0 in other modes)
    pub renamed_identifiers: usize,
}

impl FileView {
    /// Apply a search query to the view
    pub fn project(&self, query: Option<&str>) -> Projection {
        project(&self.lines, query)
    }

    pub fn retained(&self) -> impl Iterator<Item = &Line> {
        super::line::retained(&self.lines)
    }

    pub fn text(&self) -> String {
        joined_text(&self.lines)
    }
}

/// Build a single file's view.
///
/// Never fails: unknown languages degrade to whitespace normalization and an
/// empty result is simply a view with no retained lines.
pub fn build_view(
    source: &str,
    language: Language,
    config: &ViewConfig,
    counter: &dyn TokenCounter,
) -> FileView {
    let lines = lines_from_source(source);
    let mut renamed_identifiers = 0;

    let lines = match config.mode {
        ViewMode::Full | ViewMode::Readable => {
            let mode = if config.include_comments {
                NormalizeMode::WhitespaceOnly
            } else {
                NormalizeMode::StripComments
            };
            let lines = normalize(lines, language, mode);
            if config.filters_elements() {
                filter_scopes(lines, language, &config.categories)
            } else {
                lines
            }
        }
        ViewMode::Signatures => {
            let lines = normalize(lines, language, NormalizeMode::StripComments);
            extract_signatures(lines, language)
        }
        ViewMode::Minified => {
            let lines = normalize(lines, language, NormalizeMode::StripComments);
            let minified = minify(&lines, language);
            renamed_identifiers = minified.identifiers.len();
            minified.lines
        }
    };

    let processed_tokens = counter.count(&joined_text(&lines));
    FileView {
        language,
        mode: config.mode,
        lines,
        original_tokens: counter.count(source),
        processed_tokens,
        renamed_identifiers,
    }
}

/// One file handed to [`build_aggregate`]
#[derive(Debug, Clone, Copy)]
pub struct FileInput<'a> {
    /// Display name, usually the path relative to the aggregate root
    pub name: &'a str,
    pub language: Language,
    pub source: &'a str,
}

/// One file's slice of an aggregate
#[derive(Debug, Clone)]
pub struct AggregateSection {
    pub name: String,
    pub view: FileView,
    pub projection: Projection,
    /// Tokens of the lines actually shown after search
    pub shown_tokens: usize,
}

impl AggregateSection {
    pub fn header(&self) -> String {
        file_header(&self.name)
    }
}

/// Many files rendered as one view
#[derive(Debug, Clone, Default)]
pub struct AggregateView {
    pub sections: Vec<AggregateSection>,
    pub original_tokens: usize,
    pub processed_tokens: usize,
    pub shown_tokens: usize,
    /// Set when nothing is left to show
    pub placeholder: Option<Placeholder>,
}

/// Header line placed before each file of an aggregate
pub fn file_header(name: &str) -> String {
    format!("// --- File: {} ---", name)
}

/// Tokens of a projection's visible text
pub fn shown_tokens(projection: &Projection, counter: &dyn TokenCounter) -> usize {
    counter.count(&projection.plain_text())
}

fn build_section(
    file: &FileInput<'_>,
    config: &ViewConfig,
    query: Option<&str>,
    counter: &dyn TokenCounter,
) -> AggregateSection {
    let view = build_view(file.source, file.language, config, counter);
    let projection = view.project(query);
    let shown_tokens = shown_tokens(&projection, counter);
    AggregateSection {
        name: file.name.to_string(),
        view,
        projection,
        shown_tokens,
    }
}

/// Build every file's view and combine them, ordered by name.
///
/// With a query, files without a match are left out; if none match, the
/// aggregate carries a single `NoMatches` placeholder.
pub fn build_aggregate(
    files: &[FileInput<'_>],
    config: &ViewConfig,
    query: Option<&str>,
    counter: &dyn TokenCounter,
) -> AggregateView {
    let mut ordered: Vec<&FileInput<'_>> = files.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(b.name));

    #[cfg(feature = "parallel")]
    let sections: Vec<AggregateSection> = ordered
        .par_iter()
        .map(|file| build_section(file, config, query, counter))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let sections: Vec<AggregateSection> = ordered
        .iter()
        .map(|file| build_section(file, config, query, counter))
        .collect();

    let searching = query.is_some_and(|q| !q.is_empty());

    let mut aggregate = AggregateView::default();
    for section in sections {
        aggregate.original_tokens += section.view.original_tokens;
        aggregate.processed_tokens += section.view.processed_tokens;
        if searching && section.projection.placeholder().is_some() {
            continue;
        }
        aggregate.shown_tokens += section.shown_tokens;
        aggregate.sections.push(section);
    }

    if aggregate.sections.is_empty() {
        aggregate.placeholder = Some(if searching {
            Placeholder::NoMatches
        } else {
            Placeholder::NoContent
        });
    }

    tracing::debug!(
        files = files.len(),
        shown = aggregate.sections.len(),
        processed_tokens = aggregate.processed_tokens,
        "built aggregate"
    );
    aggregate
}
