//! Unified Result Model
//!
//! Every command maps its output to `ResultItem`s before rendering, so all
//! output formats see the same data.

use serde::{Deserialize, Serialize};

use crate::lang::Language;
use crate::pipeline::orchestrate::ViewMode;
use crate::pipeline::search::{Placeholder, ProjectedLine};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    View,
    Stats,
    Error,
}

/// Byte-based range within a line's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeByte {
    pub start: u64,
    pub end: u64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One rendered line of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLine {
    /// Line number in the source (or in the re-split text when `approx`)
    pub number: u32,

    /// True when the number only approximates the source position
    #[serde(default, skip_serializing_if = "is_false")]
    pub approx: bool,

    pub text: String,

    /// Search matches within `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<RangeByte>,
}

impl ViewLine {
    /// Display form of the number: `12`, or `~12` when approximate
    pub fn label(&self) -> String {
        if self.approx {
            format!("~{}", self.number)
        } else {
            self.number.to_string()
        }
    }

    /// Text with every match passed through `paint`
    pub fn highlighted_with(&self, paint: impl Fn(&str) -> String) -> String {
        let mut out = String::with_capacity(self.text.len() + self.matches.len() * 8);
        let mut cursor = 0usize;
        for m in &self.matches {
            let (start, end) = (m.start as usize, m.end as usize);
            let (Some(before), Some(hit)) = (self.text.get(cursor..start), self.text.get(start..end))
            else {
                continue;
            };
            out.push_str(before);
            out.push_str(&paint(hit));
            cursor = end;
        }
        out.push_str(self.text.get(cursor..).unwrap_or(""));
        out
    }
}

impl From<&ProjectedLine> for ViewLine {
    fn from(line: &ProjectedLine) -> Self {
        Self {
            number: line.number.value(),
            approx: line.number.is_approx(),
            text: line.text.clone(),
            matches: line
                .spans
                .iter()
                .map(|s| RangeByte {
                    start: s.start as u64,
                    end: s.end as u64,
                })
                .collect(),
        }
    }
}

/// Token counts of one file under every view mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStats {
    pub original: usize,
    pub full: usize,
    pub readable: usize,
    pub signatures: usize,
    pub minified: usize,
}

impl TokenStats {
    pub fn get(&self, mode: ViewMode) -> usize {
        match mode {
            ViewMode::Full => self.full,
            ViewMode::Readable => self.readable,
            ViewMode::Signatures => self.signatures,
            ViewMode::Minified => self.minified,
        }
    }

    pub fn set(&mut self, mode: ViewMode, tokens: usize) {
        match mode {
            ViewMode::Full => self.full = tokens,
            ViewMode::Readable => self.readable = tokens,
            ViewMode::Signatures => self.signatures = tokens,
            ViewMode::Minified => self.minified = tokens,
        }
    }

    /// Percentage of original tokens saved by `mode` (0 when empty)
    pub fn savings_percent(&self, mode: ViewMode) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        let kept = self.get(mode) as f64 / self.original as f64;
        ((1.0 - kept) * 100.0).max(0.0)
    }
}

impl std::ops::AddAssign for TokenStats {
    fn add_assign(&mut self, other: Self) {
        self.original += other.original;
        self.full += other.full;
        self.readable += other.readable;
        self.signatures += other.signatures;
        self.minified += other.minified;
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Tokens of the raw source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_tokens: Option<usize>,

    /// Tokens of the transformed view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_tokens: Option<usize>,

    /// Tokens of the lines left after search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shown_tokens: Option<usize>,

    /// Identifiers renamed by the minifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_identifiers: Option<usize>,

    /// Per-mode token counts (stats command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenStats>,

    /// Whether the content was cut at the size limit
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewError {
    pub code: String,
    pub message: String,
}

impl ViewError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Header printed above the item in aggregate text output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ViewMode>,

    /// Lines shown by the view
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<ViewLine>,

    /// Shown instead of lines when nothing is left
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ViewError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            header: None,
            language: None,
            mode: None,
            lines: Vec::new(),
            placeholder: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new view result
    pub fn view(path: Option<String>, language: Language, mode: ViewMode) -> Self {
        Self {
            path,
            language: Some(language),
            mode: Some(mode),
            ..Self::empty(Kind::View)
        }
    }

    /// Create a new stats result
    pub fn stats(path: impl Into<String>, language: Language, tokens: TokenStats) -> Self {
        let mut item = Self {
            path: Some(path.into()),
            language: Some(language),
            ..Self::empty(Kind::Stats)
        };
        item.meta.tokens = Some(tokens);
        item
    }

    /// Create a new error result
    pub fn error(error: ViewError) -> Self {
        Self {
            errors: vec![error],
            ..Self::empty(Kind::Error)
        }
    }

    /// A view item holding only a placeholder
    pub fn placeholder(placeholder: Placeholder, mode: ViewMode) -> Self {
        Self {
            mode: Some(mode),
            placeholder: Some(placeholder),
            ..Self::empty(Kind::View)
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_lines(mut self, lines: Vec<ViewLine>) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<Placeholder>) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Sort items by path for stable output; items without a path go last
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item reports an error
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| !i.errors.is_empty())
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::line::LineNumber;

    #[test]
    fn test_result_item_view() {
        let item = ResultItem::view(Some("src/A.cs".into()), Language::CSharp, ViewMode::Signatures);
        assert_eq!(item.kind, Kind::View);
        assert_eq!(item.path, Some("src/A.cs".to_string()));
        assert_eq!(item.mode, Some(ViewMode::Signatures));
    }

    #[test]
    fn test_result_item_error() {
        let item = ResultItem::error(ViewError::new("READ_ERROR", "permission denied"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "READ_ERROR");
        assert!(item.path.is_none());
    }

    #[test]
    fn test_result_set_sort() {
        let mut set = ResultSet::new();
        set.push(ResultItem::error(ViewError::new("ERR", "error")));
        set.push(ResultItem::view(Some("b.cs".into()), Language::CSharp, ViewMode::Full));
        set.push(ResultItem::view(Some("a.vb".into()), Language::VisualBasic, ViewMode::Full));
        set.sort();
        assert_eq!(set.items[0].path.as_deref(), Some("a.vb"));
        assert_eq!(set.items[1].path.as_deref(), Some("b.cs"));
        assert!(set.items[2].path.is_none());
        assert!(set.has_errors());
    }

    #[test]
    fn test_view_line_from_projected() {
        let projected = ProjectedLine {
            number: LineNumber::Approx(3),
            text: "id0 = 0;".to_string(),
            spans: vec![0..3],
        };
        let line = ViewLine::from(&projected);
        assert_eq!(line.label(), "~3");
        assert_eq!(line.matches, vec![RangeByte { start: 0, end: 3 }]);
    }

    #[test]
    fn test_view_line_highlighted() {
        let line = ViewLine {
            number: 3,
            approx: false,
            text: "var food = foo + FOO;".to_string(),
            matches: vec![
                RangeByte { start: 4, end: 7 },
                RangeByte { start: 11, end: 14 },
                RangeByte { start: 17, end: 20 },
            ],
        };
        assert_eq!(
            line.highlighted_with(|hit| format!("**{}**", hit)),
            "var **foo**d = **foo** + **FOO**;"
        );
    }

    #[test]
    fn test_view_line_serialization_skips_defaults() {
        let line = ViewLine {
            number: 7,
            approx: false,
            text: "x();".to_string(),
            matches: Vec::new(),
        };
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"number":7,"text":"x();"}"#);
    }

    #[test]
    fn test_token_stats_savings() {
        let mut stats = TokenStats {
            original: 200,
            ..Default::default()
        };
        stats.set(ViewMode::Signatures, 50);
        assert_eq!(stats.get(ViewMode::Signatures), 50);
        assert!((stats.savings_percent(ViewMode::Signatures) - 75.0).abs() < f64::EPSILON);
        assert_eq!(TokenStats::default().savings_percent(ViewMode::Full), 0.0);
    }

    #[test]
    fn test_token_stats_add_assign() {
        let mut total = TokenStats::default();
        total += TokenStats {
            original: 10,
            full: 8,
            readable: 8,
            signatures: 3,
            minified: 5,
        };
        total += TokenStats {
            original: 1,
            ..Default::default()
        };
        assert_eq!(total.original, 11);
        assert_eq!(total.signatures, 3);
    }

    #[test]
    fn test_kind_serialization() {
        let item = ResultItem::stats("a.cs", Language::CSharp, TokenStats::default());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"stats\""));
        assert!(json.contains("\"language\":\"csharp\""));
        assert!(json.contains("\"tokens\":{"));
    }

    #[test]
    fn test_placeholder_serialization() {
        let item = ResultItem::placeholder(Placeholder::NoMatches, ViewMode::Full);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"placeholder\":\"no_matches\""));
        assert!(!json.contains("\"lines\""));
    }

    #[test]
    fn test_result_item_deserialization() {
        let json = r#"{"kind":"view","path":"A.cs","language":"csharp","mode":"minified","lines":[{"number":1,"approx":true,"text":"x"}],"meta":{"truncated":false}}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, Kind::View);
        assert_eq!(item.mode, Some(ViewMode::Minified));
        assert_eq!(item.lines[0].label(), "~1");
    }
}
