//! Identifier and literal minification
//!
//! Works on the whole retained text at once, so exact line provenance is
//! lost: output lines are numbered `Approx(1..)`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

use super::line::{approx_lines, joined_text, Line};
use crate::lang::keywords::is_keyword;
use crate::lang::Language;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]+\b").expect("Invalid identifier regex"));

static SYNTHETIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^id\d+$").expect("Invalid synthetic name regex"));

static DOUBLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(?:\\.|[^"\\])*""#).expect("Invalid string literal regex"));

static SINGLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:\\.|[^'\\])*'").expect("Invalid char literal regex"));

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?(?:[eE][+-]?\d+)?\b").expect("Invalid number regex")
});

/// Original identifier to synthetic `id<N>` name, in first-seen order.
///
/// Lives for one [`minify`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    names: HashMap<String, String>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The synthetic name for `ident`, assigning the next one if unseen
    pub fn assign(&mut self, ident: &str) -> &str {
        let next = self.names.len();
        self.names
            .entry(ident.to_string())
            .or_insert_with(|| format!("id{}", next))
            .as_str()
    }

    pub fn get(&self, ident: &str) -> Option<&str> {
        self.names.get(ident).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Minifier output
#[derive(Debug, Clone)]
pub struct Minified {
    pub lines: Vec<Line>,
    pub identifiers: IdentifierMap,
}

/// Shorten identifiers and collapse literals in the retained text
pub fn minify(lines: &[Line], language: Language) -> Minified {
    let text = joined_text(lines);
    let mut identifiers = IdentifierMap::new();

    let renamed = IDENTIFIER.replace_all(&text, |caps: &Captures| {
        let word = &caps[0];
        if should_keep(word, language) {
            word.to_string()
        } else {
            identifiers.assign(word).to_string()
        }
    });
    let simplified = simplify_literals(&renamed);

    let lines: Vec<Line> = approx_lines(&simplified)
        .into_iter()
        .map(|l| if l.text.trim().is_empty() { l.excluded() } else { l })
        .collect();

    tracing::debug!(
        language = %language,
        identifiers = identifiers.len(),
        lines = lines.len(),
        "minified"
    );
    Minified { lines, identifiers }
}

fn should_keep(word: &str, language: Language) -> bool {
    is_keyword(language, word)
        || SYNTHETIC.is_match(word)
        || word.starts_with(|c: char| c.is_ascii_digit())
}

/// Replace string, char and numeric literals with fixed placeholders
pub fn simplify_literals(text: &str) -> String {
    let text = DOUBLE_QUOTED.replace_all(text, "\"s\"");
    let text = SINGLE_QUOTED.replace_all(&text, "'s'");
    NUMBER.replace_all(&text, "0").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::line::{lines_from_source, retained, LineNumber};

    fn minified_text(src: &str, language: Language) -> String {
        let out = minify(&lines_from_source(src), language);
        retained(&out.lines)
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_identifiers_and_literals() {
        let out = minify(
            &lines_from_source("int count = 5; string name = \"bob\";"),
            Language::CSharp,
        );
        assert_eq!(out.lines[0].text, "int id0 = 0; string id1 = \"s\";");
        assert_eq!(out.identifiers.get("count"), Some("id0"));
        assert_eq!(out.identifiers.get("name"), Some("id1"));
        assert_eq!(out.identifiers.get("int"), None);
    }

    #[test]
    fn test_same_identifier_same_name() {
        let text = minified_text("total = total + step;\nstep = total;", Language::CSharp);
        assert_eq!(text, "id0 = id0 + id1;\nid1 = id0;");
    }

    #[test]
    fn test_single_char_identifiers_untouched() {
        assert_eq!(minified_text("x = y + 1.5e3;", Language::CSharp), "x = y + 0;");
    }

    #[test]
    fn test_synthetic_names_are_not_renamed() {
        assert_eq!(minified_text("id7 = other;", Language::CSharp), "id7 = id0;");
    }

    #[test]
    fn test_escaped_quotes_stay_inside_literal() {
        assert_eq!(
            simplify_literals(r#"s = "say \"hi\""; c = '\'';"#),
            r#"s = "s"; c = 's';"#
        );
    }

    #[test]
    fn test_vb_keywords_case_insensitive() {
        let text = minified_text("Dim Counter As Integer = 10", Language::VisualBasic);
        assert_eq!(text, "Dim id0 As Integer = 0");
    }

    #[test]
    fn test_output_numbers_are_approximate() {
        let out = minify(&lines_from_source("a1 = 1;\nb2 = 2;"), Language::CSharp);
        assert!(out.lines.iter().all(|l| l.number.is_approx()));
        assert_eq!(out.lines[1].number, LineNumber::Approx(2));
    }

    #[test]
    fn test_minify_is_deterministic() {
        let lines = lines_from_source("public int Add(int left, int right) { return left + right; }");
        let first = minify(&lines, Language::CSharp);
        let second = minify(&lines, Language::CSharp);
        assert_eq!(first.lines, second.lines);
        assert_eq!(first.identifiers, second.identifiers);
    }

    #[test]
    fn test_excluded_lines_are_dropped_before_joining() {
        let lines = vec![
            Line::new(LineNumber::Exact(1), "alpha = 1;"),
            Line::new(LineNumber::Exact(2), "beta = 2;").excluded(),
        ];
        let out = minify(&lines, Language::CSharp);
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.identifiers.get("beta"), None);
    }

    #[test]
    fn test_empty_input_has_no_retained_lines() {
        let out = minify(&[], Language::CSharp);
        assert_eq!(retained(&out.lines).count(), 0);
    }
}
