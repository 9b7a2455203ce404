//! Static per-language pattern tables
//!
//! Each recognized language owns one ordered table of `(Category, Regex)`
//! entries. Order matters: the first matching entry classifies a line. The
//! same table drives signature extraction and element-scope filtering.
//!
//! Patterns run against whitespace-normalized lines (single spaces, trimmed).

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Category, CategorySet, Language};

// Shared fragments (C#)
const CS_ATTRS: &str = r"(?:\[.*?\]\s*)*";
const CS_MODS: &str = r"(?:(?:public|private|protected|internal|static|abstract|sealed|partial|virtual|override|async|extern|unsafe|new|readonly|required|volatile|const|file|ref)\s+)*";
const CS_TYPE: &str = r"[\w\.\?]+(?:<[^()]*?>)?(?:\[[,\s]*\])*\??";

// Shared fragments (VB.NET), case-insensitive via the (?i) prefix
const VB_ATTRS: &str = r"(?:<[^>]+>\s*)*";
const VB_MODS: &str = r"(?:(?:Public|Private|Protected|Friend|Shared|Shadows|Overloads|Overrides|Overridable|NotOverridable|MustOverride|MustInherit|NotInheritable|Partial|ReadOnly|WriteOnly|Default|Async|Iterator|Static|Widening|Narrowing|Custom)\s+)*";

/// Leading words that mark a C# statement, never a declaration
const CS_STATEMENT_LEADS: &[&str] = &[
    "return", "throw", "await", "else", "yield", "case", "goto", "if", "while", "for",
    "foreach", "switch", "lock", "catch", "when", "in", "is", "as", "typeof", "nameof",
    "sizeof", "default", "do", "try", "finally", "checked", "unchecked", "fixed", "using",
    "var",
];

/// Leading words that mark a VB statement, never a declaration
const VB_STATEMENT_LEADS: &[&str] = &[
    "end", "exit", "return", "call", "if", "elseif", "else", "for", "next", "while",
    "do", "loop", "select", "case", "try", "catch", "finally", "throw", "with", "using",
    "raiseevent", "addhandler", "removehandler", "imports", "option",
];

/// An ordered `(category, regex)` table for one language
pub struct PatternTable {
    entries: Vec<(Category, Regex)>,
    statement_leads: &'static [&'static str],
}

impl PatternTable {
    fn build(specs: &[(Category, String)], statement_leads: &'static [&'static str]) -> Self {
        let entries = specs
            .iter()
            .map(|(category, pattern)| {
                let regex = Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("invalid {} pattern {:?}: {}", category, pattern, e));
                (*category, regex)
            })
            .collect();

        Self {
            entries,
            statement_leads,
        }
    }

    /// Classify a line: the category of the first matching entry, if any
    pub fn classify(&self, line: &str) -> Option<Category> {
        let line = line.trim();
        if line.is_empty() || self.starts_with_statement(line) {
            return None;
        }

        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(category, _)| *category)
    }

    /// The line's category, if it is one of `selected`.
    ///
    /// Classification runs over the whole table, so `public class A` is a
    /// type even when only properties are selected.
    pub fn match_selected(&self, line: &str, selected: &CategorySet) -> Option<Category> {
        self.classify(line).filter(|c| selected.contains(*c))
    }

    fn starts_with_statement(&self, line: &str) -> bool {
        let lead = line
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()
            .unwrap_or("")
            .to_lowercase();
        self.statement_leads.contains(&lead.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static CSHARP_TABLE: Lazy<PatternTable> = Lazy::new(|| {
    let (a, m, t) = (CS_ATTRS, CS_MODS, CS_TYPE);
    PatternTable::build(
        &[
            (Category::Namespace, r"^namespace\s+[\w\.]+".to_string()),
            (
                Category::Type,
                format!(r"^{a}{m}(?:class|interface|enum|struct|record(?:\s+(?:class|struct))?)\s+\w+"),
            ),
            (
                Category::Delegate,
                format!(r"^{a}{m}delegate\s+{t}\s+\w+\s*(?:<[^>]*>)?\s*\("),
            ),
            (Category::Event, format!(r"^{a}{m}event\s+{t}\s+\w+")),
            (
                Category::Property,
                format!(r"^{a}{m}{t}\s+[\w\.]+\s*(?:\{{|=>)"),
            ),
            (
                Category::Method,
                format!(r"^{a}{m}{t}\s+[\w\.]+\s*(?:<[^()]*>)?\s*\("),
            ),
            (
                Category::Field,
                format!(r"^{a}(?:public|private|protected|internal|static|readonly|const|volatile)\s+{m}{t}\s+\w+\s*(?:=.*)?;$"),
            ),
            // Property whose accessor block starts on the next line
            (
                Category::Property,
                format!(r"^{a}(?:public|private|protected|internal)\s+{m}{t}\s+[\w\.]+$"),
            ),
        ],
        CS_STATEMENT_LEADS,
    )
});

static VB_TABLE: Lazy<PatternTable> = Lazy::new(|| {
    let (a, m) = (VB_ATTRS, VB_MODS);
    PatternTable::build(
        &[
            (Category::Namespace, r"(?i)^Namespace\s+[\w\.]+".to_string()),
            (
                Category::Type,
                format!(r"(?i)^{a}{m}(?:Class|Interface|Module|Enum|Structure)\s+\w+"),
            ),
            (
                Category::Delegate,
                format!(r"(?i)^{a}{m}Delegate\s+(?:Sub|Function)\s+\w+"),
            ),
            (Category::Event, format!(r"(?i)^{a}{m}Event\s+\w+")),
            (
                Category::Field,
                format!(r"(?i)^{a}{m}(?:Dim\s+)?WithEvents\s+\w+"),
            ),
            // Event handlers wired with Handles
            (Category::Method, r"(?i)\sHandles\s+\w+\.\w+".to_string()),
            (
                Category::Method,
                format!(r"(?i)^{a}{m}(?:Sub|Function|Operator)\s+\w+"),
            ),
            (
                Category::Method,
                format!(r"(?i)^{a}{m}Declare\s+(?:(?:Auto|Ansi|Unicode)\s+)?(?:Sub|Function)\s+\w+"),
            ),
            (Category::Property, format!(r"(?i)^{a}{m}Property\s+\w+")),
            (
                Category::Field,
                format!(r"(?i)^{a}(?:Public|Private|Protected|Friend)\s+(?:(?:Shared|ReadOnly|Const|Shadows)\s+)*\w+(?:\(\))?\s+As\b"),
            ),
        ],
        VB_STATEMENT_LEADS,
    )
});

/// The pattern table for a language, if it has one
pub fn table_for(language: Language) -> Option<&'static PatternTable> {
    match language {
        Language::CSharp => Some(&CSHARP_TABLE),
        Language::VisualBasic => Some(&VB_TABLE),
        Language::Unrecognized => None,
    }
}
