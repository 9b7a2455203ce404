//! Element-scope filtering: keep whole blocks of selected categories
//!
//! A declaration line matching a selected category is retained together with
//! its body. Brace-family languages find the body's extent by counting brace
//! depth; keyword-family languages by waiting for the construct's `End`
//! statement.
//!
//! Braces inside string or char literals are counted like any other brace.
//! A literal `"{"` on a declaration line can therefore keep a block open
//! longer than the source intends.

use once_cell::sync::Lazy;
use regex::Regex;

use super::line::Line;
use crate::lang::patterns::{table_for, PatternTable};
use crate::lang::{BlockStyle, Category, CategorySet, Language};

static VB_ACCESSOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:<[^>]+>\s*)*(?:(?:Public|Private|Protected|Friend)\s+)*(?:Get|Set)\b")
        .expect("Invalid accessor regex")
});

static VB_ATTRIBUTE_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<[^>]+>\s*)+$").expect("Invalid attribute regex"));

static VB_INTERFACE_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:<[^>]+>\s*)*(?:(?:Public|Private|Protected|Friend|Shadows|Partial)\s+)*Interface\s+\w+")
        .expect("Invalid interface regex")
});

const VB_TYPE_KEYWORDS: &[&str] = &["CLASS", "MODULE", "INTERFACE", "STRUCTURE", "ENUM"];
const VB_METHOD_KEYWORDS: &[&str] = &["SUB", "FUNCTION", "OPERATOR"];

/// Retain only blocks whose declaration matches `selected`.
///
/// Unrecognized languages pass through unchanged.
pub fn filter_scopes(lines: Vec<Line>, language: Language, selected: &CategorySet) -> Vec<Line> {
    let Some(table) = table_for(language) else {
        return lines;
    };

    let out = match language.block_style() {
        BlockStyle::Braces => filter_braces(lines, table, selected),
        BlockStyle::Keywords => filter_keywords(lines, table, selected),
        BlockStyle::None => lines,
    };

    tracing::debug!(
        language = %language,
        categories = selected.len(),
        retained = super::line::retained_count(&out),
        "filtered scopes"
    );
    out
}

// ---------------------------------------------------------------------------
// Brace family
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceState {
    Scanning,
    InBlock { depth: i32 },
}

fn brace_balance(text: &str) -> i32 {
    text.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

fn filter_braces(lines: Vec<Line>, table: &PatternTable, selected: &CategorySet) -> Vec<Line> {
    let mut state = BraceState::Scanning;

    lines
        .into_iter()
        .map(|line| {
            if !line.retained {
                return line;
            }
            let blank = line.text.trim().is_empty();

            match state {
                BraceState::InBlock { depth } => {
                    let depth = depth + brace_balance(&line.text);
                    state = if depth <= 0 {
                        BraceState::Scanning
                    } else {
                        BraceState::InBlock { depth }
                    };
                    line
                }
                BraceState::Scanning if blank => line.excluded(),
                BraceState::Scanning => {
                    if table.match_selected(&line.text, selected).is_none() {
                        return line.excluded();
                    }
                    let text = line.text.trim();
                    let depth = brace_balance(text);
                    let single_line = depth <= 0
                        && ((text.contains('{') && text.contains('}')) || text.ends_with(';'));
                    if !single_line {
                        state = BraceState::InBlock { depth };
                    }
                    line
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Keyword family
// ---------------------------------------------------------------------------

/// The `End <keyword>` statement that closes a VB block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Terminator(&'static str);

impl Terminator {
    /// Test against a trimmed, upper-cased line
    fn closes(&self, upper: &str) -> bool {
        let mut words = upper.split_whitespace();
        words.next() == Some("END") && words.next().map(strip_punct) == Some(self.0)
    }

    /// `Sub Foo() : End Sub` style one-liners
    fn closes_inline(&self, upper: &str) -> bool {
        let mut words = upper.split_whitespace().rev();
        let last = words.next().map(strip_punct);
        let before = words.next();
        last == Some(self.0) && before == Some("END")
    }
}

fn strip_punct(word: &str) -> &str {
    word.trim_end_matches(|c: char| !c.is_alphanumeric())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordState {
    Scanning,
    InBlock { terminator: Terminator },
    /// Property declared; its `Get`/`Set` body is not confirmed yet
    AwaitingBody { terminator: Terminator },
}

/// What a retained VB declaration opens
enum Opens {
    SingleLine,
    Block(Terminator),
    MaybeBlock(Terminator),
}

fn first_word_in(words: &[&str], candidates: &[&'static str]) -> Option<&'static str> {
    words
        .iter()
        .find_map(|w| candidates.iter().find(|c| strip_punct(w) == **c).copied())
}

fn vb_opens(category: Category, upper: &str, in_interface: bool) -> Opens {
    let words: Vec<&str> = upper.split_whitespace().collect();
    let has = |kw: &str| words.iter().any(|w| strip_punct(w) == kw);

    let opens = match category {
        Category::Namespace => Opens::Block(Terminator("NAMESPACE")),
        Category::Type => match first_word_in(&words, VB_TYPE_KEYWORDS) {
            Some(kw) => Opens::Block(Terminator(kw)),
            None => Opens::SingleLine,
        },
        Category::Method if in_interface || has("MUSTOVERRIDE") || has("DECLARE") => {
            Opens::SingleLine
        }
        Category::Method => match first_word_in(&words, VB_METHOD_KEYWORDS) {
            Some(kw) => Opens::Block(Terminator(kw)),
            None => Opens::SingleLine,
        },
        Category::Event if has("CUSTOM") && !in_interface => Opens::Block(Terminator("EVENT")),
        Category::Property if in_interface || has("MUSTOVERRIDE") => Opens::SingleLine,
        Category::Property => Opens::MaybeBlock(Terminator("PROPERTY")),
        Category::Event | Category::Delegate | Category::Field => Opens::SingleLine,
    };

    match opens {
        Opens::Block(t) | Opens::MaybeBlock(t) if t.closes_inline(upper) => Opens::SingleLine,
        other => other,
    }
}

fn filter_keywords(lines: Vec<Line>, table: &PatternTable, selected: &CategorySet) -> Vec<Line> {
    let mut state = KeywordState::Scanning;
    let mut in_interface = false;
    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    // Attribute-only lines seen while a property body is unconfirmed
    let mut held: Vec<usize> = Vec::new();

    for line in lines {
        if !line.retained {
            out.push(line);
            continue;
        }
        let trimmed = line.text.trim();
        let blank = trimmed.is_empty();
        let upper = trimmed.to_uppercase();

        if let KeywordState::AwaitingBody { terminator } = state {
            if blank {
                out.push(line.excluded());
                continue;
            }
            if VB_ACCESSOR.is_match(trimmed) {
                held.clear();
                state = KeywordState::InBlock { terminator };
                out.push(line);
                continue;
            }
            if VB_ATTRIBUTE_ONLY.is_match(trimmed) {
                held.push(out.len());
                out.push(line);
                continue;
            }
            // Auto-property: held attributes belong to the next member,
            // and attribute-only lines match no declaration
            release_held(&mut out, &mut held);
            state = KeywordState::Scanning;
        }

        match state {
            KeywordState::InBlock { terminator } => {
                if terminator.closes(&upper) {
                    state = KeywordState::Scanning;
                }
                out.push(line);
            }
            KeywordState::Scanning if blank => out.push(line.excluded()),
            _ => {
                let matched = table.match_selected(trimmed, selected);

                // Track interface context for members we scan through
                if VB_INTERFACE_OPEN.is_match(trimmed) {
                    in_interface = true;
                } else if Terminator("INTERFACE").closes(&upper) {
                    in_interface = false;
                }

                let Some(category) = matched else {
                    out.push(line.excluded());
                    continue;
                };
                state = match vb_opens(category, &upper, in_interface) {
                    Opens::SingleLine => KeywordState::Scanning,
                    Opens::Block(terminator) => {
                        if category == Category::Type && terminator.0 == "INTERFACE" {
                            in_interface = false;
                        }
                        KeywordState::InBlock { terminator }
                    }
                    Opens::MaybeBlock(terminator) => KeywordState::AwaitingBody { terminator },
                };
                out.push(line);
            }
        }
    }

    release_held(&mut out, &mut held);
    out
}

fn release_held(out: &mut [Line], held: &mut Vec<usize>) {
    for i in held.drain(..) {
        out[i].retained = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::line::{lines_from_source, retained, LineNumber};
    use crate::pipeline::normalize::{normalize, NormalizeMode};

    fn only(categories: &[Category]) -> CategorySet {
        categories.iter().copied().collect()
    }

    fn filtered(src: &str, language: Language, categories: &[Category]) -> Vec<Line> {
        let lines = normalize(lines_from_source(src), language, NormalizeMode::StripComments);
        filter_scopes(lines, language, &only(categories))
    }

    fn kept_numbers(lines: &[Line]) -> Vec<u32> {
        retained(lines).map(|l| l.number.value()).collect()
    }

    const CSHARP: &str = "\
using System;
namespace Demo
{
    public class Counter
    {
        private int _value;
        public int Value { get; private set; }
        public void Increment()
        {
            if (_value > 10) { _value = 0; }
            _value++;
        }
        public int Twice() { return _value * 2; }
        public abstract void Reset();
        public event EventHandler Changed;
    }
}
";

    #[test]
    fn test_csharp_methods_keep_whole_bodies() {
        let out = filtered(CSHARP, Language::CSharp, &[Category::Method]);
        assert_eq!(kept_numbers(&out), vec![8, 9, 10, 11, 12, 13, 14]);
        assert_eq!(out.len(), CSHARP.split('\n').count());
    }

    #[test]
    fn test_csharp_semicolon_declaration_does_not_open_block() {
        let out = filtered(CSHARP, Language::CSharp, &[Category::Field, Category::Event]);
        assert_eq!(kept_numbers(&out), vec![6, 15]);
    }

    #[test]
    fn test_csharp_property_single_line() {
        let out = filtered(CSHARP, Language::CSharp, &[Category::Property]);
        assert_eq!(kept_numbers(&out), vec![7]);
    }

    #[test]
    fn test_csharp_type_block_closes_at_end() {
        let out = filtered(CSHARP, Language::CSharp, &[Category::Type]);
        assert_eq!(kept_numbers(&out), (4..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_csharp_namespace_keeps_everything_inside() {
        let out = filtered(CSHARP, Language::CSharp, &[Category::Namespace]);
        assert_eq!(kept_numbers(&out), (2..=17).collect::<Vec<_>>());
    }

    #[test]
    fn test_unterminated_block_ends_at_end_of_input() {
        let src = "public void Broken()\n{\n    DoWork();\n";
        let out = filtered(src, Language::CSharp, &[Category::Method]);
        assert_eq!(kept_numbers(&out), vec![1, 2, 3]);
    }

    const VB: &str = "\
Public Class Form1
    Private WithEvents timer As Timer
    Public Property Title As String
    Public Property Count As Integer
        Get
            Return _count
        End Get
        Set(value As Integer)
            _count = value
        End Set
    End Property
    Public Sub Foo()
        Bar()
    End Sub
    Public MustOverride Function Compute() As Integer
    Private Function Bar() As Integer
        Return 1
    End Function
End Class
";

    #[test]
    fn test_vb_sub_block() {
        let out = filtered(VB, Language::VisualBasic, &[Category::Method]);
        assert_eq!(kept_numbers(&out), vec![12, 13, 14, 15, 16, 17, 18]);
    }

    #[test]
    fn test_vb_auto_property_is_single_line() {
        let out = filtered(VB, Language::VisualBasic, &[Category::Property]);
        assert_eq!(kept_numbers(&out), vec![3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_vb_auto_property_followed_by_method() {
        let src = "Public Property Title As String\nPublic Sub Foo()\nBar()\nEnd Sub\nDim x = 1";
        let out = filtered(src, Language::VisualBasic, &[Category::Property, Category::Method]);
        assert_eq!(kept_numbers(&out), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_vb_attributed_member_after_auto_property() {
        let src = "\
Public Class C
    Public Property Title As String
    <Obsolete()> Public Sub Foo()
        Bar()
    End Sub
    Private x As Integer
    Public Sub Baz()
        Qux()
    End Sub
End Class";
        let out = filtered(src, Language::VisualBasic, &[Category::Property]);
        assert_eq!(kept_numbers(&out), vec![2]);
    }

    #[test]
    fn test_vb_attribute_line_after_auto_property() {
        let src = "\
Public Property Title As String
<Browsable(False)>
Public Property Hidden As Integer
Public Sub Baz()
    Qux()
End Sub";
        let out = filtered(src, Language::VisualBasic, &[Category::Property]);
        assert_eq!(kept_numbers(&out), vec![1, 3]);
    }

    #[test]
    fn test_vb_attributed_accessor_confirms_body() {
        let src = "\
Public Property Count As Integer
    <DebuggerStepThrough()>
    Get
        Return 1
    End Get
End Property
Public Sub Baz()
End Sub";
        let out = filtered(src, Language::VisualBasic, &[Category::Property]);
        assert_eq!(kept_numbers(&out), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_vb_class_block() {
        let out = filtered(VB, Language::VisualBasic, &[Category::Type]);
        assert_eq!(kept_numbers(&out), (1..=19).collect::<Vec<_>>());
    }

    #[test]
    fn test_vb_interface_members_are_single_line() {
        let src = "Public Interface IShape\n    Function Area() As Double\n    Property Name As String\nEnd Interface\nPublic Sub Draw()\n    Paint()\nEnd Sub";
        let out = filtered(src, Language::VisualBasic, &[Category::Method]);
        assert_eq!(kept_numbers(&out), vec![2, 5, 6, 7]);
    }

    #[test]
    fn test_vb_inline_terminator_stays_scanning() {
        let src = "Public Sub Noop() : End Sub\nDim x = 1\nPublic Sub Other()\nEnd Sub";
        let out = filtered(src, Language::VisualBasic, &[Category::Method]);
        assert_eq!(kept_numbers(&out), vec![1, 3, 4]);
    }

    #[test]
    fn test_excluded_lines_stay_excluded() {
        let mut lines = lines_from_source("public void A()\n{\n    x();\n}");
        lines[2] = lines[2].clone().excluded();
        let out = filter_scopes(lines, Language::CSharp, &only(&[Category::Method]));
        assert_eq!(kept_numbers(&out), vec![1, 2, 4]);
        assert_eq!(out[2].number, LineNumber::Exact(3));
    }

    #[test]
    fn test_unrecognized_retains_everything() {
        let lines = lines_from_source("a\nb");
        let out = filter_scopes(lines.clone(), Language::Unrecognized, &only(&[Category::Type]));
        assert_eq!(out, lines);
    }
}
