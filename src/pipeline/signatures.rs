//! Signature extraction: keep declaration lines only
//!
//! Each retained line is classified against the language's pattern table.
//! Unclassified lines are excluded. Brace-family declarations that open a
//! body on the same line are shortened to `prefix { ... }` or
//! `prefix => ...;` so the view stays one line per declaration.

use once_cell::sync::Lazy;
use regex::Regex;

use super::line::Line;
use crate::lang::patterns::table_for;
use crate::lang::{BlockStyle, Language};

static ACCESSOR_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\s*(?:get|set|init|add|remove)\b").expect("Invalid accessor regex")
});

static EMPTY_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\s*\}$").expect("Invalid empty body regex"));

/// Keep only declaration lines.
///
/// Unrecognized languages pass through unchanged.
pub fn extract_signatures(lines: Vec<Line>, language: Language) -> Vec<Line> {
    let Some(table) = table_for(language) else {
        return lines;
    };
    let braces = language.block_style() == BlockStyle::Braces;

    let out: Vec<Line> = lines
        .into_iter()
        .map(|line| {
            if !line.retained {
                return line;
            }
            match table.classify(&line.text) {
                Some(_) if braces => {
                    let text = truncate_body(&line.text);
                    line.with_text(text)
                }
                Some(_) => line,
                None => line.excluded(),
            }
        })
        .collect();

    tracing::debug!(
        language = %language,
        retained = super::line::retained_count(&out),
        "extracted signatures"
    );
    out
}

/// Elide a same-line body from a brace-family declaration
pub fn truncate_body(text: &str) -> String {
    let has_arrow = text.contains("=>");

    if let Some(brace) = text.find('{') {
        if !has_arrow && !ACCESSOR_BLOCK.is_match(text) && !EMPTY_BODY.is_match(text) {
            return format!("{} {{ ... }}", text[..brace].trim());
        }
    }

    if has_arrow && !text.ends_with(';') {
        if let Some(arrow) = text.find("=>") {
            return format!("{} => ...;", text[..arrow].trim());
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::line::{lines_from_source, retained, LineNumber};
    use crate::pipeline::normalize::{normalize, NormalizeMode};

    fn signatures(src: &str, language: Language) -> Vec<Line> {
        let lines = normalize(lines_from_source(src), language, NormalizeMode::StripComments);
        extract_signatures(lines, language)
    }

    #[test]
    fn test_same_line_body_is_elided() {
        let out = signatures("// a comment\nint X() { return 1; }\n", Language::CSharp);
        let kept: Vec<_> = retained(&out).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "int X() { ... }");
        assert_eq!(kept[0].number, LineNumber::Exact(2));
    }

    #[test]
    fn test_truncate_body_rules() {
        assert_eq!(truncate_body("public class A {"), "public class A { ... }");
        assert_eq!(
            truncate_body("public string Name { get; set; }"),
            "public string Name { get; set; }"
        );
        assert_eq!(truncate_body("public Foo() { }"), "public Foo() { }");
        assert_eq!(
            truncate_body("public int Twice(int x) =>"),
            "public int Twice(int x) => ...;"
        );
        assert_eq!(
            truncate_body("public int Count => items.Count;"),
            "public int Count => items.Count;"
        );
        assert_eq!(truncate_body("void Run()"), "void Run()");
    }

    #[test]
    fn test_truncated_text_is_prefix_of_original() {
        let lines = [
            "public static void Main(string[] args) { Run(); }",
            "public int Twice(int x) => x",
            "internal sealed class Worker : IDisposable {",
        ];
        for line in lines {
            let truncated = truncate_body(line);
            let kept = truncated
                .trim_end_matches(" { ... }")
                .trim_end_matches(" => ...;");
            assert!(line.starts_with(kept), "{kept:?} not a prefix of {line:?}");
        }
    }

    #[test]
    fn test_csharp_bodies_are_dropped() {
        let src = "namespace App\n{\n    public class Greeter\n    {\n        private int _count;\n        public string Greet(string name)\n        {\n            _count++;\n            return \"Hi \" + name;\n        }\n    }\n}\n";
        let out = signatures(src, Language::CSharp);
        let kept: Vec<_> = retained(&out).map(|l| l.text.as_str()).collect();
        assert_eq!(
            kept,
            vec![
                "namespace App",
                "public class Greeter",
                "private int _count;",
                "public string Greet(string name)",
            ]
        );
        assert_eq!(out.len(), src.split('\n').count());
    }

    #[test]
    fn test_vb_signatures_are_not_truncated() {
        let src = "Public Class Form1\n    Private Sub Button1_Click(sender As Object, e As EventArgs) Handles Button1.Click\n        MsgBox(\"hi\")\n    End Sub\nEnd Class";
        let out = signatures(src, Language::VisualBasic);
        let kept: Vec<_> = retained(&out).map(|l| l.text.as_str()).collect();
        assert_eq!(
            kept,
            vec![
                "Public Class Form1",
                "Private Sub Button1_Click(sender As Object, e As EventArgs) Handles Button1.Click",
            ]
        );
    }

    #[test]
    fn test_excluded_declaration_stays_excluded() {
        let mut lines = lines_from_source("public int A() { return 1; }\npublic int B() { return 2; }");
        lines[0] = lines[0].clone().excluded();
        let out = extract_signatures(lines, Language::CSharp);

        assert!(!out[0].retained);
        assert_eq!(out[0].text, "public int A() { return 1; }");
        assert_eq!(out[0].number, LineNumber::Exact(1));
        let kept: Vec<_> = retained(&out).map(|l| l.text.as_str()).collect();
        assert_eq!(kept, vec!["public int B() { ... }"]);
    }

    #[test]
    fn test_unrecognized_passes_through() {
        let lines = lines_from_source("anything\ngoes");
        let out = extract_signatures(lines.clone(), Language::Unrecognized);
        assert_eq!(out, lines);
    }
}
