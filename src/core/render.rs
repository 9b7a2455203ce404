//! Renderer module
//!
//! Renders ResultSet to different output formats: text, jsonl, json, md

use colored::Colorize;
use std::fmt;
use std::io::Write;

use crate::core::error::ConfigError;
use crate::core::model::{Kind, ResultItem, ResultSet, TokenStats, ViewLine};
use crate::pipeline::orchestrate::ViewMode;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Numbered listing for humans
    #[default]
    Text,
    Jsonl,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn available() -> &'static [&'static str] {
        &["text", "jsonl", "json", "md"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(ConfigError::format(s, OutputFormat::available())),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    /// ANSI styling in text output
    pub color: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(result_set),
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render to a writer, followed by a newline when non-empty
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        if output.is_empty() {
            return Ok(());
        }
        writer.write_all(output.as_bytes())?;
        writer.write_all(b"\n")
    }

    /// Render as a numbered listing
    fn render_text(&self, result_set: &ResultSet) -> String {
        let mut blocks = Vec::new();
        let mut stats = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::View => blocks.push(self.render_view_text(item)),
                Kind::Error => blocks.push(self.render_error_text(item)),
                Kind::Stats => stats.push(item),
            }
        }

        if !stats.is_empty() {
            blocks.push(self.render_stats_text(&stats));
        }

        blocks.join("\n\n")
    }

    fn render_view_text(&self, item: &ResultItem) -> String {
        let mut out = Vec::new();

        if let Some(header) = &item.header {
            out.push(self.paint(header, |s| s.cyan().bold().to_string()));
        }
        if let Some(placeholder) = item.placeholder {
            out.push(self.paint(placeholder.message(), |s| s.yellow().to_string()));
        }

        let width = label_width(&item.lines);
        for line in &item.lines {
            let label = format!("{:>width$}", line.label(), width = width);
            let label = self.paint(&label, |s| s.dimmed().to_string());
            let text = if line.matches.is_empty() {
                line.text.clone()
            } else {
                line.highlighted_with(|hit| self.paint(hit, |s| s.yellow().bold().to_string()))
            };
            out.push(format!("{} | {}", label, text));
        }

        out.join("\n")
    }

    fn render_error_text(&self, item: &ResultItem) -> String {
        item.errors
            .iter()
            .map(|e| {
                let tag = self.paint(&format!("error[{}]", e.code), |s| s.red().bold().to_string());
                match &item.path {
                    Some(path) => format!("{} {}: {}", tag, path, e.message),
                    None => format!("{} {}", tag, e.message),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_stats_text(&self, items: &[&ResultItem]) -> String {
        let rows = stats_rows(items);
        let path_width = rows
            .iter()
            .map(|(path, _, _)| path.len())
            .chain(std::iter::once("path".len()))
            .max()
            .unwrap_or(4);

        let mut out = Vec::with_capacity(rows.len() + 1);
        let mut header = format!("{:<path_width$}  {:<9}  {:>8}", "path", "language", "original");
        for mode in ViewMode::ALL {
            header.push_str(&format!("  {:>16}", mode.as_str()));
        }
        out.push(self.paint(&header, |s| s.bold().to_string()));

        for (path, language, tokens) in &rows {
            let mut row = format!("{:<path_width$}  {:<9}  {:>8}", path, language, tokens.original);
            for mode in ViewMode::ALL {
                row.push_str(&format!("  {:>16}", savings_cell(tokens, mode)));
            }
            out.push(row);
        }

        out.join("\n")
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut views = Vec::new();
        let mut stats = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::View => views.push(item),
                Kind::Stats => stats.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    match &item.path {
                        Some(path) => output.push_str(&format!(
                            "- **{}** `{}`: {}\n",
                            error.code, path, error.message
                        )),
                        None => {
                            output.push_str(&format!("- **{}**: {}\n", error.code, error.message))
                        }
                    }
                }
            }
            output.push('\n');
        }

        for item in views {
            self.render_view_md(&mut output, item);
        }

        if !stats.is_empty() {
            output.push_str("## Token Stats\n\n");
            output.push_str("| Path | Language | Original |");
            for mode in ViewMode::ALL {
                output.push_str(&format!(" {} |", mode.as_str()));
            }
            output.push_str("\n|---|---|---:|");
            for _ in ViewMode::ALL {
                output.push_str("---:|");
            }
            output.push('\n');
            for (path, language, tokens) in stats_rows(&stats) {
                output.push_str(&format!("| `{}` | {} | {} |", path, language, tokens.original));
                for mode in ViewMode::ALL {
                    output.push_str(&format!(" {} |", savings_cell(&tokens, mode)));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }

    fn render_view_md(&self, output: &mut String, item: &ResultItem) {
        let title = item
            .path
            .as_deref()
            .map(|p| format!("`{}`", p))
            .unwrap_or_else(|| "View".to_string());
        output.push_str(&format!("### {}", title));

        let details: Vec<String> = item
            .language
            .iter()
            .map(|l| l.to_string())
            .chain(item.mode.iter().map(|m| m.to_string()))
            .collect();
        if !details.is_empty() {
            output.push_str(&format!(" ({})", details.join(", ")));
        }
        output.push_str("\n\n");

        if let Some(placeholder) = item.placeholder {
            output.push_str(&format!("> {}\n\n", placeholder.message()));
            return;
        }

        let fence_lang = item.language.map(|l| l.to_string()).unwrap_or_default();
        output.push_str(&format!("```{}\n", fence_lang));
        let width = label_width(&item.lines);
        for line in &item.lines {
            output.push_str(&format!("{:>width$} | {}\n", line.label(), line.text, width = width));
        }
        output.push_str("```\n");

        if let (Some(original), Some(processed)) =
            (item.meta.original_tokens, item.meta.processed_tokens)
        {
            output.push_str(&format!(
                "\n> Tokens: {} original, {} processed\n",
                original, processed
            ));
        }
        output.push('\n');
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.config.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

fn label_width(lines: &[ViewLine]) -> usize {
    lines.iter().map(|l| l.label().len()).max().unwrap_or(1)
}

fn stats_rows(items: &[&ResultItem]) -> Vec<(String, String, TokenStats)> {
    let mut rows: Vec<(String, String, TokenStats)> = items
        .iter()
        .map(|item| {
            (
                item.path.clone().unwrap_or_else(|| "-".to_string()),
                item.language.map(|l| l.to_string()).unwrap_or_default(),
                item.meta.tokens.unwrap_or_default(),
            )
        })
        .collect();

    if rows.len() > 1 {
        let mut total = TokenStats::default();
        for (_, _, tokens) in &rows {
            total += *tokens;
        }
        rows.push(("TOTAL".to_string(), String::new(), total));
    }
    rows
}

fn savings_cell(tokens: &TokenStats, mode: ViewMode) -> String {
    format!(
        "{} (-{:.0}%)",
        tokens.get(mode),
        tokens.savings_percent(mode)
    )
}
