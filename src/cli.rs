//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::backends::scan::ScanOptions;
use crate::core::file_reader::{FileReadConfig, SizeStrategy, DEFAULT_MAX_FILE_SIZE};
use crate::core::logging::{init_logging, Verbosity};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::tokenizer::TokenModel;
use crate::flows::stats::run_stats;
use crate::flows::view::{run_view, ViewOptions};
use crate::lang::patterns::table_for;
use crate::lang::{Category, CategorySet, Language, LanguageOverride};
use crate::pipeline::{ViewConfig, ViewMode};

/// codelens - compact, line-traceable views of C# and VB.NET source.
#[derive(Parser, Debug)]
#[command(name = "codelens")]
#[command(
    author,
    version,
    about,
    long_about = r#"codelens renders source files as compact views for reading or for LLM prompts.

Every shown line keeps the number it had in the original file, so a view can
always be traced back to the source. Minified views only approximate numbers
(shown as ~N).

View modes:
- full: whitespace-normalized source, comments removed unless --comments
- readable: same as full
- signatures: declarations only, bodies elided to { ... }
- minified: identifiers renamed to idN, literals collapsed

Output formats:
- text: numbered listing (default)
- jsonl: one JSON object per line
- json: a single JSON array
- md: Markdown with fenced code blocks

Examples:
    codelens view src/Program.cs --mode signatures
    codelens view src --only method,property --search Save
    codelens stats src --tokenizer o200k
"#
)]
pub struct Cli {
    /// Output format (text/jsonl/json/md).
    #[arg(
        long,
        global = true,
        env = "CODELENS_FORMAT",
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default)\n\
- jsonl\n\
- json\n\
- md (markdown)\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping."
    )]
    pub format: OutputFormat,

    /// Tokenizer used for token counts.
    #[arg(
        long,
        global = true,
        env = "CODELENS_TOKENIZER",
        default_value = "cl100k",
        value_name = "MODEL",
        long_help = "Tokenizer used for all token counts.\n\n\
Supported values: cl100k (default), o200k, gpt4, gpt4o, gpt35, claude3,\n\
heuristic (fast estimate), chars (character count)."
    )]
    pub tokenizer: TokenModel,

    /// Disable colored output.
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. Color is also off when stdout is not a terminal."
    )]
    pub no_color: bool,

    /// Quiet mode (no summary, errors only in logs).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress the summary printed to stderr and lower the log level to errors.\n\
Results are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logs).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug logging on stderr. RUST_LOG overrides this when set."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation.\n\n\
Has no effect on text/md formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Source discovery options shared by view and stats
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// File or directory to read.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Language override (auto/csharp/vbnet/plaintext).
    #[arg(
        long,
        default_value = "auto",
        value_name = "LANG",
        long_help = "Force the language instead of detecting it from the extension.\n\n\
Accepted: auto (default), csharp|cs, vbnet|vb, plaintext."
    )]
    pub lang: LanguageOverride,

    /// Include hidden files/directories (dotfiles).
    #[arg(long)]
    pub hidden: bool,

    /// Disable .gitignore and other ignore rules.
    #[arg(long)]
    pub no_ignore: bool,

    /// Maximum bytes read per file.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        long_help = "Maximum bytes read per file. Larger files are truncated (and marked as\n\
truncated) unless --skip-large is given."
    )]
    pub max_size: u64,

    /// Skip files over --max-size instead of truncating them.
    #[arg(long)]
    pub skip_large: bool,
}

impl SourceArgs {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            hidden: self.hidden,
            no_ignore: self.no_ignore,
            language: self.lang,
            read: FileReadConfig {
                max_file_size: self.max_size,
                size_strategy: if self.skip_large {
                    SizeStrategy::Skip
                } else {
                    SizeStrategy::Truncate
                },
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a file or directory as a view.
    #[command(
        long_about = "Render PATH in the selected view mode.\n\n\
A single file is shown as a numbered listing. A directory is walked (respecting\n\
.gitignore) and every .cs/.vb file is shown under a `// --- File: NAME ---` header,\n\
each with its own numbering.\n\n\
Examples:\n\
  codelens view Program.cs\n\
  codelens view src --mode signatures\n\
  codelens view Form1.vb --only method --search Click\n"
    )]
    View {
        #[command(flatten)]
        source: SourceArgs,

        /// View mode (full/readable/signatures/minified).
        #[arg(
            long,
            short,
            default_value = "full",
            value_name = "MODE",
            long_help = "View mode:\n\
- full (default): normalized source\n\
- readable: same pipeline as full\n\
- signatures: declarations only\n\
- minified: renamed identifiers, collapsed literals (approximate line numbers)"
        )]
        mode: ViewMode,

        /// Keep comments (full/readable modes).
        #[arg(long)]
        comments: bool,

        /// Keep only these element categories (full/readable modes).
        #[arg(
            long,
            value_delimiter = ',',
            value_name = "CATEGORIES",
            long_help = "Comma-separated element categories to keep in full/readable modes:\n\
namespace, type, delegate, event, property, method, field.\n\n\
Each matching declaration is kept together with its whole body. Selecting none\n\
or all categories disables filtering."
        )]
        only: Vec<Category>,

        /// Show only lines containing QUERY (case-insensitive).
        #[arg(long, short, value_name = "QUERY")]
        search: Option<String>,
    },

    /// Compare token counts of every view mode.
    #[command(
        long_about = "Count tokens of PATH under every view mode and print the savings\n\
against the original source, per file and in total.\n\n\
Examples:\n\
  codelens stats src\n\
  codelens stats Program.cs --tokenizer o200k\n"
    )]
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List recognized languages and element categories.
    Langs,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    let color = !cli.no_color && std::io::stdout().is_terminal();
    colored::control::set_override(color);

    let render_config = RenderConfig::new(cli.format)
        .with_pretty(cli.pretty)
        .with_color(color);

    match cli.command {
        Commands::View {
            source,
            mode,
            comments,
            only,
            search,
        } => {
            let categories: CategorySet = only.into_iter().collect();
            if !categories.is_empty() && !mode.honors_categories() {
                tracing::warn!(mode = %mode, "--only is ignored outside full/readable modes");
            }
            tracing::debug!(
                categories = ?categories.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                "element filter"
            );
            let options = ViewOptions {
                config: ViewConfig::new(mode)
                    .with_comments(comments)
                    .with_categories(categories),
                search,
                quiet: cli.quiet,
            };
            run_view(
                &source.path,
                &source.scan_options(),
                &options,
                &cli.tokenizer,
                render_config,
            )
        }

        Commands::Stats { source } => run_stats(
            &source.path,
            &source.scan_options(),
            &cli.tokenizer,
            cli.quiet,
            render_config,
        ),

        Commands::Langs => {
            print!("{}", languages_listing());
            Ok(())
        }
    }
}

/// Text listing of languages, extensions and categories
fn languages_listing() -> String {
    let mut out = String::from("Languages:\n");
    for language in Language::all() {
        let extensions = language.extensions();
        let extensions = if extensions.is_empty() {
            "(any other)".to_string()
        } else {
            extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let patterns = table_for(*language).map(|t| t.len()).unwrap_or(0);
        out.push_str(&format!(
            "  {:<10} {:<12} {} patterns\n",
            language.to_string(),
            extensions,
            patterns
        ));
    }

    out.push_str("\nCategories:\n");
    for category in Category::ALL {
        out.push_str(&format!("  {}\n", category));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_view_args() {
        let cli = Cli::parse_from([
            "codelens",
            "view",
            "src",
            "--mode",
            "sig",
            "--only",
            "method,property",
            "--format",
            "jsonl",
        ]);
        assert_eq!(cli.format, OutputFormat::Jsonl);
        match cli.command {
            Commands::View { source, mode, only, .. } => {
                assert_eq!(source.path, PathBuf::from("src"));
                assert_eq!(mode, ViewMode::Signatures);
                assert_eq!(only, vec![Category::Method, Category::Property]);
                assert_eq!(source.lang, LanguageOverride::Auto);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["codelens", "view", "x.cs", "--mode", "pretty"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_args_scan_options() {
        let cli = Cli::parse_from([
            "codelens",
            "stats",
            "src",
            "--lang",
            "vb",
            "--hidden",
            "--max-size",
            "10",
            "--skip-large",
        ]);
        let Commands::Stats { source } = cli.command else {
            panic!("expected stats");
        };
        let options = source.scan_options();
        assert!(options.hidden);
        assert!(!options.no_ignore);
        assert_eq!(options.language, LanguageOverride::Force(Language::VisualBasic));
        assert_eq!(options.read.max_file_size, 10);
        assert_eq!(options.read.size_strategy, SizeStrategy::Skip);
    }

    #[test]
    fn test_languages_listing() {
        let listing = languages_listing();
        assert!(listing.contains("csharp"));
        assert!(listing.contains(".vb"));
        assert!(listing.contains("(any other)"));
        assert!(listing.contains("  method\n"));
    }
}
