//! Statistics flow - token savings of every view mode
//!
//! Each file is rendered once per mode and counted with the selected
//! tokenizer, giving the original-vs-processed comparison per file.

use anyhow::Result;
use std::path::Path;

use crate::backends::scan::{collect_sources, Scan, ScanOptions, SourceFile};
use crate::core::model::{ResultItem, ResultSet, TokenStats};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::tokenizer::TokenCounter;
use crate::pipeline::{build_view, ViewConfig, ViewMode};

/// Token counts of one file under every mode
pub fn file_token_stats(file: &SourceFile, counter: &dyn TokenCounter) -> TokenStats {
    let mut stats = TokenStats {
        original: counter.count(&file.content),
        ..Default::default()
    };
    for mode in ViewMode::ALL {
        let view = build_view(&file.content, file.language, &ViewConfig::new(mode), counter);
        stats.set(mode, view.processed_tokens);
    }
    stats
}

/// Build stats results for collected sources; returns the summed stats too
pub fn stats_results(scan: &Scan, counter: &dyn TokenCounter) -> (ResultSet, TokenStats) {
    let mut result_set = ResultSet::new();
    let mut total = TokenStats::default();

    for file in &scan.files {
        let stats = file_token_stats(file, counter);
        total += stats;
        let mut item = ResultItem::stats(&file.name, file.language, stats);
        item.meta.size = Some(file.size);
        item.meta.truncated = file.truncated;
        result_set.push(item);
    }

    result_set.sort();
    result_set.extend(scan.skipped.iter().map(|w| w.to_result_item()));
    (result_set, total)
}

/// Run the stats command
pub fn run_stats(
    path: &Path,
    scan_options: &ScanOptions,
    counter: &dyn TokenCounter,
    quiet: bool,
    render_config: RenderConfig,
) -> Result<()> {
    let scan = collect_sources(path, scan_options)?;
    let (result_set, total) = stats_results(&scan, counter);

    let renderer = Renderer::with_config(render_config);
    renderer.render_to(&result_set, std::io::stdout().lock())?;

    if !quiet {
        let best = ViewMode::ALL
            .into_iter()
            .min_by_key(|m| total.get(*m))
            .unwrap_or_default();
        eprintln!(
            "{} file(s), {} original tokens; smallest view: {} ({} tokens, -{:.0}%)",
            scan.files.len(),
            total.original,
            best,
            total.get(best),
            total.savings_percent(best),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_reader::{FileWarning, WarningCode};
    use crate::core::model::Kind;
    use crate::core::tokenizer::TokenModel;
    use crate::lang::Language;
    use std::path::PathBuf;

    const CHARS: TokenModel = TokenModel::Chars;

    fn source(name: &str, language: Language, content: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            language,
            content: content.to_string(),
            size: content.len() as u64,
            truncated: false,
        }
    }

    #[test]
    fn test_file_token_stats() {
        let file = source(
            "A.cs",
            Language::CSharp,
            "// note\npublic int Twice(int x) { return x * 2; }\n",
        );
        let stats = file_token_stats(&file, &CHARS);

        assert_eq!(stats.original, file.content.len());
        assert_eq!(stats.full, "public int Twice(int x) { return x * 2; }".len());
        assert_eq!(stats.readable, stats.full);
        assert_eq!(stats.signatures, "public int Twice(int x) { ... }".len());
        assert!(stats.minified > 0);
    }

    #[test]
    fn test_stats_results_sorted_with_errors_last() {
        let scan = Scan {
            files: vec![
                source("b/B.vb", Language::VisualBasic, "Dim x = 1"),
                source("a/A.cs", Language::CSharp, "int y;"),
            ],
            skipped: vec![FileWarning::new(WarningCode::BinaryFile, "binary").with_path("c/C.cs")],
        };
        let (set, total) = stats_results(&scan, &CHARS);

        assert_eq!(set.len(), 3);
        assert_eq!(set.items[0].path.as_deref(), Some("a/A.cs"));
        assert_eq!(set.items[0].kind, Kind::Stats);
        assert_eq!(set.items[2].kind, Kind::Error);
        assert_eq!(total.original, "Dim x = 1".len() + "int y;".len());
    }

    #[test]
    fn test_stats_results_empty() {
        let (set, total) = stats_results(&Scan::default(), &CHARS);
        assert!(set.is_empty());
        assert_eq!(total, TokenStats::default());
    }
}
