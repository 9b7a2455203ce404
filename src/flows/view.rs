//! View flow - render one file or a directory aggregate
//!
//! A file path yields a single view item. A directory yields one item per
//! file, each with its own header, numbering and language.

use anyhow::Result;
use std::path::Path;

use crate::backends::scan::{collect_sources, Scan, ScanOptions, SourceFile};
use crate::core::model::{Meta, ResultItem, ResultSet, ViewLine};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::tokenizer::TokenCounter;
use crate::pipeline::orchestrate::{
    build_aggregate, build_view, shown_tokens, AggregateSection, FileInput, FileView,
};
use crate::pipeline::{Projection, ViewConfig, ViewMode};

/// Token totals reported after a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSummary {
    pub files: usize,
    pub skipped: usize,
    pub original_tokens: usize,
    pub processed_tokens: usize,
    pub shown_tokens: usize,
}

impl ViewSummary {
    pub fn savings_percent(&self) -> f64 {
        if self.original_tokens == 0 {
            return 0.0;
        }
        let kept = self.processed_tokens as f64 / self.original_tokens as f64;
        ((1.0 - kept) * 100.0).max(0.0)
    }
}

fn view_item(
    file: &SourceFile,
    view: &FileView,
    projection: &Projection,
    shown: usize,
) -> ResultItem {
    let lines: Vec<ViewLine> = projection.lines().iter().map(ViewLine::from).collect();
    let meta = Meta {
        size: Some(file.size),
        original_tokens: Some(view.original_tokens),
        processed_tokens: Some(view.processed_tokens),
        shown_tokens: Some(shown),
        renamed_identifiers: (view.mode == ViewMode::Minified).then_some(view.renamed_identifiers),
        tokens: None,
        truncated: file.truncated,
    };

    ResultItem::view(Some(file.name.clone()), view.language, view.mode)
        .with_lines(lines)
        .with_placeholder(projection.placeholder())
        .with_meta(meta)
}

fn section_item(file: &SourceFile, section: &AggregateSection) -> ResultItem {
    view_item(file, &section.view, &section.projection, section.shown_tokens)
        .with_header(section.header())
}

/// Build view results for already collected sources.
///
/// `aggregate` selects per-file headers and aggregate placeholder handling.
pub fn view_results(
    scan: &Scan,
    aggregate: bool,
    config: &ViewConfig,
    query: Option<&str>,
    counter: &dyn TokenCounter,
) -> (ResultSet, ViewSummary) {
    let mut result_set = ResultSet::new();
    let mut summary = ViewSummary {
        files: scan.files.len(),
        skipped: scan.skipped.len(),
        ..Default::default()
    };

    if !aggregate {
        for file in &scan.files {
            let view = build_view(&file.content, file.language, config, counter);
            let projection = view.project(query);
            let shown = shown_tokens(&projection, counter);

            summary.original_tokens += view.original_tokens;
            summary.processed_tokens += view.processed_tokens;
            summary.shown_tokens += shown;
            result_set.push(view_item(file, &view, &projection, shown));
        }
    } else {
        let inputs: Vec<FileInput<'_>> = scan
            .files
            .iter()
            .map(|f| FileInput {
                name: &f.name,
                language: f.language,
                source: &f.content,
            })
            .collect();
        let view = build_aggregate(&inputs, config, query, counter);

        summary.original_tokens = view.original_tokens;
        summary.processed_tokens = view.processed_tokens;
        summary.shown_tokens = view.shown_tokens;

        for section in &view.sections {
            if let Some(file) = scan.files.iter().find(|f| f.name == section.name) {
                result_set.push(section_item(file, section));
            }
        }
        if let Some(placeholder) = view.placeholder {
            result_set.push(ResultItem::placeholder(placeholder, config.mode));
        }
    }

    result_set.extend(scan.skipped.iter().map(|w| w.to_result_item()));
    (result_set, summary)
}

/// Options of the view command beyond source discovery
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub config: ViewConfig,
    pub search: Option<String>,
    pub quiet: bool,
}

/// Run the view command
pub fn run_view(
    path: &Path,
    scan_options: &ScanOptions,
    options: &ViewOptions,
    counter: &dyn TokenCounter,
    render_config: RenderConfig,
) -> Result<()> {
    let scan = collect_sources(path, scan_options)?;
    let (result_set, summary) = view_results(
        &scan,
        path.is_dir(),
        &options.config,
        options.search.as_deref(),
        counter,
    );

    let renderer = Renderer::with_config(render_config);
    renderer.render_to(&result_set, std::io::stdout().lock())?;

    if !options.quiet {
        eprintln!(
            "{} file(s), {} skipped | tokens: {} original, {} {} (-{:.0}%), {} shown",
            summary.files,
            summary.skipped,
            summary.original_tokens,
            summary.processed_tokens,
            options.config.mode,
            summary.savings_percent(),
            summary.shown_tokens,
        );
    }

    Ok(())
}
