//! codelens - Compact, line-traceable views of C# and VB.NET source
//!
//! codelens provides:
//! - Full, readable, signature-only and minified views
//! - Element-category filtering (types, methods, properties, ...)
//! - Case-insensitive search with match highlighting
//! - Token counts and savings per view mode
//! - Unified output format (text/jsonl/json/md)

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;
mod lang;
mod pipeline;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
