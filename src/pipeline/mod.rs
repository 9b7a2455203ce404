//! Pipeline module - Line-based source transformation stages
//!
//! This module provides:
//! - line: line records carrying provenance back to the source file
//! - normalize: comment stripping and whitespace collapse
//! - signatures: declaration-only views
//! - scope: element-category block filtering
//! - minify: identifier and literal shortening
//! - orchestrate: per-mode stage sequencing and aggregates
//! - search: query projection and highlight spans
//!
//! Stages are plain functions from one line sequence to the next. None of
//! them fail; excluded lines pass through every later stage untouched.

pub mod line;
pub mod minify;
pub mod normalize;
pub mod orchestrate;
pub mod scope;
pub mod search;
pub mod signatures;

pub use line::{Line, LineNumber};
pub use orchestrate::{
    build_aggregate, build_view, AggregateView, FileInput, FileView, ViewConfig, ViewMode,
};
pub use search::{Placeholder, Projection};
