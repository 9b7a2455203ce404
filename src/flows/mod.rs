//! Flows module - Commands combining source collection, pipeline and rendering
//!
//! Provides:
//! - view: single-file and directory views with search
//! - stats: per-mode token savings

pub mod stats;
pub mod view;
