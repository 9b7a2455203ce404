//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Typed errors for user-supplied values
//! - Path normalization utilities
//! - File reading strategies
//! - Token counting for LLM context budgeting
//! - Logging setup

pub mod error;
pub mod file_reader;
pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
pub mod tokenizer;
