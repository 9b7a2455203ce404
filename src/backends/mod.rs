//! Backends module - File discovery and reading
//!
//! Provides:
//! - scan: source collection with the ignore crate

pub mod scan;
