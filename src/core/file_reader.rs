//! Source file reading
//!
//! Provides consistent handling for:
//! - Non-UTF-8 files (lossy conversion)
//! - Oversized files (truncate or skip)
//! - Binary files (skipped)

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::model::{ResultItem, ViewError};

/// Default maximum source size in bytes (4 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Bytes inspected for NUL when detecting binary content
const BINARY_PROBE_LEN: usize = 8192;

/// Strategy for handling oversized files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStrategy {
    /// Skip files exceeding the size limit
    Skip,
    /// Keep the first `max_file_size` bytes and mark as truncated
    #[default]
    Truncate,
}

/// Configuration for file reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FileReadConfig {
    pub max_file_size: u64,
    pub size_strategy: SizeStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            size_strategy: SizeStrategy::Truncate,
        }
    }
}

/// Warning codes for file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    FileTruncated,
    FileSkippedSize,
    LossyConversion,
    BinaryFile,
    ReadError,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::FileTruncated => "FILE_TRUNCATED",
            WarningCode::FileSkippedSize => "FILE_SKIPPED_SIZE",
            WarningCode::LossyConversion => "LOSSY_CONVERSION",
            WarningCode::BinaryFile => "BINARY_FILE",
            WarningCode::ReadError => "READ_ERROR",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWarning {
    pub code: WarningCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FileWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn to_view_error(&self) -> ViewError {
        ViewError::new(self.code.as_str(), &self.message)
    }

    /// Convert to an error item carrying the warning's path
    pub fn to_result_item(&self) -> ResultItem {
        let mut item = ResultItem::error(self.to_view_error());
        item.path = self.path.clone();
        item
    }
}

/// Result of reading a file
#[derive(Debug, Clone, Default)]
pub struct FileReadResult {
    /// The file content (None when skipped)
    pub content: Option<String>,
    /// Size on disk in bytes
    pub size: u64,
    pub truncated: bool,
    pub lossy_conversion: bool,
    pub warnings: Vec<FileWarning>,
}

impl FileReadResult {
    fn success(content: String, size: u64) -> Self {
        Self {
            content: Some(content),
            size,
            ..Self::default()
        }
    }

    fn skipped(size: u64, warning: FileWarning) -> Self {
        Self {
            size,
            warnings: vec![warning],
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.content.is_none()
    }
}

/// Read a file with the given configuration; never fails, problems become warnings
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> FileReadResult {
    let display = path.display().to_string();

    let size = match fs::metadata(path) {
        Ok(m) => m.len(),
        Err(e) => {
            let warning = FileWarning::new(WarningCode::ReadError, format!("cannot read metadata: {}", e))
                .with_path(&display);
            return FileReadResult::skipped(0, warning);
        }
    };

    let oversized = size > config.max_file_size;
    if oversized && config.size_strategy == SizeStrategy::Skip {
        let warning = FileWarning::new(
            WarningCode::FileSkippedSize,
            format!(
                "file exceeds size limit ({} > {} bytes)",
                size, config.max_file_size
            ),
        )
        .with_path(&display);
        return FileReadResult::skipped(size, warning);
    }

    let bytes = match read_bytes(path, config.max_file_size) {
        Ok(b) => b,
        Err(e) => {
            let warning = FileWarning::new(WarningCode::ReadError, format!("cannot read file: {}", e))
                .with_path(&display);
            return FileReadResult::skipped(size, warning);
        }
    };

    let probe = &bytes[..bytes.len().min(BINARY_PROBE_LEN)];
    if probe.contains(&0) {
        let warning = FileWarning::new(
            WarningCode::BinaryFile,
            "file appears to be binary (contains null bytes)",
        )
        .with_path(&display);
        return FileReadResult::skipped(size, warning);
    }

    let (content, lossy) = match String::from_utf8(bytes) {
        Ok(content) => (content, false),
        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
    };

    let mut result = FileReadResult::success(content, size);
    if lossy {
        result.lossy_conversion = true;
        result.warnings.push(
            FileWarning::new(
                WarningCode::LossyConversion,
                "lossy UTF-8 conversion applied (some characters replaced)",
            )
            .with_path(&display),
        );
    }
    if oversized {
        result.truncated = true;
        result.warnings.push(
            FileWarning::new(
                WarningCode::FileTruncated,
                format!("content truncated to {} bytes", config.max_file_size),
            )
            .with_path(&display),
        );
    }
    result
}

/// Read at most `limit` bytes
fn read_bytes(path: &Path, limit: u64) -> std::io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut buffer = Vec::new();
    std::io::BufReader::new(file)
        .take(limit)
        .read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Convenience function with default config
pub fn read_file_safe(path: &Path) -> FileReadResult {
    read_file_with_config(path, &FileReadConfig::default())
}
