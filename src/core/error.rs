//! Typed errors for user-supplied configuration values
//!
//! The transformation pipeline itself never fails; these errors only surface
//! when parsing flags, environment variables or override names.

use thiserror::Error;

/// Errors produced while parsing configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown view mode: {value}. Available: {available}")]
    UnknownMode { value: String, available: String },

    #[error("Unknown element category: {value}. Available: {available}")]
    UnknownCategory { value: String, available: String },

    #[error("Unknown language: {value}. Available: {available}")]
    UnknownLanguage { value: String, available: String },

    #[error("Unknown format: {value}. Available: {available}")]
    UnknownFormat { value: String, available: String },

    #[error("Unknown tokenizer model: {value}. Available: {available}")]
    UnknownModel { value: String, available: String },
}

impl ConfigError {
    pub fn mode(value: &str, available: &[&str]) -> Self {
        ConfigError::UnknownMode {
            value: value.to_string(),
            available: available.join(", "),
        }
    }

    pub fn category(value: &str, available: &[&str]) -> Self {
        ConfigError::UnknownCategory {
            value: value.to_string(),
            available: available.join(", "),
        }
    }

    pub fn language(value: &str, available: &[&str]) -> Self {
        ConfigError::UnknownLanguage {
            value: value.to_string(),
            available: available.join(", "),
        }
    }

    pub fn format(value: &str, available: &[&str]) -> Self {
        ConfigError::UnknownFormat {
            value: value.to_string(),
            available: available.join(", "),
        }
    }

    pub fn model(value: &str, available: &[&str]) -> Self {
        ConfigError::UnknownModel {
            value: value.to_string(),
            available: available.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_lists_available_values() {
        let err = ConfigError::mode("fancy", &["full", "readable"]);
        assert_eq!(
            err.to_string(),
            "Unknown view mode: fancy. Available: full, readable"
        );
    }

    #[test]
    fn test_errors_compare_by_value() {
        assert_eq!(
            ConfigError::format("xml", &["text"]),
            ConfigError::UnknownFormat {
                value: "xml".to_string(),
                available: "text".to_string(),
            }
        );
    }
}
