//! Language module - Language descriptors, element categories and pattern tables
//!
//! Provides:
//! - Language: closed set of recognized source languages
//! - Category / CategorySet: element categories used by signature and scope passes
//! - patterns: static per-language (category, regex) tables
//! - keywords: reserved words the minifier must not rename

pub mod keywords;
pub mod patterns;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::error::ConfigError;

/// How a language delimits its scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `{` / `}` pairs
    Braces,
    /// `Sub ... End Sub` keyword pairs
    Keywords,
    /// No block tracking
    None,
}

/// Recognized source languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    #[serde(rename = "vbnet")]
    VisualBasic,
    #[serde(rename = "plaintext")]
    Unrecognized,
}

impl Language {
    /// Detect language from a file extension (with or without the leading dot)
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "cs" => Language::CSharp,
            "vb" => Language::VisualBasic,
            _ => Language::Unrecognized,
        }
    }

    /// Detect language from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Language::from_extension)
            .unwrap_or(Language::Unrecognized)
    }

    pub fn block_style(&self) -> BlockStyle {
        match self {
            Language::CSharp => BlockStyle::Braces,
            Language::VisualBasic => BlockStyle::Keywords,
            Language::Unrecognized => BlockStyle::None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Language::Unrecognized)
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::CSharp => &["cs"],
            Language::VisualBasic => &["vb"],
            Language::Unrecognized => &[],
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::CSharp,
            Language::VisualBasic,
            Language::Unrecognized,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::CSharp => "csharp",
            Language::VisualBasic => "vbnet",
            Language::Unrecognized => "plaintext",
        };
        write!(f, "{}", name)
    }
}

/// A user's language choice: detect from the path, or force one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageOverride {
    #[default]
    Auto,
    Force(Language),
}

impl LanguageOverride {
    /// Resolve the language for a concrete path
    pub fn resolve(&self, path: &Path) -> Language {
        match self {
            LanguageOverride::Auto => Language::from_path(path),
            LanguageOverride::Force(language) => *language,
        }
    }

    pub fn available() -> &'static [&'static str] {
        &["auto", "csharp", "cs", "vbnet", "vb", "plaintext"]
    }
}

impl FromStr for LanguageOverride {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(LanguageOverride::Auto),
            "csharp" | "cs" | "c#" => Ok(LanguageOverride::Force(Language::CSharp)),
            "vbnet" | "vb" | "vb.net" => Ok(LanguageOverride::Force(Language::VisualBasic)),
            "plaintext" | "text" | "none" => Ok(LanguageOverride::Force(Language::Unrecognized)),
            _ => Err(ConfigError::language(s, LanguageOverride::available())),
        }
    }
}

/// Syntactic element categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Namespace,
    Type,
    Delegate,
    Event,
    Property,
    Method,
    Field,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Namespace,
        Category::Type,
        Category::Delegate,
        Category::Event,
        Category::Property,
        Category::Method,
        Category::Field,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Namespace => "namespace",
            Category::Type => "type",
            Category::Delegate => "delegate",
            Category::Event => "event",
            Category::Property => "property",
            Category::Method => "method",
            Category::Field => "field",
        }
    }

    pub fn available() -> &'static [&'static str] {
        &[
            "namespace",
            "type",
            "delegate",
            "event",
            "property",
            "method",
            "field",
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "namespace" | "namespaces" => Ok(Category::Namespace),
            "type" | "types" | "class" | "classes" => Ok(Category::Type),
            "delegate" | "delegates" => Ok(Category::Delegate),
            "event" | "events" => Ok(Category::Event),
            "property" | "properties" => Ok(Category::Property),
            "method" | "methods" => Ok(Category::Method),
            "field" | "fields" => Ok(Category::Field),
            _ => Err(ConfigError::category(s, Category::available())),
        }
    }
}

/// A set of selected element categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    pub fn all() -> Self {
        Category::ALL.iter().copied().collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set is a proper, non-empty subset of all categories.
    /// Selecting nothing or everything means no element filtering.
    pub fn is_restrictive(&self) -> bool {
        !self.0.is_empty() && self.0.len() < Category::ALL.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<T: IntoIterator<Item = Category>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
