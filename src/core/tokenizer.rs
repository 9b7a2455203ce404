//! Token counting - the counting collaborator behind every view's statistics
//!
//! Counts use tiktoken (cl100k_base by default). When an encoding cannot be
//! loaded the count degrades to the character length of the text, so callers
//! always receive a number.
//!
//! Supported models:
//! - gpt-4, gpt-4-turbo, gpt-3.5-turbo (cl100k_base)
//! - claude-3, claude-3.5 (uses cl100k_base as approximation)
//! - o200k_base (gpt-4o native encoding)
//! - heuristic (fast estimate, no BPE)
//! - chars (plain character count)

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

use crate::core::error::ConfigError;

/// Anything that can turn text into a token count.
///
/// Implementations must return a defined value for every input, including
/// `0` for the empty string.
pub trait TokenCounter: Sync {
    fn count(&self, text: &str) -> usize;
}

/// Supported token models/encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base encoding (GPT-4, GPT-3.5-turbo, Claude 3)
    #[default]
    Cl100k,
    /// o200k_base encoding (GPT-4o native)
    O200k,
    /// GPT-4 / GPT-4-turbo (alias for Cl100k)
    Gpt4,
    /// GPT-4o (alias for O200k)
    Gpt4o,
    /// GPT-3.5-turbo (alias for Cl100k)
    Gpt35Turbo,
    /// Claude 3 / 3.5 (approximated with Cl100k)
    Claude3,
    /// Fast heuristic estimation (no BPE encoding)
    Heuristic,
    /// Character count
    Chars,
}

impl TokenModel {
    fn get_bpe(&self) -> Option<&'static CoreBPE> {
        match self {
            TokenModel::O200k | TokenModel::Gpt4o => O200K_BPE.as_ref().ok(),
            TokenModel::Cl100k
            | TokenModel::Gpt4
            | TokenModel::Gpt35Turbo
            | TokenModel::Claude3 => CL100K_BPE.as_ref().ok(),
            TokenModel::Heuristic | TokenModel::Chars => None,
        }
    }

    pub fn available_models() -> &'static [&'static str] {
        &[
            "cl100k",
            "o200k",
            "gpt4",
            "gpt4o",
            "gpt35",
            "claude3",
            "heuristic",
            "chars",
        ]
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Gpt4 => "gpt4",
            TokenModel::Gpt4o => "gpt4o",
            TokenModel::Gpt35Turbo => "gpt35",
            TokenModel::Claude3 => "claude3",
            TokenModel::Heuristic => "heuristic",
            TokenModel::Chars => "chars",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "default" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" => Ok(TokenModel::O200k),
            "gpt4" | "gpt-4" | "gpt-4-turbo" => Ok(TokenModel::Gpt4),
            "gpt4o" | "gpt-4o" => Ok(TokenModel::Gpt4o),
            "gpt35" | "gpt-3.5" | "gpt-3.5-turbo" => Ok(TokenModel::Gpt35Turbo),
            "claude" | "claude3" | "claude-3" | "claude-3.5" => Ok(TokenModel::Claude3),
            "heuristic" | "fast" | "estimate" => Ok(TokenModel::Heuristic),
            "chars" | "characters" | "length" => Ok(TokenModel::Chars),
            _ => Err(ConfigError::model(s, TokenModel::available_models())),
        }
    }
}

impl TokenCounter for TokenModel {
    fn count(&self, text: &str) -> usize {
        count_tokens(text, *self)
    }
}

// Loaded once on first use; a load failure is logged once and then served
// from the character-count fallback.
static CL100K_BPE: Lazy<Result<CoreBPE, String>> = Lazy::new(|| {
    cl100k_base().map_err(|e| {
        tracing::warn!(error = %e, "cl100k_base unavailable, counting characters instead");
        format!("Failed to load cl100k_base: {}", e)
    })
});

static O200K_BPE: Lazy<Result<CoreBPE, String>> = Lazy::new(|| {
    o200k_base().map_err(|e| {
        tracing::warn!(error = %e, "o200k_base unavailable, counting characters instead");
        format!("Failed to load o200k_base: {}", e)
    })
});

/// Count tokens in text using the specified model
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }

    match model {
        TokenModel::Heuristic => estimate_tokens_heuristic(text),
        TokenModel::Chars => text.chars().count(),
        _ => match model.get_bpe() {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => text.chars().count(),
        },
    }
}

/// Estimate tokens using a fast heuristic (no BPE encoding)
///
/// - ASCII text: ~4 characters per token
/// - Code symbols: ~2 characters per token
/// - Other Unicode: ~2 characters per token
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let mut ascii_chars = 0usize;
    let mut other_unicode = 0usize;
    let mut whitespace = 0usize;
    let mut code_symbols = 0usize;

    for c in text.chars() {
        if c.is_ascii_whitespace() {
            whitespace += 1;
        } else if c.is_ascii() {
            if is_code_symbol(c) {
                code_symbols += 1;
            } else {
                ascii_chars += 1;
            }
        } else {
            other_unicode += 1;
        }
    }

    let ascii_tokens = (ascii_chars + whitespace).div_ceil(4);
    let symbol_tokens = code_symbols.div_ceil(2);
    let other_tokens = other_unicode.div_ceil(2);

    ascii_tokens + symbol_tokens + other_tokens
}

#[inline]
fn is_code_symbol(c: char) -> bool {
    c.is_ascii_punctuation() && c != '_'
}
