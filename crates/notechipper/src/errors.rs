//! # Error Types

/// Errors from notechipper operations.
#[derive(Debug, thiserror::Error)]
pub enum NotechipperError {
    /// Malformed quantization config; rejected at tokenizer construction.
    #[error("invalid quantization config: {reason}")]
    Config {
        /// What was wrong with the config.
        reason: String,
    },

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// A token description not present in the vocabulary (encode-side miss).
    #[error("value not in vocabulary: {token}")]
    UnknownValue {
        /// Display form of the missing token.
        token: String,
    },

    /// A token id not present in the vocabulary (decode-side miss).
    #[error("token id ({id}) not in vocabulary")]
    UnknownToken {
        /// The missing id.
        id: usize,
    },

    /// A token stream violates a strategy's transition pattern.
    #[error("{strategy} grammar violation at token {index}: {reason}")]
    Grammar {
        /// The strategy whose grammar was violated.
        strategy: &'static str,
        /// Index of the offending token (or tuple).
        index: usize,
        /// What the decoder expected.
        reason: String,
    },

    /// Parse error (config JSON, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for notechipper operations.
pub type NCResult<T> = core::result::Result<T, NotechipperError>;
