//! Tokenizer for plan text
//!
//! Tokenization is done entirely through the logos lexer library; the token
//! vocabulary lives in [`tokens`] and the entry points in [`lexer_impl`].
//!
//! Two properties of plan text shape the vocabulary:
//!
//! 1. Whitespace is significant at the start of a line (its character length
//!    becomes the row indent) and a separator everywhere else, so whitespace
//!    runs are real tokens rather than skipped.
//! 2. Newlines terminate the line production in the grammar, so they are
//!    real tokens as well.
//!
//! An input chunk matching no pattern is a fatal [`TokenizeError`]; there is
//! no recovery.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize, tokenize_with_spans, TokenizeError};
pub use tokens::{HashKey, Token};

/// Preprocesses source text to ensure it ends with a newline.
///
/// The grammar requires every line, including the last, to be
/// newline-terminated. Returns the source unchanged if it is empty or
/// already ends with a newline; otherwise appends one.
pub fn ensure_source_ends_with_newline(source: &str) -> String {
    if !source.is_empty() && !source.ends_with('\n') {
        format!("{}\n", source)
    } else {
        source.to_string()
    }
}
