//! Tokenize entry points
//!
//! Thin wrappers around the logos lexer that collect tokens (with or
//! without byte spans) and turn the first unmatched input chunk into a
//! fatal [`TokenizeError`]. The whole parse aborts on the first bad chunk;
//! there is no recovery or resynchronization.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::lexer::tokens::Token;

/// An input chunk that matches no token pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    /// Byte offset of the offending chunk.
    pub offset: usize,
    /// 1-based source line of the offending chunk.
    pub line: usize,
    /// The offending text itself.
    pub fragment: String,
}

impl TokenizeError {
    fn at(source: &str, span: Range<usize>) -> TokenizeError {
        let line = source[..span.start].matches('\n').count() + 1;
        TokenizeError {
            offset: span.start,
            line,
            fragment: source[span.clone()].to_string(),
        }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized input {:?} at line {}, offset {}",
            self.fragment, self.line, self.offset
        )
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenize a string, collecting tokens with their byte spans.
pub fn tokenize_with_spans(source: &str) -> Result<Vec<(Token, Range<usize>)>, TokenizeError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(TokenizeError::at(source, lexer.span())),
        }
    }

    Ok(tokens)
}

/// Tokenize a string, discarding spans.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    tokenize_with_spans(source).map(|pairs| pairs.into_iter().map(|(t, _)| t).collect())
}
