//! Token definitions for plan text
//!
//! All tokens are defined with the logos derive macro. Reserved words
//! (operator-type keywords, data-type keywords, hash-prefixed attribute
//! keys) carry explicit priorities above the generic identifier pattern so
//! they are never misclassified as plain identifiers, and every specific
//! pattern outranks the free-text fallback on equal-length matches.
//!
//! Tokens that the grammar needs the text of carry their payload directly.
//! Numeric tokens carry raw lexemes rather than parsed numbers: conversion
//! happens in the grammar, which keeps this type `Eq + Hash` for the parser
//! error machinery and turns numeric overflow into a line-scoped parse
//! error instead of a lexer failure.

use logos::Logos;
use std::fmt;

use crate::ast::{DataType, OpType};

/// The key of a hash-prefixed count attribute (`#Records=…`, `#KeyCols=…`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HashKey {
    Records,
    KeyCols,
    ValueCols,
    FieldCols,
}

impl HashKey {
    /// Map the keyword after the `#` to its variant.
    pub fn from_keyword(s: &str) -> Option<HashKey> {
        match s {
            "Records" => Some(HashKey::Records),
            "KeyCols" => Some(HashKey::KeyCols),
            "ValueCols" => Some(HashKey::ValueCols),
            "FieldCols" => Some(HashKey::FieldCols),
            _ => None,
        }
    }

    /// The source keyword, without the `#` prefix.
    pub fn as_keyword(&self) -> &'static str {
        match self {
            HashKey::Records => "Records",
            HashKey::KeyCols => "KeyCols",
            HashKey::ValueCols => "ValueCols",
            HashKey::FieldCols => "FieldCols",
        }
    }
}

/// All possible tokens in plan text
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Token {
    /// Run of spaces and tabs; the payload is its character length (one
    /// unit per character, tabs not expanded).
    #[regex(r"[ \t]+", |lex| lex.slice().len(), priority = 3)]
    Whitespace(usize),

    #[regex(r"\r?\n", priority = 3)]
    Newline,

    /// Operator-type keyword (`IterPhyOp`, `RelLogOp`, …).
    #[regex(r"RelLogOp|ScaLogOp|IterPhyOp|LookupPhyOp|SpoolPhyOp",
        |lex| OpType::from_keyword(lex.slice()), priority = 9)]
    OpKind(OpType),

    /// Data-type keyword (`String`, `Currency`, …).
    #[regex(r"Boolean|Currency|Integer|Double|String|DateTime",
        |lex| DataType::from_keyword(lex.slice()), priority = 8)]
    DataTypeKw(DataType),

    /// Hash-prefixed attribute key (`#Records`, `#KeyCols`, …).
    #[regex(r"#(Records|KeyCols|ValueCols|FieldCols)",
        |lex| HashKey::from_keyword(&lex.slice()[1..]), priority = 7)]
    HashAttr(HashKey),

    /// `N-M` line-range pattern; raw lexeme.
    #[regex(r"[0-9]+-[0-9]+", |lex| lex.slice().to_owned(), priority = 6)]
    LineRange(String),

    /// Float literal; raw lexeme.
    #[regex(r"[0-9]*\.[0-9]+", |lex| lex.slice().to_owned(), priority = 5)]
    Float(String),

    /// Integer literal; raw lexeme.
    #[regex(r"[0-9]+", |lex| lex.slice().to_owned(), priority = 4)]
    Integer(String),

    /// Single-quoted string (a table name); payload has the quotes
    /// stripped, inner escapes left as written.
    #[regex(r"'(?:\\['\\]|[^\n'\\])*'",
        |lex| { let s = lex.slice(); s[1..s.len() - 1].to_owned() }, priority = 3)]
    Quoted(String),

    /// Bracketed value (a column or measure name); payload has the
    /// brackets stripped.
    #[regex(r"\[[^\]\n]*\]",
        |lex| { let s = lex.slice(); s[1..s.len() - 1].to_owned() })]
    Bracketed(String),

    /// Bare identifier; may contain underscores and interior hyphens.
    #[regex(r"[A-Za-z_][A-Za-z0-9_-]*", |lex| lex.slice().to_owned(), priority = 2)]
    Ident(String),

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("=")]
    Equals,

    #[token("-")]
    Hyphen,

    #[token("<")]
    LeftAngle,

    #[token(">")]
    RightAngle,

    /// Free-text fallback: any run not containing whitespace or structural
    /// punctuation. Must not start with a digit or hyphen, so numeric and
    /// hyphen tokens keep winning at those positions (`0 - 1` stays three
    /// tokens). Lowest priority; only wins where nothing specific does.
    #[regex(r"[^ \t\r\n()=\[\],<>:0-9-][^ \t\r\n()=\[\],<>:]*",
        |lex| lex.slice().to_owned(), priority = 1)]
    Text(String),
}

impl Token {
    /// Check if this token is a whitespace run (not a newline).
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }

    /// Check if this token terminates a line.
    pub fn is_newline(&self) -> bool {
        matches!(self, Token::Newline)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace(len) => write!(f, "whitespace({})", len),
            Token::Newline => write!(f, "newline"),
            Token::OpKind(ty) => write!(f, "{}", ty),
            Token::DataTypeKw(dt) => write!(f, "{}", dt),
            Token::HashAttr(key) => write!(f, "#{}", key.as_keyword()),
            Token::LineRange(raw) => write!(f, "{}", raw),
            Token::Float(raw) => write!(f, "{}", raw),
            Token::Integer(raw) => write!(f, "{}", raw),
            Token::Quoted(s) => write!(f, "'{}'", s),
            Token::Bracketed(s) => write!(f, "[{}]", s),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Equals => write!(f, "="),
            Token::Hyphen => write!(f, "-"),
            Token::LeftAngle => write!(f, "<"),
            Token::RightAngle => write!(f, ">"),
            Token::Text(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DataType, OpType};

    fn lex_all(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|r| r.expect("unexpected lex error")).collect()
    }

    #[test]
    fn test_reserved_words_beat_identifiers() {
        assert_eq!(lex_all("IterPhyOp"), vec![Token::OpKind(OpType::IterPhyOp)]);
        assert_eq!(lex_all("SpoolPhyOp"), vec![Token::OpKind(OpType::SpoolPhyOp)]);
        assert_eq!(lex_all("String"), vec![Token::DataTypeKw(DataType::String)]);
        assert_eq!(lex_all("DateTime"), vec![Token::DataTypeKw(DataType::DateTime)]);
        assert_eq!(lex_all("#Records"), vec![Token::HashAttr(HashKey::Records)]);
    }

    #[test]
    fn test_longer_identifier_is_not_a_keyword() {
        assert_eq!(lex_all("IterPhyOpX"), vec![Token::Ident("IterPhyOpX".into())]);
        assert_eq!(lex_all("Strings"), vec![Token::Ident("Strings".into())]);
    }

    #[test]
    fn test_whitespace_run_length() {
        assert_eq!(lex_all("    "), vec![Token::Whitespace(4)]);
        // Tabs count one unit each, not expanded.
        assert_eq!(lex_all("  \t "), vec![Token::Whitespace(4)]);
    }

    #[test]
    fn test_numeric_tokens() {
        assert_eq!(lex_all("16"), vec![Token::Integer("16".into())]);
        assert_eq!(lex_all("1.5"), vec![Token::Float("1.5".into())]);
        assert_eq!(lex_all(".5"), vec![Token::Float(".5".into())]);
        assert_eq!(lex_all("2-11"), vec![Token::LineRange("2-11".into())]);
    }

    #[test]
    fn test_quoted_and_bracketed_strip_delimiters() {
        assert_eq!(lex_all("'Product'"), vec![Token::Quoted("Product".into())]);
        assert_eq!(lex_all("''"), vec![Token::Quoted("".into())]);
        assert_eq!(lex_all("[Color]"), vec![Token::Bracketed("Color".into())]);
        assert_eq!(lex_all("[]"), vec![Token::Bracketed("".into())]);
    }

    #[test]
    fn test_column_ref_token_pair() {
        assert_eq!(
            lex_all("'Product'[Color]"),
            vec![Token::Quoted("Product".into()), Token::Bracketed("Color".into())]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lex_all(":,()=-<>"),
            vec![
                Token::Colon,
                Token::Comma,
                Token::OpenParen,
                Token::CloseParen,
                Token::Equals,
                Token::Hyphen,
                Token::LeftAngle,
                Token::RightAngle,
            ]
        );
    }

    #[test]
    fn test_free_text_fallback() {
        assert_eq!(lex_all("$RowIndex.0"), vec![Token::Text("$RowIndex.0".into())]);
        // A colon always breaks a text run.
        assert_eq!(
            lex_all("a.b:"),
            vec![Token::Text("a.b".into()), Token::Colon]
        );
    }

    #[test]
    fn test_free_text_never_starts_with_digit_or_hyphen() {
        assert_eq!(
            lex_all("-5"),
            vec![Token::Hyphen, Token::Integer("5".into())]
        );
        assert_eq!(
            lex_all("0 - 1"),
            vec![
                Token::Integer("0".into()),
                Token::Whitespace(1),
                Token::Hyphen,
                Token::Whitespace(1),
                Token::Integer("1".into()),
            ]
        );
        assert_eq!(
            lex_all("2x"),
            vec![Token::Integer("2".into()), Token::Ident("x".into())]
        );
    }

    #[test]
    fn test_identifier_with_underscore_and_hyphen() {
        assert_eq!(lex_all("Scan_Vertipaq"), vec![Token::Ident("Scan_Vertipaq".into())]);
        assert_eq!(lex_all("a-b"), vec![Token::Ident("a-b".into())]);
    }

    #[test]
    fn test_newline_forms() {
        assert_eq!(lex_all("a\nb"), vec![
            Token::Ident("a".into()),
            Token::Newline,
            Token::Ident("b".into()),
        ]);
        assert_eq!(lex_all("a\r\nb"), vec![
            Token::Ident("a".into()),
            Token::Newline,
            Token::Ident("b".into()),
        ]);
    }

    #[test]
    fn test_operator_line_shape() {
        assert_eq!(
            lex_all("Scan: IterPhyOp #Records=16"),
            vec![
                Token::Ident("Scan".into()),
                Token::Colon,
                Token::Whitespace(1),
                Token::OpKind(OpType::IterPhyOp),
                Token::Whitespace(1),
                Token::HashAttr(HashKey::Records),
                Token::Equals,
                Token::Integer("16".into()),
            ]
        );
    }
}
