//! Line grammar for plan text using chumsky
//!
//! This module implements the combinator grammar for the body of one plan
//! line:
//!
//! ```text
//! line := operator ':' opType attribute+
//! ```
//!
//! The document driver ([`crate::parser::api`]) measures the indent and
//! discards whitespace separators before handing a line's tokens to
//! [`row`], so the grammar here never sees whitespace or newline tokens.
//!
//! Alternative order is load-bearing. Ordered choice makes the grammar a
//! deterministic PEG: the first alternative that matches wins, which is the
//! documented tie-break for every overlapping production (operators try
//! `Complex` before plain identifiers, attributes try the keyword forms
//! before bare values, `BLANK` is recognized before generic identifiers so
//! it always produces the sentinel variant).

use chumsky::prelude::*;

use crate::ast::{Attribute, ColumnList, ColumnRef, OpType, Operator, Value};
use crate::lexer::tokens::{HashKey, Token};

/// Type alias for parser error
pub(crate) type ParserError = Simple<Token>;

/// The parsed body of one line: operator, operator type, attributes.
pub(crate) type RowBody = (Operator, OpType, Vec<Attribute>);

/// A bare identifier, yielding its name.
fn ident() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::Ident(name) => Ok(name),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// An identifier with a specific spelling (an attribute keyword).
fn keyword(kw: &'static str) -> impl Parser<Token, (), Error = ParserError> + Clone {
    filter_map(move |span, tok| match tok {
        Token::Ident(ref name) if name.as_str() == kw => Ok(()),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// An integer token, converted. Out-of-range literals are parse errors on
/// the offending line, not panics.
fn integer() -> impl Parser<Token, i64, Error = ParserError> + Clone {
    filter_map(|span: std::ops::Range<usize>, tok| match tok {
        Token::Integer(raw) => raw
            .parse::<i64>()
            .map_err(|_| Simple::custom(span, format!("integer literal out of range: {}", raw))),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// An integer token, kept as its raw lexeme.
fn integer_lexeme() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::Integer(raw) => Ok(raw),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// An integer or float token as an IEEE double. The surface form is not
/// preserved past this point.
fn number() -> impl Parser<Token, f64, Error = ParserError> + Clone {
    filter_map(|span: std::ops::Range<usize>, tok| {
        let raw = match tok {
            Token::Integer(raw) | Token::Float(raw) => raw,
            other => return Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
        };
        raw.parse::<f64>()
            .map_err(|_| Simple::custom(span, format!("bad numeric literal: {}", raw)))
    })
}

/// A free-text token, yielding its content.
fn free_text() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::Text(text) => Ok(text),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// A quoted string token (table name), unquoted.
fn quoted() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::Quoted(s) => Ok(s),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// A bracketed value token (column name), brackets stripped.
fn bracketed() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::Bracketed(s) => Ok(s),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// `'table'[column]` — a quoted table name immediately followed by a
/// bracketed column name.
fn column_ref() -> impl Parser<Token, ColumnRef, Error = ParserError> + Clone {
    quoted()
        .then(bracketed())
        .map(|(table, column)| ColumnRef { table, column })
}

/// A generic-like operator name: `Name<…>` with an optional parameter that
/// recurses through the same production, so `Foo<Bar<Baz>>` nests without a
/// depth limit and `ProjectFusion<>` carries no parameter.
fn complex() -> impl Parser<Token, Operator, Error = ParserError> + Clone {
    recursive(|complex| {
        let param = choice((
            complex,
            column_ref().map(Operator::ColumnRef),
            ident().map(Operator::Simple),
        ));

        ident()
            .then(
                param
                    .or_not()
                    .delimited_by(just(Token::LeftAngle), just(Token::RightAngle)),
            )
            .map(|(name, param)| Operator::Complex {
                name,
                param: param.map(Box::new),
            })
    })
}

/// The operator naming a line. Disambiguation order: `Complex`, then bare
/// `ColumnRef`, then free text, then plain identifier.
fn operator() -> impl Parser<Token, Operator, Error = ParserError> + Clone {
    choice((
        complex(),
        column_ref().map(Operator::ColumnRef),
        free_text().map(Operator::FreeText),
        ident().map(Operator::Simple),
    ))
}

/// An operator-type keyword. Anything else here is a hard failure; there is
/// no operator-type inference.
fn op_type() -> impl Parser<Token, OpType, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::OpKind(ty) => Ok(ty),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// `Kw(i, j, …)(ref, ref, …)` — the parallel index/reference lists. Either
/// list may be empty. The two lists are parsed independently; the length
/// invariant is checked by the document driver, not here.
fn column_list(kw: &'static str) -> impl Parser<Token, ColumnList, Error = ParserError> + Clone {
    let indices = integer()
        .separated_by(just(Token::Comma))
        .delimited_by(just(Token::OpenParen), just(Token::CloseParen));
    let refs = column_ref()
        .separated_by(just(Token::Comma))
        .delimited_by(just(Token::OpenParen), just(Token::CloseParen));

    keyword(kw)
        .ignore_then(indices)
        .then(refs)
        .map(|(indices, refs)| ColumnList { indices, refs })
}

/// A `N-M` range that was lexed as a single token.
fn line_range() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    filter_map(|span: std::ops::Range<usize>, tok| match tok {
        Token::LineRange(raw) => {
            let parts = raw
                .split_once('-')
                .and_then(|(a, b)| Some((a.parse::<i64>().ok()?, b.parse::<i64>().ok()?)));
            match parts {
                Some((start, end)) => Ok(Attribute::LineRange { start, end }),
                None => Err(Simple::custom(span, format!("bad line range: {}", raw))),
            }
        }
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// `MeasureRef=[name]`.
fn measure_ref() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    keyword("MeasureRef")
        .ignore_then(just(Token::Equals))
        .ignore_then(bracketed())
        .map(Attribute::MeasureRef)
}

/// `DominantValue=…` — accepts an identifier, an integer, or raw text, and
/// stores the surface form.
fn dominant_value() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    keyword("DominantValue")
        .ignore_then(just(Token::Equals))
        .ignore_then(choice((ident(), integer_lexeme(), free_text())))
        .map(Attribute::DominantValue)
}

/// The right-hand side of `LogOp=`. `BLANK` is tried before the identifier
/// alternative so it always yields the sentinel variant.
fn value() -> impl Parser<Token, Value, Error = ParserError> + Clone {
    choice((
        complex().map(Value::Operator),
        column_ref().map(Value::ColumnRef),
        keyword("BLANK").to(Value::Blank),
        ident().map(Value::Ident),
        number().map(Value::Number),
        free_text().map(Value::Text),
    ))
}

/// `LogOp=value`.
fn log_op() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    keyword("LogOp")
        .ignore_then(just(Token::Equals))
        .ignore_then(value())
        .map(Attribute::LogOp)
}

/// `#Records=n`, `#KeyCols=n`, `#ValueCols=n`, `#FieldCols=n`.
fn hash_attr() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::HashAttr(key) => Ok(key),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
    .then_ignore(just(Token::Equals))
    .then(integer())
    .map(|(key, n)| match key {
        HashKey::Records => Attribute::Records(n),
        HashKey::KeyCols => Attribute::KeyCols(n),
        HashKey::ValueCols => Attribute::ValueCols(n),
        HashKey::FieldCols => Attribute::FieldCols(n),
    })
}

/// A bare data-type keyword.
fn data_type() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    filter_map(|span, tok| match tok {
        Token::DataTypeKw(dt) => Ok(Attribute::DataType(dt)),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

/// `N-M` assembled from separate integer and hyphen tokens (a key range;
/// the single-token form is [`line_range`]).
fn index_range() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    integer()
        .then_ignore(just(Token::Hyphen))
        .then(integer())
        .map(|(start, end)| Attribute::IndexRange { start, end })
}

/// `VarName=ident`.
fn var_name() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    keyword("VarName")
        .ignore_then(just(Token::Equals))
        .ignore_then(ident())
        .map(Attribute::VarName)
}

/// `RefVarName=ident`.
fn ref_var_name() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    keyword("RefVarName")
        .ignore_then(just(Token::Equals))
        .ignore_then(ident())
        .map(Attribute::RefVarName)
}

/// One attribute. Each alternative self-identifies by its leading
/// keyword/token shape; the order is the documented tie-break.
fn attribute() -> impl Parser<Token, Attribute, Error = ParserError> + Clone {
    choice((
        column_list("DependOnCols").map(Attribute::DependOnCols),
        column_list("RequiredCols").map(Attribute::RequiredCols),
        line_range(),
        measure_ref(),
        dominant_value(),
        log_op(),
        hash_attr(),
        data_type(),
        column_list("LookupCols").map(Attribute::LookupCols),
        column_list("IterCols").map(Attribute::IterCols),
        index_range(),
        column_ref().map(Attribute::ColumnRef),
        number().map(Attribute::NumericLiteral),
        var_name(),
        ref_var_name(),
    ))
}

/// The body of one line: `operator ':' opType attribute+`, consuming the
/// whole token list. Zero-attribute lines are invalid.
fn row() -> impl Parser<Token, RowBody, Error = ParserError> {
    operator()
        .then_ignore(just(Token::Colon))
        .then(op_type())
        .then(attribute().repeated().at_least(1))
        .then_ignore(end())
        .map(|((operator, op_type), attributes)| (operator, op_type, attributes))
}

/// Run the line grammar over one line's whitespace-free tokens. Spans in
/// the returned errors are token indices within the line.
pub(crate) fn parse_row_tokens(tokens: Vec<Token>) -> Result<RowBody, Vec<ParserError>> {
    let len = tokens.len();
    let stream = chumsky::Stream::from_iter(
        len..len + 1,
        tokens.into_iter().enumerate().map(|(i, tok)| (tok, i..i + 1)),
    );
    row().parse(stream)
}
