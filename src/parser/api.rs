//! Document driver and public parse API
//!
//! [`parse_plan`] runs the whole pipeline for the plain-text surface form:
//! tokenize, split the token stream at newline tokens, measure each line's
//! indent from its leading whitespace run, apply the line grammar to the
//! remaining tokens, and validate the column-list length invariant on each
//! parsed row. The parse is all-or-nothing: the first line that fails
//! aborts the document with an error carrying its 1-based source line
//! number, and no partial row list is ever returned.
//!
//! Every call constructs and discards its own lexer and combinator state;
//! there is no shared or reusable parser object.

use std::fmt;

use crate::ast::PlanRow;
use crate::ingest;
use crate::lexer::tokens::Token;
use crate::lexer::{ensure_source_ends_with_newline, tokenize_with_spans, TokenizeError};
use crate::parser::grammar::{self, ParserError};

/// Errors that can fail a parse call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The input contains a chunk matching no token pattern.
    Tokenize(TokenizeError),
    /// A line does not reduce to the line production.
    Parse { line: usize, message: String },
    /// A column-list attribute whose index and reference lists disagree in
    /// length.
    ColumnArity {
        line: usize,
        attribute: &'static str,
        indices: usize,
        refs: usize,
    },
    /// The input contains no operator lines at all.
    Empty,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Tokenize(err) => write!(f, "{}", err),
            PlanError::Parse { line, message } => write!(f, "line {}: {}", line, message),
            PlanError::ColumnArity {
                line,
                attribute,
                indices,
                refs,
            } => write!(
                f,
                "line {}: {} has {} indices but {} column references",
                line, attribute, indices, refs
            ),
            PlanError::Empty => write!(f, "input contains no operator lines"),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Tokenize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TokenizeError> for PlanError {
    fn from(err: TokenizeError) -> PlanError {
        PlanError::Tokenize(err)
    }
}

/// Parse plain indented plan text into its ordered row list.
///
/// The trailing newline the grammar requires is appended when missing.
/// Blank and whitespace-only lines yield no record. An input with no
/// operator lines at all is [`PlanError::Empty`].
pub fn parse_plan(source: &str) -> Result<Vec<PlanRow>, PlanError> {
    let source = ensure_source_ends_with_newline(source);
    let tokens = tokenize_with_spans(&source)?;

    let mut rows: Vec<PlanRow> = Vec::new();
    let mut line_tokens: Vec<Token> = Vec::new();
    let mut indent = 0usize;
    let mut at_line_start = true;
    let mut source_line = 1usize;

    for (token, _span) in tokens {
        match token {
            Token::Newline => {
                if !line_tokens.is_empty() {
                    let row = parse_line(
                        std::mem::take(&mut line_tokens),
                        indent,
                        source_line,
                        rows.len(),
                    )?;
                    rows.push(row);
                }
                indent = 0;
                at_line_start = true;
                source_line += 1;
            }
            Token::Whitespace(len) => {
                // Leading whitespace is the indent; interior whitespace is
                // separator-only and never reaches the grammar.
                if at_line_start {
                    indent += len;
                }
            }
            other => {
                at_line_start = false;
                line_tokens.push(other);
            }
        }
    }

    if rows.is_empty() {
        return Err(PlanError::Empty);
    }
    Ok(rows)
}

/// Parse either accepted surface form: the JSON container is unwrapped at
/// the boundary when present, otherwise the input is treated as plain
/// indented text.
pub fn parse_input(input: &str) -> Result<Vec<PlanRow>, PlanError> {
    parse_plan(&ingest::prepare_source(input))
}

/// Apply the line grammar to one line's whitespace-free tokens.
fn parse_line(
    line_tokens: Vec<Token>,
    indent: usize,
    source_line: usize,
    ordinal: usize,
) -> Result<PlanRow, PlanError> {
    let (operator, op_type, attributes) = grammar::parse_row_tokens(line_tokens)
        .map_err(|errors| parse_failure(source_line, errors))?;

    let row = PlanRow {
        indent,
        line: ordinal,
        operator,
        op_type,
        attributes,
    };
    validate_column_lists(&row, source_line)?;
    Ok(row)
}

fn parse_failure(source_line: usize, errors: Vec<ParserError>) -> PlanError {
    let message = errors
        .first()
        .map(|err| err.to_string())
        .unwrap_or_else(|| "invalid operator line".to_string());
    PlanError::Parse {
        line: source_line,
        message,
    }
}

/// Check `len(indices) == len(refs)` for every column-list attribute on the
/// row. The grammar parses the two lists independently; this is where the
/// data-model invariant is enforced, immediately after the row parse.
fn validate_column_lists(row: &PlanRow, source_line: usize) -> Result<(), PlanError> {
    for attr in &row.attributes {
        if let Some((attribute, cols)) = attr.as_column_list() {
            if cols.indices.len() != cols.refs.len() {
                return Err(PlanError::ColumnArity {
                    line: source_line,
                    attribute,
                    indices: cols.indices.len(),
                    refs: cols.refs.len(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Attribute, OpType, Operator};

    #[test]
    fn test_parse_plan_counts_and_order() {
        let rows = parse_plan(
            "AddColumns: IterPhyOp LogOp=SelectColumns\n    Scan: IterPhyOp #Records=16\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 0);
        assert_eq!(rows[0].indent, 0);
        assert_eq!(rows[1].line, 1);
        assert_eq!(rows[1].indent, 4);
        assert_eq!(rows[1].operator, Operator::Simple("Scan".into()));
        assert_eq!(rows[1].op_type, OpType::IterPhyOp);
        assert_eq!(rows[1].attributes, vec![Attribute::Records(16)]);
    }

    #[test]
    fn test_missing_trailing_newline_is_tolerated() {
        let rows = parse_plan("Scan: IterPhyOp #Records=1").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_blank_lines_yield_no_records() {
        let rows = parse_plan("\nScan: IterPhyOp 1-1\n\n   \nCache: IterPhyOp 2-2\n\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 0);
        assert_eq!(rows[1].line, 1);
    }

    #[test]
    fn test_tab_and_space_indent_count_one_unit_each() {
        let rows = parse_plan("A: RelLogOp 1-1\n \t  B: RelLogOp 2-2\n").unwrap();
        assert_eq!(rows[1].indent, 4);
    }

    #[test]
    fn test_all_or_nothing_failure() {
        let text = "A: RelLogOp 1-1\nB: RelLogOp 2-2\nC: BogusOp 3-3\nD: RelLogOp 4-4\nE: RelLogOp 5-5\n";
        let err = parse_plan(text).unwrap_err();
        match err {
            PlanError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(parse_plan("").unwrap_err(), PlanError::Empty);
        assert_eq!(parse_plan("\n\n  \n").unwrap_err(), PlanError::Empty);
    }

    #[test]
    fn test_column_arity_mismatch_is_structured() {
        let err = parse_plan("Scan: IterPhyOp DependOnCols(0, 1)('T'[A])\n").unwrap_err();
        assert_eq!(
            err,
            PlanError::ColumnArity {
                line: 1,
                attribute: "DependOnCols",
                indices: 2,
                refs: 1,
            }
        );
    }

    #[test]
    fn test_tokenize_error_carries_offset() {
        // A stray closing bracket matches no token pattern.
        let err = parse_plan("Scan: IterPhyOp ]\n").unwrap_err();
        match err {
            PlanError::Tokenize(err) => assert_eq!(err.offset, 16),
            other => panic!("expected a tokenize error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_input_unwraps_json_container() {
        let json = r#"{"PhysicalQueryPlanRows": [{"IndentedOperation": "Scan: IterPhyOp #Records=1"}], "LogicalQueryPlanRows": []}"#;
        let rows = parse_input(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attributes, vec![Attribute::Records(1)]);
    }
}
