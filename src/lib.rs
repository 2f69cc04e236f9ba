//! # daxplan
//!
//! A parser for DAX query plan dumps: the indentation-nested operator
//! listings produced by the VertiPaq/Formula engines (and surfaced by tools
//! like DAX Studio), either as plain text or wrapped in their JSON export
//! container.
//!
//! The pipeline is tokenize -> parse -> reconstruct:
//!
//! - [`lexer`] turns plan text into tokens (whitespace and newlines are
//!   significant),
//! - [`parser`] reduces each line to a typed [`ast::PlanRow`],
//! - [`hierarchy`] derives parent/child edges from the rows' indents.
//!
//! The whole pipeline is a pure function from text to rows or a failure:
//! all-or-nothing, no partial results, no shared state between calls.
//!
//! ```text
//! AddColumns: IterPhyOp LogOp=SelectColumns IterCols(0)(''[Color])
//!     Scan: IterPhyOp LogOp=Scan_Vertipaq IterCols(0)('Product'[Color]) #Records=16
//! ```
//!
//! parses to two rows (`indent` 0 and 4) and one edge `0 -> 1`.

pub mod ast;
pub mod hierarchy;
pub mod ingest;
pub mod lexer;
pub mod parser;
pub mod processor;
pub mod treeviz;

pub use ast::{Attribute, ColumnList, ColumnRef, DataType, OpType, Operator, PlanRow, Value};
pub use hierarchy::{reconstruct, roots, Edge};
pub use parser::{parse_input, parse_plan, PlanError};
