//! Parser for plan text
//!
//! The grammar itself lives in [`grammar`] (one chumsky combinator per
//! production); [`api`] drives it over a whole document and owns the error
//! type. The parse is a pure function from text to a row list or a
//! failure; nothing here knows about rendering or persistence.

pub mod api;
pub(crate) mod grammar;

pub use api::{parse_input, parse_plan, PlanError};
