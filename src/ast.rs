//! Typed data model for parsed query plan lines
//!
//! This module defines the record types the grammar produces: operator
//! shapes, the attribute vocabulary, and the per-line `PlanRow` record.
//! The `Display` implementations reconstruct the canonical textual form of
//! each node, so a parsed row can be printed back as a plan line.

use std::fmt;

/// Structural category of an operator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OpType {
    RelLogOp,
    ScaLogOp,
    IterPhyOp,
    LookupPhyOp,
    SpoolPhyOp,
}

impl OpType {
    /// Map a reserved operator-type keyword to its variant.
    pub fn from_keyword(s: &str) -> Option<OpType> {
        match s {
            "RelLogOp" => Some(OpType::RelLogOp),
            "ScaLogOp" => Some(OpType::ScaLogOp),
            "IterPhyOp" => Some(OpType::IterPhyOp),
            "LookupPhyOp" => Some(OpType::LookupPhyOp),
            "SpoolPhyOp" => Some(OpType::SpoolPhyOp),
            _ => None,
        }
    }

    /// The source keyword for this operator type.
    pub fn as_keyword(&self) -> &'static str {
        match self {
            OpType::RelLogOp => "RelLogOp",
            OpType::ScaLogOp => "ScaLogOp",
            OpType::IterPhyOp => "IterPhyOp",
            OpType::LookupPhyOp => "LookupPhyOp",
            OpType::SpoolPhyOp => "SpoolPhyOp",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_keyword())
    }
}

/// Scalar data type annotation carried by lookup/value operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DataType {
    Boolean,
    Currency,
    Integer,
    Double,
    String,
    DateTime,
}

impl DataType {
    /// Map a reserved data-type keyword to its variant.
    pub fn from_keyword(s: &str) -> Option<DataType> {
        match s {
            "Boolean" => Some(DataType::Boolean),
            "Currency" => Some(DataType::Currency),
            "Integer" => Some(DataType::Integer),
            "Double" => Some(DataType::Double),
            "String" => Some(DataType::String),
            "DateTime" => Some(DataType::DateTime),
            _ => None,
        }
    }

    /// The source keyword for this data type.
    pub fn as_keyword(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Currency => "Currency",
            DataType::Integer => "Integer",
            DataType::Double => "Double",
            DataType::String => "String",
            DataType::DateTime => "DateTime",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_keyword())
    }
}

/// A `'table'[column]` reference.
///
/// Either part may be empty: fused projections reference unnamed columns as
/// `''[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> ColumnRef {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'[{}]", self.table, self.column)
    }
}

/// The operator naming a plan line.
///
/// `Complex` models generic-like names such as `Spool_Iterator<SpoolIterator>`
/// and nests arbitrarily (`ProjectionSpool<ProjectFusion<>>`); the parameter
/// may be another `Complex`, a `ColumnRef`, or a plain name, or absent.
/// `FreeText` is the fallback for names that are neither identifiers nor
/// column references.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Operator {
    Simple(String),
    Complex {
        name: String,
        param: Option<Box<Operator>>,
    },
    ColumnRef(ColumnRef),
    FreeText(String),
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Simple(name) => write!(f, "{}", name),
            Operator::Complex { name, param } => match param {
                Some(param) => write!(f, "{}<{}>", name, param),
                None => write!(f, "{}<>", name),
            },
            Operator::ColumnRef(col) => write!(f, "{}", col),
            Operator::FreeText(text) => write!(f, "{}", text),
        }
    }
}

/// A value on the right-hand side of `LogOp=`.
///
/// `Blank` is the recognized sentinel for the literal `BLANK`. It is a
/// distinct variant so consumers can match on it; it is never stored as the
/// string `"BLANK"`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Operator(Operator),
    ColumnRef(ColumnRef),
    Ident(String),
    Number(f64),
    Text(String),
    Blank,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Operator(op) => write!(f, "{}", op),
            Value::ColumnRef(col) => write!(f, "{}", col),
            Value::Ident(name) => write!(f, "{}", name),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(text) => write!(f, "{}", text),
            Value::Blank => write!(f, "BLANK"),
        }
    }
}

/// Parallel index/reference lists carried by the column-list attributes
/// (`DependOnCols(0, 1)('T'[A], 'U'[B])`).
///
/// Either list may be empty. `indices.len() == refs.len()` is a data-model
/// invariant checked by the document driver after each row parse, not by the
/// grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnList {
    pub indices: Vec<i64>,
    pub refs: Vec<ColumnRef>,
}

impl fmt::Display for ColumnList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, idx) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", idx)?;
        }
        write!(f, ")(")?;
        for (i, col) in self.refs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, ")")
    }
}

/// A typed, keyworded annotation attached to an operator line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Attribute {
    DependOnCols(ColumnList),
    RequiredCols(ColumnList),
    LookupCols(ColumnList),
    IterCols(ColumnList),
    LineRange { start: i64, end: i64 },
    MeasureRef(String),
    DominantValue(String),
    LogOp(Value),
    Records(i64),
    KeyCols(i64),
    ValueCols(i64),
    FieldCols(i64),
    DataType(DataType),
    IndexRange { start: i64, end: i64 },
    ColumnRef(ColumnRef),
    NumericLiteral(f64),
    VarName(String),
    RefVarName(String),
}

impl Attribute {
    /// The column-list payload and its keyword, for the four parallel-list
    /// attribute kinds; `None` for everything else.
    pub fn as_column_list(&self) -> Option<(&'static str, &ColumnList)> {
        match self {
            Attribute::DependOnCols(cols) => Some(("DependOnCols", cols)),
            Attribute::RequiredCols(cols) => Some(("RequiredCols", cols)),
            Attribute::LookupCols(cols) => Some(("LookupCols", cols)),
            Attribute::IterCols(cols) => Some(("IterCols", cols)),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::DependOnCols(cols) => write!(f, "DependOnCols{}", cols),
            Attribute::RequiredCols(cols) => write!(f, "RequiredCols{}", cols),
            Attribute::LookupCols(cols) => write!(f, "LookupCols{}", cols),
            Attribute::IterCols(cols) => write!(f, "IterCols{}", cols),
            Attribute::LineRange { start, end } => write!(f, "{}-{}", start, end),
            Attribute::MeasureRef(name) => write!(f, "MeasureRef=[{}]", name),
            Attribute::DominantValue(value) => write!(f, "DominantValue={}", value),
            Attribute::LogOp(value) => write!(f, "LogOp={}", value),
            Attribute::Records(n) => write!(f, "#Records={}", n),
            Attribute::KeyCols(n) => write!(f, "#KeyCols={}", n),
            Attribute::ValueCols(n) => write!(f, "#ValueCols={}", n),
            Attribute::FieldCols(n) => write!(f, "#FieldCols={}", n),
            Attribute::DataType(dt) => write!(f, "{}", dt),
            Attribute::IndexRange { start, end } => write!(f, "{}-{}", start, end),
            Attribute::ColumnRef(col) => write!(f, "{}", col),
            Attribute::NumericLiteral(n) => write!(f, "{}", n),
            Attribute::VarName(name) => write!(f, "VarName={}", name),
            Attribute::RefVarName(name) => write!(f, "RefVarName={}", name),
        }
    }
}

/// One parsed plan line.
///
/// `line` is the record's 0-based ordinal in the parse result; insertion
/// order is source line order, which is the only signal the hierarchy
/// reconstruction has. `indent` counts leading whitespace characters, one
/// unit per character whether space or tab.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlanRow {
    pub indent: usize,
    pub line: usize,
    pub operator: Operator,
    pub op_type: OpType,
    pub attributes: Vec<Attribute>,
}

impl fmt::Display for PlanRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{}: {}",
            "",
            self.operator,
            self.op_type,
            indent = self.indent
        )?;
        for attr in &self.attributes {
            write!(f, " {}", attr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_type_keywords_round_trip() {
        for kw in ["RelLogOp", "ScaLogOp", "IterPhyOp", "LookupPhyOp", "SpoolPhyOp"] {
            let ty = OpType::from_keyword(kw).unwrap();
            assert_eq!(ty.as_keyword(), kw);
        }
        assert_eq!(OpType::from_keyword("IterPhyOps"), None);
    }

    #[test]
    fn test_data_type_keywords_round_trip() {
        for kw in ["Boolean", "Currency", "Integer", "Double", "String", "DateTime"] {
            let dt = DataType::from_keyword(kw).unwrap();
            assert_eq!(dt.as_keyword(), kw);
        }
        assert_eq!(DataType::from_keyword("Float"), None);
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(Operator::Simple("AddColumns".into()).to_string(), "AddColumns");
        assert_eq!(
            Operator::Complex {
                name: "ProjectFusion".into(),
                param: None,
            }
            .to_string(),
            "ProjectFusion<>"
        );
        let nested = Operator::Complex {
            name: "Foo".into(),
            param: Some(Box::new(Operator::Complex {
                name: "Bar".into(),
                param: Some(Box::new(Operator::Simple("Baz".into()))),
            })),
        };
        assert_eq!(nested.to_string(), "Foo<Bar<Baz>>");
        assert_eq!(
            Operator::ColumnRef(ColumnRef::new("Product", "Color")).to_string(),
            "'Product'[Color]"
        );
    }

    #[test]
    fn test_value_display_blank_is_sentinel() {
        assert_eq!(Value::Blank.to_string(), "BLANK");
        // An identifier that happens to be spelled BLANK renders the same but
        // is a different variant.
        assert_ne!(Value::Blank, Value::Ident("BLANK".into()));
    }

    #[test]
    fn test_attribute_display() {
        let cols = ColumnList {
            indices: vec![0, 1],
            refs: vec![ColumnRef::new("T1", "A"), ColumnRef::new("T2", "B")],
        };
        assert_eq!(
            Attribute::DependOnCols(cols).to_string(),
            "DependOnCols(0, 1)('T1'[A], 'T2'[B])"
        );
        assert_eq!(Attribute::Records(16).to_string(), "#Records=16");
        assert_eq!(
            Attribute::LineRange { start: 2, end: 11 }.to_string(),
            "2-11"
        );
        assert_eq!(Attribute::MeasureRef("Total".into()).to_string(), "MeasureRef=[Total]");
        assert_eq!(Attribute::NumericLiteral(16.0).to_string(), "16");
        assert_eq!(Attribute::DataType(DataType::String).to_string(), "String");
    }

    #[test]
    fn test_plan_row_display() {
        let row = PlanRow {
            indent: 4,
            line: 1,
            operator: Operator::Simple("Scan".into()),
            op_type: OpType::IterPhyOp,
            attributes: vec![
                Attribute::LogOp(Value::Ident("Scan_Vertipaq".into())),
                Attribute::Records(16),
            ],
        };
        assert_eq!(
            row.to_string(),
            "    Scan: IterPhyOp LogOp=Scan_Vertipaq #Records=16"
        );
    }

    #[test]
    fn test_as_column_list() {
        let cols = ColumnList::default();
        assert_eq!(
            Attribute::IterCols(cols.clone()).as_column_list(),
            Some(("IterCols", &cols))
        );
        assert_eq!(Attribute::Records(1).as_column_list(), None);
    }
}
