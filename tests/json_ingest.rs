//! JSON container ingestion at the boundary
//!
//! The container form must be exactly equivalent to feeding its unwrapped
//! plain-text form: same rows, same order, physical section first.

use daxplan::ingest::{prepare_source, unwrap_container};
use daxplan::{parse_input, parse_plan, OpType};

const CONTAINER: &str = r#"{
    "PhysicalQueryPlanRows": [
        {"IndentedOperation": "AddColumns: IterPhyOp LogOp=SelectColumns IterCols(0)(''[Color])"},
        {"IndentedOperation": "    Scan: IterPhyOp LogOp=Scan_Vertipaq IterCols(0)('Product'[Color]) #Records=16"}
    ],
    "LogicalQueryPlanRows": [
        {"IndentedOperation": "Order: RelLogOp 2-11"},
        {"IndentedOperation": "    Scan_Vertipaq: RelLogOp DependOnCols()() 3-3"}
    ]
}"#;

#[test]
fn unwrap_idempotence() {
    // Feeding the unwrapped text and feeding the JSON form directly must
    // yield identical row lists.
    let unwrapped = unwrap_container(CONTAINER).unwrap();
    let from_text = parse_plan(&unwrapped).unwrap();
    let from_json = parse_input(CONTAINER).unwrap();
    assert_eq!(from_text, from_json);

    // And unwrapping is a no-op on already-plain text.
    assert_eq!(prepare_source(&unwrapped), unwrapped);
    assert_eq!(parse_input(&unwrapped).unwrap(), from_json);
}

#[test]
fn physical_rows_precede_logical_rows() {
    let rows = parse_input(CONTAINER).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows.iter().map(|r| r.op_type).collect::<Vec<_>>(),
        vec![
            OpType::IterPhyOp,
            OpType::IterPhyOp,
            OpType::RelLogOp,
            OpType::RelLogOp,
        ]
    );
    assert_eq!(
        rows.iter().map(|r| r.indent).collect::<Vec<_>>(),
        vec![0, 4, 0, 4]
    );
}

#[test]
fn container_with_empty_physical_section() {
    let json = r#"{
        "PhysicalQueryPlanRows": [],
        "LogicalQueryPlanRows": [{"IndentedOperation": "Order: RelLogOp 2-11"}]
    }"#;
    let rows = parse_input(json).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].op_type, OpType::RelLogOp);
}
