//! Processing pipeline orchestration
//!
//! Small driver used by the CLI: pick a pipeline stage (token stream,
//! parsed rows, reconstructed tree) and an output format (plain text or
//! JSON), run the pipeline over a source string or file, and render the
//! result. The parsing semantics all live in the library modules; this is
//! presentation plumbing only.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::hierarchy;
use crate::ingest;
use crate::lexer;
use crate::parser::{self, PlanError};
use crate::treeviz;

/// How far to run the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Stop after tokenization.
    Tokens,
    /// Stop after parsing to typed rows.
    Rows,
    /// Parse and reconstruct the operator forest.
    Tree,
}

/// How to render the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A stage/format pair, named for CLI selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Look up a spec by its CLI name.
    pub fn from_name(name: &str) -> Option<ProcessingSpec> {
        Self::standard_specs()
            .into_iter()
            .find(|spec| spec.name() == name)
    }

    /// The CLI name of this spec.
    pub fn name(&self) -> &'static str {
        match (self.stage, self.format) {
            (ProcessingStage::Tokens, OutputFormat::Text) => "tokens",
            (ProcessingStage::Tokens, OutputFormat::Json) => "tokens-json",
            (ProcessingStage::Rows, OutputFormat::Text) => "rows",
            (ProcessingStage::Rows, OutputFormat::Json) => "rows-json",
            (ProcessingStage::Tree, OutputFormat::Text) => "tree",
            (ProcessingStage::Tree, OutputFormat::Json) => "graph-json",
        }
    }

    /// One-line description for the format listing.
    pub fn description(&self) -> &'static str {
        match (self.stage, self.format) {
            (ProcessingStage::Tokens, OutputFormat::Text) => "one token per line, with byte spans",
            (ProcessingStage::Tokens, OutputFormat::Json) => "token/span pairs as JSON",
            (ProcessingStage::Rows, OutputFormat::Text) => "parsed rows, printed back as plan lines",
            (ProcessingStage::Rows, OutputFormat::Json) => "parsed rows as JSON",
            (ProcessingStage::Tree, OutputFormat::Text) => "operator forest with tree connectors",
            (ProcessingStage::Tree, OutputFormat::Json) => "rows plus parent/child edges as JSON",
        }
    }

    /// All selectable stage/format pairs.
    pub fn standard_specs() -> Vec<ProcessingSpec> {
        let mut specs = Vec::new();
        for stage in [
            ProcessingStage::Tokens,
            ProcessingStage::Rows,
            ProcessingStage::Tree,
        ] {
            for format in [OutputFormat::Text, OutputFormat::Json] {
                specs.push(ProcessingSpec { stage, format });
            }
        }
        specs
    }
}

/// Errors that can occur during processing
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    Io(String),
    InvalidFormat(String),
    Plan(PlanError),
    Render(String),
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::Io(msg) => write!(f, "IO error: {}", msg),
            ProcessingError::InvalidFormat(name) => write!(f, "unknown format: {}", name),
            ProcessingError::Plan(err) => write!(f, "{}", err),
            ProcessingError::Render(msg) => write!(f, "render error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessingError {}

impl From<PlanError> for ProcessingError {
    fn from(err: PlanError) -> ProcessingError {
        ProcessingError::Plan(err)
    }
}

/// Run the pipeline over a source string and render the result.
pub fn process_source(input: &str, spec: &ProcessingSpec) -> Result<String, ProcessingError> {
    let text = ingest::prepare_source(input);

    match spec.stage {
        ProcessingStage::Tokens => {
            let padded = lexer::ensure_source_ends_with_newline(&text);
            let tokens = lexer::tokenize_with_spans(&padded).map_err(PlanError::from)?;
            match spec.format {
                OutputFormat::Text => Ok(tokens
                    .iter()
                    .map(|(token, span)| format!("{:?} @ {}..{}", token, span.start, span.end))
                    .collect::<Vec<_>>()
                    .join("\n")),
                OutputFormat::Json => to_json(&tokens),
            }
        }
        ProcessingStage::Rows => {
            let rows = parser::parse_plan(&text)?;
            match spec.format {
                OutputFormat::Text => Ok(rows
                    .iter()
                    .map(|row| row.to_string())
                    .collect::<Vec<_>>()
                    .join("\n")),
                OutputFormat::Json => to_json(&rows),
            }
        }
        ProcessingStage::Tree => {
            let rows = parser::parse_plan(&text)?;
            let edges = hierarchy::reconstruct(&rows);
            match spec.format {
                OutputFormat::Text => Ok(treeviz::to_treeviz_str(&rows, &edges)),
                OutputFormat::Json => to_json(&serde_json::json!({
                    "rows": rows,
                    "edges": edges,
                })),
            }
        }
    }
}

/// Run the pipeline over a file.
pub fn process_file<P: AsRef<Path>>(
    path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    let content =
        fs::read_to_string(path.as_ref()).map_err(|e| ProcessingError::Io(e.to_string()))?;
    process_source(&content, spec)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ProcessingError> {
    serde_json::to_string_pretty(value).map_err(|e| ProcessingError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_names_round_trip() {
        for spec in ProcessingSpec::standard_specs() {
            assert_eq!(ProcessingSpec::from_name(spec.name()), Some(spec));
        }
        assert_eq!(ProcessingSpec::from_name("yaml"), None);
    }

    #[test]
    fn test_rows_text_round_trips_canonical_lines() {
        let source = "AddColumns: IterPhyOp LogOp=SelectColumns\n    Scan: IterPhyOp #Records=16\n";
        let spec = ProcessingSpec {
            stage: ProcessingStage::Rows,
            format: OutputFormat::Text,
        };
        assert_eq!(
            process_source(source, &spec).unwrap(),
            "AddColumns: IterPhyOp LogOp=SelectColumns\n    Scan: IterPhyOp #Records=16"
        );
    }

    #[test]
    fn test_tree_text_renders_forest() {
        let spec = ProcessingSpec {
            stage: ProcessingStage::Tree,
            format: OutputFormat::Text,
        };
        let out = process_source("A: RelLogOp 1-1\n    B: RelLogOp 2-2\n", &spec).unwrap();
        assert_eq!(out, "└─ RelLogOp: A\n  └─ RelLogOp: B\n");
    }

    #[test]
    fn test_graph_json_contains_rows_and_edges() {
        let spec = ProcessingSpec {
            stage: ProcessingStage::Tree,
            format: OutputFormat::Json,
        };
        let out = process_source("A: RelLogOp 1-1\n    B: RelLogOp 2-2\n", &spec).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["parent"], 0);
        assert_eq!(value["edges"][0]["child"], 1);
    }

    #[test]
    fn test_plan_errors_propagate() {
        let spec = ProcessingSpec {
            stage: ProcessingStage::Rows,
            format: OutputFormat::Text,
        };
        let err = process_source("not a plan", &spec).unwrap_err();
        assert!(matches!(err, ProcessingError::Plan(_)));
    }
}
