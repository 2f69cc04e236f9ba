//! Command-line interface for daxplan
//!
//! This binary runs the plan-parsing pipeline over a file and prints the
//! result at the chosen stage.
//!
//! Usage:
//!   daxplan parse `<path>` [--format `<format>`]  - Parse a plan file
//!   daxplan formats                             - List available formats

use clap::{Arg, Command};

use daxplan::processor::{self, ProcessingError, ProcessingSpec};

fn main() {
    let matches = Command::new("daxplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting DAX query plan dumps")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a plan file and print the result")
                .arg(
                    Arg::new("path")
                        .help("Path to the plan file (plain text or JSON container)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see `daxplan formats`)")
                        .default_value("tree"),
                ),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            handle_parse_command(path, format);
        }
        Some(("formats", _)) => {
            handle_formats_command();
        }
        _ => unreachable!(),
    }
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str) {
    let result = ProcessingSpec::from_name(format)
        .ok_or_else(|| ProcessingError::InvalidFormat(format.to_string()))
        .and_then(|spec| processor::process_file(path, &spec));

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the formats command
fn handle_formats_command() {
    for spec in ProcessingSpec::standard_specs() {
        println!("{:<12} {}", spec.name(), spec.description());
    }
}
