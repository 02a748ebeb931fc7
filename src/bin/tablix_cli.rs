//! CLI tool for tablix - lays out a JSON layout document and outputs the report
//!
//! Usage:
//!   tablix_cli <document.json>              # Output JSON to stdout
//!   tablix_cli <document.json> -o out.json  # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use tablix::document::{compute_layout, LayoutDocument};
use tracing_subscriber::EnvFilter;

fn main() {
    // Layout logging goes to stderr, e.g. RUST_LOG=tablix=trace
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: tablix_cli <document.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Parse document
    let document = match LayoutDocument::from_json(&data) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error parsing document: {}", e);
            std::process::exit(1);
        }
    };

    // Lay out
    let report = match compute_layout(document) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error computing layout: {}", e);
            std::process::exit(1);
        }
    };
    if !report.outcome.converged {
        eprintln!(
            "Warning: layout did not converge after {} iterations",
            report.outcome.iterations
        );
    }

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
