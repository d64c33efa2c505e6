//! # Flexline CLI
//!
//! Usage:
//!   flexline input.json -o layout.json
//!   echo '{ ... }' | flexline
//!   flexline --example > row.json
//!
//! Set `RUST_LOG=flexline=debug` (or `trace`) to follow the layout pass.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_document_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    };
    let input = match input {
        Ok(s) => s,
        Err(e) => {
            eprintln!("✗ Failed to read input: {}", e);
            process::exit(1);
        }
    };

    // Parse output path; stdout when absent
    let output_path = args.windows(2).find(|w| w[0] == "-o").map(|w| w[1].clone());

    let output = match flexline::layout_json(&input) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&output) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("✗ Failed to serialize layout: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("✗ Failed to write {}: {}", path, e);
                process::exit(1);
            }
            eprintln!(
                "✓ Laid out {} items in {} lines, written to {}",
                output.layout.items().count(),
                output.layout.lines.len(),
                path
            );
        }
        None => println!("{}", json),
    }
}

fn example_document_json() -> &'static str {
    r##"{
  "container": {
    "width": 320,
    "attributes": {
      "flex-flow": "row wrap",
      "justify-content": "space-between",
      "align-items": "center"
    }
  },
  "items": {
    "all": { "flex": "1 1 auto", "min-width": 40 },
    "logo": { "flex": "none", "width": 64 },
    "2": { "flex": "2", "max-width": "160px", "order": 1 }
  },
  "children": [
    { "name": "logo", "height": 32, "margin": { "right": 8 } },
    { "height": 20, "intrinsicWidth": 90, "padding": { "left": 4, "right": 4 } },
    { "height": 24, "intrinsicWidth": 120 },
    { "display": "none" },
    { "height": 18, "width": 70, "border": { "left": 1, "right": 1 } }
  ]
}
"##
}
