//! `json-lazy`: read or edit a path in a JSON document.
//!
//! Usage:
//!   json-lazy [--pretty] get <path>
//!   json-lazy [--pretty] set <path> <json>
//!   json-lazy [--pretty] del <path>
//!   json-lazy keys <path>
//!
//! The document is read from stdin. Set `RUST_LOG=lazy_json=debug` to see
//! rejected paths and discarded writes on stderr.

use lazy_json::cli::{parse_args, run};
use std::io::{self, Read, Write};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, options) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run(&buf, &command, &options) {
        Ok(result) => {
            let mut out = io::stdout().lock();
            if out.write_all(result.as_bytes()).and_then(|_| out.write_all(b"\n")).is_err() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
