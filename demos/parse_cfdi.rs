//! Parse a CFDI file and print its projection as JSON.
//!
//! ```sh
//! RUST_LOG=cfdi=debug cargo run --example parse_cfdi -- factura.xml
//! ```

use std::process::ExitCode;

use cfdi::looks_like_cfdi;
use cfdi::parser::parse_cfdi;
use cfdi::projection::to_projection;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: parse_cfdi <file.xml>");
        return ExitCode::from(2);
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !looks_like_cfdi(&bytes) {
        tracing::warn!(%path, "file does not look like a CFDI, parsing anyway");
    }

    let invoice = parse_cfdi(&bytes);
    for err in &invoice.parse_errors {
        eprintln!("{path}: {err}");
    }

    let projection = to_projection(&invoice);
    match serde_json::to_string_pretty(&projection) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    }

    if invoice.parse_success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
