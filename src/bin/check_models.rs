//! Model bundle inspection utility.
//!
//! Reports, for each artifact the model strategy needs, whether the file
//! exists, its size and SHA-256, and whether it loads:
//! - model.json
//! - scaler.json
//! - label_encoders.json
//! - feature_names.json
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin check_models -- [--dir <path>] [--json]
//! ```
//!
//! Exits 0 when every artifact loads, 1 otherwise.

use std::path::PathBuf;

use diabetescare::adapters::model::TrainedModelBundle;

const USAGE: &str = "Usage: check_models [--dir <path>] [--json]";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let mut dir = PathBuf::from("models");
    let mut as_json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dir" => {
                let p = args.next().unwrap_or_default();
                if p.is_empty() {
                    eprintln!("{USAGE}");
                    std::process::exit(2);
                }
                dir = PathBuf::from(p);
            }
            "--json" => as_json = true,
            "-h" | "--help" => {
                println!(
                    "{USAGE}\n\nChecks the model artifacts in <path> (default: models).\n\
                     The bundle shipped in models/ holds hand-set demonstration weights,\n\
                     not a trained screening model. Replace it before relying on\n\
                     /api/predict/model output."
                );
                return Ok(());
            }
            _ => {
                eprintln!("Unknown arg: {arg}\n{USAGE}");
                std::process::exit(2);
            }
        }
    }

    let bundle = TrainedModelBundle::load(&dir);
    let complete = bundle.status().is_complete();

    if as_json {
        println!("{}", serde_json::to_string_pretty(bundle.reports())?);
    } else {
        println!("Model directory: {}", dir.display());
        for report in bundle.reports() {
            let mark = if report.loaded { "OK  " } else { "FAIL" };
            match (report.size_bytes, report.sha256.as_deref()) {
                (Some(size), Some(sha)) => println!(
                    "[{mark}] {:<22} {:>8} bytes  sha256={sha}",
                    report.file_name, size
                ),
                _ => println!("[{mark}] {:<22} missing", report.file_name),
            }
            if let Some(err) = &report.error {
                println!("       {err}");
            }
        }
        println!(
            "{}",
            if complete {
                "All model artifacts loaded."
            } else {
                "Model bundle incomplete: the model strategy will be unavailable."
            }
        );
    }

    if !complete {
        std::process::exit(1);
    }
    Ok(())
}
