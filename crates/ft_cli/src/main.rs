//! `ft` — offline, deterministic funding-vote tally.
//!
//! Flow: parse args → load input → (validate-only short-circuit) → run the
//! pipeline → write result.json canonically → optional report rendering.
//! Exit codes are stable so harnesses can branch on them.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad input: JSON shape, slate/funding configuration, CLI flags.
    pub const VALIDATION: i32 = 2;
    /// Internal invariant breach (engine defect, never bad input).
    pub const INVARIANT: i32 = 3;
    /// Filesystem and rendering failures.
    pub const IO: i32 = 4;
}

use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};

use ft_io::canonical_json;
use ft_io::loader;
use ft_pipeline::{run_tally, TallyError, TallyOutcome};
use ft_report::{build_model, render_json, render_text};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Invariant(String),
    Io(String),
    Render(String),
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("ft: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    let rc = if args.validate_only {
        match validate_only(&args) {
            Ok(()) => exitcodes::OK,
            Err(e) => report_and_map(&e),
        }
    } else {
        match run_once(&args) {
            Ok(()) => exitcodes::OK,
            Err(e) => report_and_map(&e),
        }
    };

    ExitCode::from(rc as u8)
}

fn report_and_map(e: &MainError) -> i32 {
    let (label, msg, code) = match e {
        MainError::Validation(m) => ("validation", m, exitcodes::VALIDATION),
        MainError::Invariant(m) => ("invariant", m, exitcodes::INVARIANT),
        MainError::Io(m) => ("io", m, exitcodes::IO),
        MainError::Render(m) => ("render", m, exitcodes::IO),
    };
    eprintln!("ft: {label}: {msg}");
    code
}

fn map_io_err(e: ft_io::IoError) -> MainError {
    use ft_io::IoError::*;
    match e {
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Invalid(m) => MainError::Validation(m),
        Path(m) => MainError::Io(m),
        Hash(m) => MainError::Invariant(format!("hash: {m}")),
    }
}

fn map_tally_err(e: TallyError) -> MainError {
    match e {
        TallyError::Config(c) => MainError::Validation(c.to_string()),
        TallyError::Invariant(m) => MainError::Invariant(m),
        TallyError::Build(m) => MainError::Invariant(m),
    }
}

/// Validate-only path: parse the input and run the configuration checks
/// (slate, sentinel, budget, funding table) without tallying any ballot.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let (input, digest) = loader::load_input_from_path(&args.input).map_err(map_io_err)?;
    ft_pipeline::validate_input(&input)
        .map_err(|e| MainError::Validation(e.to_string()))?;
    if !args.quiet {
        println!("validate-only: input OK (sha256 {digest})");
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let (input, digest) = loader::load_input_from_path(&args.input).map_err(map_io_err)?;
    let outcome = run_tally(&input).map_err(map_tally_err)?;

    write_result(&args.out, &outcome)?;
    maybe_render_reports(args, &outcome)?;

    if !args.quiet {
        println!("{}", outcome.result_id);
        println!(
            "input sha256 {digest}; artifacts written to {}",
            args.out.to_string_lossy()
        );
    }
    Ok(())
}

/// Write `result.json`: the canonical result document wrapped with its
/// content-derived ID. The ID covers the `result` value alone, so consumers
/// can re-derive and check it.
fn write_result(out_dir: &Path, outcome: &TallyOutcome) -> Result<(), MainError> {
    let result_val = serde_json::to_value(&outcome.result)
        .map_err(|e| MainError::Invariant(format!("result to JSON: {e}")))?;
    let doc = serde_json::json!({
        "result_id": outcome.result_id,
        "result": result_val,
    });
    let path = out_dir.join("result.json");
    canonical_json::write_canonical_file(&path, &doc)
        .map_err(|e| MainError::Io(format!("write result.json: {e}")))
}

fn maybe_render_reports(args: &Args, outcome: &TallyOutcome) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }

    let model = build_model(outcome);
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => {
                let body = render_json(&model)
                    .map_err(|e| MainError::Render(e.to_string()))?;
                let path = args.out.join("report.json");
                std::fs::write(&path, body)
                    .map_err(|e| MainError::Io(format!("write report.json: {e}")))?;
            }
            "text" => {
                let body = render_text(&model);
                let path = args.out.join("report.txt");
                std::fs::write(&path, body)
                    .map_err(|e| MainError::Io(format!("write report.txt: {e}")))?;
            }
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}
