
use clap::Args;
use plank_core::error::ErrorCode;
use plank_query::{compile_query, validate_query};
use serde::Serialize;

use crate::output::{OutputMode, fail, render_mode};

/// Arguments for `pk validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Query text to check.
    pub query: String,
}

#[derive(Debug, Serialize)]
struct ValidateOutput<'a> {
    query: &'a str,
    valid: bool,
}

/// Execute `pk validate`. Succeeds only when the query parses.
pub fn run_validate(args: &ValidateArgs, output: OutputMode) -> anyhow::Result<()> {
    let validation = validate_query(&args.query);
    if let Some(error) = validation.error {
        // Position is only tracked on the compiled form.
        let position = compile_query(&args.query).error_position.unwrap_or_default();
        return Err(fail(
            output,
            ErrorCode::QueryParseError,
            format!("{error} (at position {position})"),
        ));
    }

    let report = ValidateOutput {
        query: &args.query,
        valid: validation.valid,
    };
    render_mode(
        output,
        &report,
        |_, w| writeln!(w, "valid"),
        |report, w| writeln!(w, "✓ query is valid: {}", report.query),
    )
}
