use std::path::Path;

use clap::Args;
use plank_core::config::load_project_config;
use plank_core::error::ErrorCode;
use plank_core::model::item::WorkItem;
use plank_query::{compile_query, filter_items, find_preset};
use serde::Serialize;
use tracing::debug;

use crate::cmd::{item_row, load_items};
use crate::output::{OutputMode, fail, pretty_section, render_mode};

/// Arguments for `pk filter`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Query text, e.g. `status:open AND priority:1-2`.
    pub query: Option<String>,

    /// Run a built-in preset instead of a query (see `pk presets`).
    #[arg(long, conflicts_with = "query")]
    pub preset: Option<String>,
}

#[derive(Debug, Serialize)]
struct FilterOutput<'a> {
    query: String,
    total: usize,
    matched: usize,
    items: &'a [WorkItem],
}

/// Pick the query to run: `--preset`, then the positional query, then
/// `[query] default` from the project config. No query at all matches
/// every item.
fn resolve_query(
    args: &FilterArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<String> {
    if let Some(id) = args.preset.as_deref() {
        return find_preset(id)
            .map(|preset| preset.query.to_string())
            .ok_or_else(|| fail(output, ErrorCode::UnknownPreset, format!("no preset named '{id}'")));
    }
    if let Some(query) = &args.query {
        return Ok(query.clone());
    }

    let config = load_project_config(project_root)
        .map_err(|err| fail(output, ErrorCode::ConfigParseError, format!("{err:#}")))?;
    Ok(config
        .query
        .default
        .inspect(|default| debug!(query = %default, "using configured default query"))
        .unwrap_or_default())
}

/// Execute `pk filter`.
///
/// Invalid queries are reported as errors rather than silently matching
/// everything, so scripts notice a typo.
pub fn run_filter(
    args: &FilterArgs,
    output: OutputMode,
    items_path: &Path,
    project_root: &Path,
) -> anyhow::Result<()> {
    let query = resolve_query(args, output, project_root)?;
    let filter = compile_query(&query);
    if !filter.is_valid {
        let position = filter.error_position.unwrap_or_default();
        let message = filter.error.as_deref().unwrap_or("invalid query");
        return Err(fail(
            output,
            ErrorCode::QueryParseError,
            format!("{message} (at position {position})"),
        ));
    }

    let items = load_items(items_path, output)?;
    let matched = filter_items(&items, &filter);
    let report = FilterOutput {
        query: filter.query.clone(),
        total: items.len(),
        matched: matched.len(),
        items: &matched,
    };

    render_mode(
        output,
        &report,
        |report, w| {
            for item in report.items {
                writeln!(w, "{}", item_row(item))?;
            }
            Ok(())
        },
        |report, w| {
            let heading = if report.query.is_empty() {
                format!("All items ({})", report.total)
            } else {
                format!("{} ({} of {})", report.query, report.matched, report.total)
            };
            pretty_section(w, &heading)?;
            if report.items.is_empty() {
                writeln!(w, "No matching items.")?;
            }
            for item in report.items {
                writeln!(w, "{}", item_row(item))?;
            }
            Ok(())
        },
    )
}
