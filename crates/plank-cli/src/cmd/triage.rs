use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use clap::Args;
use plank_core::config::load_project_config;
use plank_core::error::ErrorCode;
use plank_triage::{
    ImpactLevel, NativeAnalytics, TriageConfig, compute_triage, format_unblock_badge,
    impact_level,
};
use serde::Serialize;
use tracing::info;

use crate::cmd::load_items;
use crate::output::{OutputMode, fail, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `pk triage`.
#[derive(Args, Debug)]
pub struct TriageArgs {
    /// Number of ranked items to show.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriageRow {
    id: String,
    title: String,
    impact_score: f64,
    level: ImpactLevel,
    unblock_count: usize,
    depth: usize,
    critical_path: bool,
    ready: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriageOutput {
    total: usize,
    ready_count: usize,
    blocked_count: usize,
    critical_path_count: usize,
    high_impact_count: usize,
    fingerprint: String,
    ranked: Vec<TriageRow>,
    cycles: Vec<Vec<String>>,
}

/// Execute `pk triage`: score every item and print the top of the ranking.
pub fn run_triage(
    args: &TriageArgs,
    output: OutputMode,
    items_path: &Path,
    project_root: &Path,
) -> anyhow::Result<()> {
    let settings = load_project_config(project_root)
        .map_err(|err| fail(output, ErrorCode::ConfigParseError, format!("{err:#}")))?;
    let config = TriageConfig::from(&settings.triage);
    let items = load_items(items_path, output)?;

    let analytics = NativeAnalytics::new(config.pagerank.clone());
    let report = compute_triage(&items, &analytics, &config);

    let titles: HashMap<&str, &str> = items
        .iter()
        .map(|item| (item.id.as_str(), item.title.as_str()))
        .collect();
    let ranked: Vec<TriageRow> = report
        .ranked
        .iter()
        .take(args.limit)
        .filter_map(|id| {
            let m = report.metrics.get(id)?;
            Some(TriageRow {
                id: id.clone(),
                title: titles.get(id.as_str()).copied().unwrap_or_default().to_string(),
                impact_score: m.impact_score,
                level: impact_level(m.impact_score),
                unblock_count: m.unblock_count,
                depth: m.depth,
                critical_path: m.is_critical_path,
                ready: m.is_ready(),
            })
        })
        .collect();

    info!(
        items = items.len(),
        shown = ranked.len(),
        cycles = report.cycles.len(),
        "triage complete"
    );

    let out = TriageOutput {
        total: report.metrics.len(),
        ready_count: report.ready_count,
        blocked_count: report.blocked_count,
        critical_path_count: report.critical_path_count,
        high_impact_count: report.high_impact_count,
        fingerprint: report.fingerprint,
        ranked,
        cycles: report.cycles,
    };

    render_mode(output, &out, render_triage_text, render_triage_pretty)
}

fn render_triage_text(out: &TriageOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &out.ranked {
        writeln!(
            w,
            "{}  {:.1}  {}  unblocks={}  {}",
            row.id, row.impact_score, row.level, row.unblock_count, row.title
        )?;
    }
    for cycle in &out.cycles {
        writeln!(w, "cycle  {}", cycle.join(" -> "))?;
    }
    Ok(())
}

fn render_triage_pretty(out: &TriageOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Triage")?;
    pretty_kv(w, "Items", out.total.to_string())?;
    pretty_kv(w, "Ready", out.ready_count.to_string())?;
    pretty_kv(w, "Blocked", out.blocked_count.to_string())?;
    pretty_kv(w, "Critical", out.critical_path_count.to_string())?;
    pretty_kv(w, "High impact", out.high_impact_count.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Ranked by impact")?;
    if out.ranked.is_empty() {
        writeln!(w, "No items.")?;
    }
    for (i, row) in out.ranked.iter().enumerate() {
        let marker = if row.critical_path { "★" } else { " " };
        let state = if row.ready { "ready" } else { "blocked" };
        writeln!(
            w,
            "{:>2}. {marker} {:<10} {:>5.1} {:<8} {:<7} {}",
            i + 1,
            row.id,
            row.impact_score,
            row.level,
            state,
            row.title
        )?;
        if let Some(badge) = format_unblock_badge(row.unblock_count) {
            writeln!(w, "{:>16}{badge}", "")?;
        }
    }

    if !out.cycles.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Cycles")?;
        for cycle in &out.cycles {
            writeln!(w, "  {}", cycle.join(" -> "))?;
        }
    }
    pretty_rule(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TriageOutput {
        TriageOutput {
            total: 2,
            ready_count: 1,
            blocked_count: 1,
            critical_path_count: 1,
            high_impact_count: 0,
            fingerprint: "2:abc".into(),
            ranked: vec![TriageRow {
                id: "a".into(),
                title: "Schema".into(),
                impact_score: 12.34,
                level: ImpactLevel::Medium,
                unblock_count: 1,
                depth: 0,
                critical_path: true,
                ready: true,
            }],
            cycles: vec![vec!["x".into(), "y".into()]],
        }
    }

    #[test]
    fn text_rows_are_compact() {
        let mut buf = Vec::new();
        render_triage_text(&sample(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "a  12.3  medium  unblocks=1  Schema\ncycle  x -> y\n");
    }

    #[test]
    fn pretty_shows_badge_and_cycles() {
        let mut buf = Vec::new();
        render_triage_pretty(&sample(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Unblocks 1 item"), "{text}");
        assert!(text.contains("x -> y"), "{text}");
        assert!(text.contains("★"), "{text}");
    }
}
