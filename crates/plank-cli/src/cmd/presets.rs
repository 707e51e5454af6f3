
use plank_query::QUERY_PRESETS;

use crate::output::{OutputMode, pretty_rule, pretty_section, render_mode};

/// Execute `pk presets`: list the built-in queries.
pub fn run_presets(output: OutputMode) -> anyhow::Result<()> {
    render_mode(
        output,
        &QUERY_PRESETS,
        |presets, w| {
            for preset in *presets {
                writeln!(w, "{}\t{}", preset.id, preset.query)?;
            }
            Ok(())
        },
        |presets, w| {
            pretty_section(w, "Query presets")?;
            for preset in *presets {
                writeln!(w, "{:<16} {}", preset.id, preset.label)?;
                writeln!(w, "{:<16} {}", "", preset.query)?;
                writeln!(w, "{:<16} {}", "", preset.description)?;
            }
            pretty_rule(w)?;
            writeln!(w, "Run one with: pk filter --preset <ID>")
        },
    )
}
