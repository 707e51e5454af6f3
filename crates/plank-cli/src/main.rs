#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use plank_core::config::load_user_config;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "plank: query and triage a task board",
    long_about = None
)]
struct Cli {
    /// Enable debug logging for plank crates (ignored when PLANK_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Board snapshot: a JSON array of work items.
    #[arg(long, global = true, default_value = "items.json")]
    items: PathBuf,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and FORMAT).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment and user config.
    fn output_mode(&self) -> OutputMode {
        let user = load_user_config().unwrap_or_else(|err| {
            warn!("ignoring user config: {err:#}");
            plank_core::config::UserConfig::default()
        });
        resolve_output_mode(self.format, self.json, user.output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Filter items with a query",
        long_about = "Print the items matching a query, a preset, or the project's default query.",
        after_help = "EXAMPLES:\n    # Open items that are urgent or high\n    pk filter 'status:open AND priority:1-2'\n\n    # Run a preset\n    pk filter --preset blocked\n\n    # Emit machine-readable output\n    pk filter 'labels:backend' --json"
    )]
    Filter(cmd::filter::FilterArgs),

    #[command(
        about = "Check a query for syntax errors",
        long_about = "Parse a query and report the first error with its position.",
        after_help = "EXAMPLES:\n    # Valid query\n    pk validate 'NOT status:done'\n\n    # Reports the unbalanced parenthesis\n    pk validate '(priority:1 OR priority:2'"
    )]
    Validate(cmd::validate::ValidateArgs),

    #[command(
        about = "List built-in query presets",
        long_about = "List the saved queries usable with `pk filter --preset`.",
        after_help = "EXAMPLES:\n    # Show presets\n    pk presets\n\n    # Emit machine-readable output\n    pk presets --json"
    )]
    Presets,

    #[command(
        about = "Rank items by how much work they unblock",
        long_about = "Build the dependency graph and rank items by impact score.",
        after_help = "EXAMPLES:\n    # Top 10 items\n    pk triage\n\n    # Top 3 from another snapshot\n    pk triage --items board.json --limit 3\n\n    # Emit machine-readable output\n    pk triage --json"
    )]
    Triage(cmd::triage::TriageArgs),
}

/// Filter used when `PLANK_LOG` is unset.
const fn default_filter(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "plank=debug,info"
    } else {
        "plank=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PLANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("PLANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        debug!("verbose logging enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Filter(ref args) => {
            cmd::filter::run_filter(args, output, &cli.items, &project_root)
        }
        Commands::Validate(ref args) => cmd::validate::run_validate(args, output),
        Commands::Presets => cmd::presets::run_presets(output),
        Commands::Triage(ref args) => {
            cmd::triage::run_triage(args, output, &cli.items, &project_root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_default_to_items_json() {
        let cli = Cli::parse_from(["pk", "presets"]);
        assert_eq!(cli.items, PathBuf::from("items.json"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["pk", "triage", "--items", "board.json", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.items, PathBuf::from("board.json"));
        assert!(matches!(cli.command, Commands::Triage(ref a) if a.limit == 10));
    }

    #[test]
    fn format_flag_wins_over_json() {
        let cli = Cli::parse_from(["pk", "--json", "--format", "text", "presets"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn filter_takes_query_or_preset() {
        let cli = Cli::parse_from(["pk", "filter", "status:open"]);
        assert!(
            matches!(cli.command, Commands::Filter(ref a) if a.query.as_deref() == Some("status:open"))
        );

        let cli = Cli::parse_from(["pk", "filter", "--preset", "ready"]);
        assert!(matches!(cli.command, Commands::Filter(ref a) if a.preset.as_deref() == Some("ready")));
    }

    #[test]
    fn filter_rejects_query_with_preset() {
        let result = Cli::try_parse_from(["pk", "filter", "status:open", "--preset", "ready"]);
        assert!(result.is_err());
    }

    #[test]
    fn triage_limit_parses() {
        let cli = Cli::parse_from(["pk", "triage", "--limit", "3"]);
        assert!(matches!(cli.command, Commands::Triage(ref a) if a.limit == 3));
    }

    #[test]
    fn verbose_is_global_and_raises_log_level() {
        let cli = Cli::parse_from(["pk", "triage", "-v"]);
        assert!(cli.verbose);
        assert_eq!(default_filter(cli.verbose, false), "plank=debug,info");
        assert_eq!(default_filter(false, true), "plank=debug,info");
        assert_eq!(default_filter(false, false), "plank=info,warn");
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["pk", "filter"],
            vec!["pk", "validate", "status:open"],
            vec!["pk", "presets"],
            vec!["pk", "triage"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "Failed to parse: {args:?}: {:?}", result.err());
        }
    }
}
