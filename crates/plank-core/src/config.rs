use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::Path;

use crate::error::ErrorCode;

/// Project-level settings read from `.plank/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub triage: TriageSettings,
    #[serde(default)]
    pub query: QuerySettings,
}

/// Tunables for the triage engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageSettings {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Quiet period before a structural change triggers recomputation.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iter: default_max_iter(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Query applied by `pk filter` when none is given.
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

impl ProjectConfig {
    /// Reject values the triage engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let t = &self.triage;
        if !(t.damping > 0.0 && t.damping < 1.0) {
            bail!(
                "{}: triage.damping must be in (0, 1), got {}",
                ErrorCode::ConfigParseError,
                t.damping
            );
        }
        if !(t.tolerance.is_finite() && t.tolerance > 0.0) {
            bail!(
                "{}: triage.tolerance must be positive, got {}",
                ErrorCode::ConfigParseError,
                t.tolerance
            );
        }
        if t.max_iter == 0 {
            bail!(
                "{}: triage.max_iter must be at least 1",
                ErrorCode::ConfigParseError
            );
        }
        Ok(())
    }
}

/// Load `<project_root>/.plank/config.toml`, falling back to defaults when absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read, parsed, or validated.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".plank/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("{}: failed to parse {}", ErrorCode::ConfigParseError, path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded project config");
    Ok(config)
}

/// Load `<config_dir>/plank/config.toml` for per-user preferences.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("plank/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("{}: failed to parse {}", ErrorCode::ConfigParseError, path.display()))
}

/// Resolve the output mode name (`pretty`, `text` or `json`).
///
/// Precedence: `--json` flag, then `FORMAT` env, then user config, then TTY
/// detection.
#[must_use]
pub fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
) -> &'static str {
    resolve_output_inner(
        cli_json,
        user_output,
        env_format,
        std::io::stdout().is_terminal(),
    )
}

fn resolve_output_inner(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
    is_tty: bool,
) -> &'static str {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json";
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode;
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode;
    }

    if is_tty { "pretty" } else { "text" }
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_tolerance() -> f64 {
    1e-6
}

const fn default_max_iter() -> usize {
    100
}

const fn default_debounce_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(root: &Path, body: &str) {
        let dir = root.join(".plank");
        std::fs::create_dir_all(&dir).expect("create .plank");
        std::fs::write(dir.join("config.toml"), body).expect("write config");
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg, ProjectConfig::default());
        assert!((cfg.triage.damping - 0.85).abs() < f64::EPSILON);
        assert_eq!(cfg.triage.max_iter, 100);
        assert_eq!(cfg.triage.debounce_ms, 300);
        assert!(cfg.query.default.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        write_config(
            root.path(),
            "[triage]\nmax_iter = 40\n\n[query]\ndefault = \"status:open\"\n",
        );
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.triage.max_iter, 40);
        assert!((cfg.triage.tolerance - 1e-6).abs() < f64::EPSILON);
        assert_eq!(cfg.query.default.as_deref(), Some("status:open"));
    }

    #[test]
    fn invalid_damping_is_rejected() {
        let root = tempfile::tempdir().expect("tempdir");
        write_config(root.path(), "[triage]\ndamping = 1.5\n");
        let err = load_project_config(root.path()).expect_err("damping out of range");
        let rendered = format!("{err:#}");
        assert!(rendered.contains("triage.damping"), "{rendered}");
        assert!(rendered.contains("E1002"), "{rendered}");
    }

    #[test]
    fn malformed_toml_is_reported() {
        let root = tempfile::tempdir().expect("tempdir");
        write_config(root.path(), "[triage\n");
        let err = load_project_config(root.path()).expect_err("bad toml");
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        assert_eq!(resolve_output_inner(true, Some("pretty"), Some("text"), true), "json");
    }

    #[test]
    fn env_beats_user_config() {
        assert_eq!(resolve_output_inner(false, Some("json"), Some("text"), true), "text");
    }

    #[test]
    fn legacy_aliases_are_normalized() {
        assert_eq!(resolve_output_inner(false, Some("table"), Some("human"), false), "pretty");
        assert_eq!(resolve_output_inner(false, Some("human"), Some("table"), true), "text");
    }

    #[test]
    fn tty_decides_when_nothing_is_set() {
        assert_eq!(resolve_output_inner(false, None, None, true), "pretty");
        assert_eq!(resolve_output_inner(false, None, Some("bogus"), false), "text");
    }
}
