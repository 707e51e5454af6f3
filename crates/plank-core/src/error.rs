use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ItemsFileUnreadable,
    ItemsFileInvalid,
    QueryParseError,
    UnknownPreset,
}

impl ErrorCode {
    pub const ALL: [Self; 5] = [
        Self::ConfigParseError,
        Self::ItemsFileUnreadable,
        Self::ItemsFileInvalid,
        Self::QueryParseError,
        Self::UnknownPreset,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::ItemsFileUnreadable => "E2001",
            Self::ItemsFileInvalid => "E2002",
            Self::QueryParseError => "E4001",
            Self::UnknownPreset => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ItemsFileUnreadable => "Items file could not be read",
            Self::ItemsFileInvalid => "Items file is not a JSON array of work items",
            Self::QueryParseError => "Query could not be parsed",
            Self::UnknownPreset => "Unknown query preset",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .plank/config.toml and retry."),
            Self::ItemsFileUnreadable => Some("Pass an existing file with --items."),
            Self::ItemsFileInvalid => {
                Some("Export the board as a JSON array of objects with at least an `id`.")
            }
            Self::QueryParseError => {
                Some("Combine field:value terms with AND, OR, NOT and balanced parentheses.")
            }
            Self::UnknownPreset => Some("Run `pk presets` to list available presets."),
        }
    }

    /// Snake-case identifier used in structured CLI error output.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::ConfigParseError => "config_parse_error",
            Self::ItemsFileUnreadable => "items_file_unreadable",
            Self::ItemsFileInvalid => "items_file_invalid",
            Self::QueryParseError => "query_parse_error",
            Self::UnknownPreset => "unknown_preset",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
