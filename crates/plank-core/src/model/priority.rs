use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Four-level priority scale. Ordinal 1 is the most urgent.
///
/// Deserialization is lenient: numbers `1..=4`, the level names, and the
/// `critical` alias are accepted; anything else lands on [`Priority::Medium`].
/// [`FromStr`] is strict and rejects unknown text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "RawPriority")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Urgent, Self::High, Self::Medium, Self::Low];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Position on the 1 (most urgent) ..= 4 (least urgent) scale.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Urgent => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }

    /// Weight used by triage scoring: urgent=4 down to low=1.
    #[must_use]
    pub const fn weight(self) -> u8 {
        5 - self.ordinal()
    }

    #[must_use]
    pub const fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            1 => Some(Self::Urgent),
            2 => Some(Self::High),
            3 => Some(Self::Medium),
            4 => Some(Self::Low),
            _ => None,
        }
    }

    /// Lenient normalization: unrecognized input falls back to `Medium`.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "urgent" | "critical" => Ok(Self::Urgent),
            "2" | "high" => Ok(Self::High),
            "3" | "medium" => Ok(Self::Medium),
            "4" | "low" => Ok(Self::Low),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

/// Wire shapes a priority may arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPriority {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawPriority> for Priority {
    fn from(raw: RawPriority) -> Self {
        match raw {
            RawPriority::Number(n) => Self::from_ordinal(n).unwrap_or_default(),
            RawPriority::Text(text) => Self::normalize(&text),
            RawPriority::Other(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_and_weight_are_mirrored() {
        for p in Priority::ALL {
            assert_eq!(u32::from(p.ordinal()) + u32::from(p.weight()), 5);
        }
        assert_eq!(Priority::Urgent.weight(), 4);
        assert_eq!(Priority::Low.weight(), 1);
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("critical".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" URGENT ".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!("2".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("4".parse::<Priority>().unwrap(), Priority::Low);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "p0".parse::<Priority>().unwrap_err();
        assert_eq!(err.to_string(), "invalid priority: 'p0'");
    }

    #[test]
    fn lenient_normalize_defaults_to_medium() {
        assert_eq!(Priority::normalize("whenever"), Priority::Medium);
        assert_eq!(Priority::normalize("low"), Priority::Low);
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let cases = [
            ("1", Priority::Urgent),
            ("\"high\"", Priority::High),
            ("\"critical\"", Priority::Urgent),
            ("4", Priority::Low),
            ("9", Priority::Medium),
            ("\"someday\"", Priority::Medium),
            ("null", Priority::Medium),
            ("2.5", Priority::Medium),
        ];
        for (json, expected) in cases {
            let got: Priority = serde_json::from_str(json).unwrap();
            assert_eq!(got, expected, "input {json}");
        }
    }

    #[test]
    fn serializes_as_lowercase_name() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
    }
}
