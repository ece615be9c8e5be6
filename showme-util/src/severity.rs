use std::{fmt, str::FromStr, convert::Infallible};

use serde::{Deserialize, Serialize};

/// Toast severity, selecting the default palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral informational toast (default)
    #[default]
    Info,
    Success,
    Warning,
    Error,
    /// No severity styling at all
    None,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::None => "none",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names map to [`Severity::None`], so a typo renders an unstyled
/// toast instead of failing the request.
impl FromStr for Severity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "info" => Severity::Info,
            "success" => Severity::Success,
            "warning" | "warn" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::None,
        })
    }
}
