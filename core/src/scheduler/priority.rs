//! Worker Priority

use std::fmt;
use std::str::FromStr;

/// Requested scheduling priority of the render workers. The standard library
/// has no portable thread priority control, so the value is only carried in
/// worker thread names and log messages.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WorkerPriority {
    /// Leave the machine responsive.
    Low,

    /// Default priority.
    #[default]
    Normal,

    /// Render as fast as possible.
    High,
}

impl fmt::Display for WorkerPriority {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

impl FromStr for WorkerPriority {
    type Err = String;

    /// Parse a priority name.
    ///
    /// * `s` - One of `low`, `normal` or `high`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" | "min" => Ok(Self::Low),
            "normal" | "default" => Ok(Self::Normal),
            "high" | "max" => Ok(Self::High),
            _ => Err(format!("Unknown worker priority '{s}'")),
        }
    }
}
