use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SlogError;

/// Prefixes accepted in front of a level token (`SLOG_INFO`, `LEVEL_WARN`).
const TOKEN_PREFIXES: [&str; 2] = ["SLOG_", "LEVEL_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Text written into the `level` member.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Parses a level token, ignoring case and a `SLOG_`/`LEVEL_` prefix.
    pub fn from_token(token: &str) -> Result<Self, SlogError> {
        let bare = TOKEN_PREFIXES
            .iter()
            .find_map(|p| {
                token
                    .get(..p.len())
                    .filter(|head| head.eq_ignore_ascii_case(p))
                    .map(|_| &token[p.len()..])
            })
            .unwrap_or(token);

        match bare.to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(SlogError::UnknownLevel(token.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = SlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_token(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_conventional_prefixes() {
        assert_eq!(Level::from_token("SLOG_INFO").unwrap(), Level::Info);
        assert_eq!(Level::from_token("LEVEL_warn").unwrap(), Level::Warn);
        assert_eq!(Level::from_token("slog_error").unwrap(), Level::Error);
    }

    #[test]
    fn accepts_bare_tokens_in_any_case() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("Trace".parse::<Level>().unwrap(), Level::Trace);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!(matches!(
            Level::from_token("SLOG_LOUD"),
            Err(SlogError::UnknownLevel(t)) if t == "SLOG_LOUD"
        ));
        assert!(Level::from_token("").is_err());
        assert!(Level::from_token("é").is_err());
    }

    #[test]
    fn renders_upper_case() {
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Error.as_str(), "ERROR");
    }
}
