//! Action names understood by the dispatcher.

use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Operation selected by a request's `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    Set,
    Remove,
    Exists,
    Flush,
    Stats,
    All,
    Search,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
            Action::Remove => "remove",
            Action::Exists => "exists",
            Action::Flush => "flush",
            Action::Stats => "stats",
            Action::All => "all",
            Action::Search => "search",
        }
    }
}

impl FromStr for Action {
    type Err = CacheError;

    /// Parses an action name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Action::Get),
            "set" => Ok(Action::Set),
            "remove" => Ok(Action::Remove),
            "exists" => Ok(Action::Exists),
            "flush" => Ok(Action::Flush),
            "stats" => Ok(Action::Stats),
            "all" => Ok(Action::All),
            "search" => Ok(Action::Search),
            _ => Err(CacheError::InvalidRequest(format!("Unknown action: {}", s))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
