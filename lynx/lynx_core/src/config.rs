//! Process-wide configuration values.
//!
//! The only configuration the discovery engine carries is the name-matching
//! mode used by every class's search index. The mode is pinned on first use
//! (see `lynx_discovery::naming`); this module just defines the value type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Case handling for name lookups.
///
/// Search indexes are built with one process-wide mode, fixed before the
/// first index anywhere is built. The default matches the original behavior
/// of exact, case-sensitive lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameMatching {
    /// Lookup strings must match names exactly.
    #[default]
    Sensitive,

    /// Lookup strings match names regardless of case.
    Insensitive,
}

impl NameMatching {
    /// Get the name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensitive => "case-sensitive",
            Self::Insensitive => "case-insensitive",
        }
    }
}

impl fmt::Display for NameMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameMatching {
    type Err = ();

    /// Convert from a string. Case-insensitive, accepting a few spellings.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sensitive" | "case-sensitive" => Ok(Self::Sensitive),
            "insensitive" | "case-insensitive" => Ok(Self::Insensitive),
            _ => Err(()),
        }
    }
}
