//! Process-wide name-matching mode and the folded name set.
//!
//! Every class's search index is built against one process-wide
//! [`NameMatching`] mode. The mode is pinned at first use: either an explicit
//! [`set_name_matching`] call or the first index build (which pins the
//! default, case-sensitive). Once pinned, configuring a different mode fails
//! fast, since already-built indexes could not be rebuilt consistently.

use once_cell::sync::OnceCell;
use std::collections::HashSet;

use lynx_core::error::{ConfigError, Result};
use lynx_core::NameMatching;

static NAME_MATCHING: OnceCell<NameMatching> = OnceCell::new();

/// Pin the process-wide name-matching mode.
///
/// Succeeds when called before any index has been built, and when
/// re-asserting the mode that is already pinned. Fails with
/// [`ConfigError::NameMatchingPinned`] when a different mode was pinned
/// earlier, by an explicit call or by an index build.
pub fn set_name_matching(mode: NameMatching) -> Result<()> {
    let active = *NAME_MATCHING.get_or_init(|| mode);
    if active == mode {
        Ok(())
    } else {
        Err(ConfigError::NameMatchingPinned {
            active,
            requested: mode,
        }
        .into())
    }
}

/// The pinned mode, pinning the default on first use.
pub(crate) fn active_matching() -> NameMatching {
    *NAME_MATCHING.get_or_init(NameMatching::default)
}

/// A set of lookup strings folded per a fixed matching mode.
///
/// Insertions and membership checks fold with the same mode, so a set built
/// insensitively answers `contains("classname")` for a name inserted as
/// `"ClassName"`.
#[derive(Debug)]
pub(crate) struct NameSet {
    mode: NameMatching,
    keys: HashSet<String>,
}

impl NameSet {
    pub(crate) fn new(mode: NameMatching) -> Self {
        Self {
            mode,
            keys: HashSet::new(),
        }
    }

    fn fold(&self, name: &str) -> String {
        match self.mode {
            NameMatching::Sensitive => name.to_owned(),
            NameMatching::Insensitive => name.to_lowercase(),
        }
    }

    pub(crate) fn insert(&mut self, name: &str) {
        let key = self.fold(name);
        self.keys.insert(key);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.keys.contains(&self.fold(name))
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}
