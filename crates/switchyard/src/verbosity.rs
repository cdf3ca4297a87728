//! Output verbosity levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::args::ArgumentStore;

/// Canonical key of the verbosity switch (`-v:2`).
pub const VERBOSITY_SWITCH: &str = "v";

/// Ordered output detail tiers gating display lines.
///
/// A line written at a level is shown only when the display's verbosity is
/// at least that level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Verbosity {
    /// Minimal information.
    Quiet = 0,
    /// Default information.
    #[default]
    Normal = 1,
    /// Diagnostic information.
    Diagnostic = 2,
    /// Everything.
    Full = 3,
}

impl Verbosity {
    /// Maps a numeric level to a verbosity; out-of-range values reset to `Normal`.
    pub fn from_level(level: i64) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            2 => Verbosity::Diagnostic,
            3 => Verbosity::Full,
            _ => Verbosity::Normal,
        }
    }

    /// Reads the verbosity switch from an argument store.
    ///
    /// Missing or non-numeric values yield `Normal`.
    pub fn from_store(store: &ArgumentStore) -> Self {
        Self::from_level(store.get::<i64>(VERBOSITY_SWITCH, 1))
    }

    pub fn level(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Quiet => write!(f, "Quiet"),
            Verbosity::Normal => write!(f, "Normal"),
            Verbosity::Diagnostic => write!(f, "Diagnostic"),
            Verbosity::Full => write!(f, "Full"),
        }
    }
}
