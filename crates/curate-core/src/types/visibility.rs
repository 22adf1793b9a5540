//! Coarse, whole-object visibility levels.

use crate::CurateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visibility applied to an object as a whole.
///
/// Serialized with the repository's canonical names. Parsing also accepts the
/// colloquial aliases `private`, `institution` and `public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only explicitly granted agents
    Restricted,
    /// Any authenticated member of the institution
    Authenticated,
    /// Everyone
    Open,
}

impl Visibility {
    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Restricted => "restricted",
            Visibility::Authenticated => "authenticated",
            Visibility::Open => "open",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = CurateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restricted" | "private" => Ok(Visibility::Restricted),
            "authenticated" | "institution" => Ok(Visibility::Authenticated),
            "open" | "public" => Ok(Visibility::Open),
            other => Err(CurateError::invalid(format!(
                "unknown visibility level '{other}'"
            ))),
        }
    }
}
