//! Fine-grained access-control entries.

use crate::CurateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission granted by an entry. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Agent may see that the object exists
    Discover,
    /// Agent may read content
    Read,
    /// Agent may modify the object and its access settings
    Edit,
}

impl AccessLevel {
    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Discover => "discover",
            AccessLevel::Read => "read",
            AccessLevel::Edit => "edit",
        }
    }

    /// Whether this level includes `other`.
    pub fn grants(&self, other: AccessLevel) -> bool {
        *self >= other
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = CurateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discover" => Ok(AccessLevel::Discover),
            "read" => Ok(AccessLevel::Read),
            "edit" => Ok(AccessLevel::Edit),
            other => Err(CurateError::invalid(format!("unknown access level '{other}'"))),
        }
    }
}

/// The role, user or group an entry grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "lowercase")]
pub enum Agent {
    /// A single user
    Person(String),
    /// A named group or role
    Group(String),
}

impl Agent {
    /// Person agent helper.
    pub fn person(name: impl Into<String>) -> Self {
        Agent::Person(name.into())
    }

    /// Group agent helper.
    pub fn group(name: impl Into<String>) -> Self {
        Agent::Group(name.into())
    }

    /// Agent name without its type.
    pub fn name(&self) -> &str {
        match self {
            Agent::Person(name) | Agent::Group(name) => name,
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::Person(name) => write!(f, "person:{name}"),
            Agent::Group(name) => write!(f, "group:{name}"),
        }
    }
}

/// A single (agent, access level) grant.
///
/// Equality and hashing cover exactly the agent and the level, which makes
/// value equality the dedup identity used during propagation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessControlEntry {
    /// Who the entry grants access to
    pub agent: Agent,
    /// What is granted
    pub access: AccessLevel,
}

impl AccessControlEntry {
    /// Create a new entry.
    pub fn new(agent: Agent, access: AccessLevel) -> Self {
        Self { agent, access }
    }

    /// Grant for a named person.
    pub fn person(name: impl Into<String>, access: AccessLevel) -> Self {
        Self::new(Agent::person(name), access)
    }

    /// Grant for a named group.
    pub fn group(name: impl Into<String>, access: AccessLevel) -> Self {
        Self::new(Agent::group(name), access)
    }
}

impl fmt::Display for AccessControlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.agent, self.access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_agent_and_level() {
        let a = AccessControlEntry::group("groupA", AccessLevel::Read);
        let b = AccessControlEntry::group("groupA", AccessLevel::Read);
        let c = AccessControlEntry::person("groupA", AccessLevel::Read);
        let d = AccessControlEntry::group("groupA", AccessLevel::Edit);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn edit_grants_read() {
        assert!(AccessLevel::Edit.grants(AccessLevel::Read));
        assert!(!AccessLevel::Discover.grants(AccessLevel::Read));
    }

    #[test]
    fn agent_serializes_as_flat_record() {
        let entry = AccessControlEntry::group("admin", AccessLevel::Edit);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"agent": {"type": "group", "name": "admin"}, "access": "edit"})
        );
    }
}
