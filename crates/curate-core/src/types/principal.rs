//! Authenticated caller passed explicitly into mutating operations.

use super::{Agent, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The authenticated user and the groups they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User identity
    pub user: UserId,
    /// Group memberships
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Principal {
    /// Principal with no group memberships.
    pub fn new(user: impl Into<UserId>) -> Self {
        Self {
            user: user.into(),
            groups: BTreeSet::new(),
        }
    }

    /// Add a group membership.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Whether the principal is a member of `group`.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Whether an entry's agent refers to this principal.
    pub fn matches(&self, agent: &Agent) -> bool {
        match agent {
            Agent::Person(name) => name == self.user.as_str(),
            Agent::Group(name) => self.in_group(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_person_and_groups() {
        let principal = Principal::new("alice").with_group("staff");
        assert!(principal.matches(&Agent::person("alice")));
        assert!(principal.matches(&Agent::group("staff")));
        assert!(!principal.matches(&Agent::group("admin")));
        assert!(!principal.matches(&Agent::person("staff")));
    }
}
