//! ACL based authorization handler.
//!
//! A principal may edit an object when they belong to an admin group or
//! when one of the object's entries grants `edit` to them or to one of their
//! groups. Repository-wide management is reserved to admin groups.

use async_trait::async_trait;
use curate_core::effects::AuthorizationEffects;
use curate_core::{AccessLevel, Principal, RepositoryObject};
use std::collections::BTreeSet;

/// Authorization driven by object ACLs and configured admin groups
#[derive(Debug, Clone, Default)]
pub struct AclAuthorizationHandler {
    admin_groups: BTreeSet<String>,
}

impl AclAuthorizationHandler {
    /// Create a handler with the given admin groups
    pub fn new<I, S>(admin_groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admin_groups: admin_groups.into_iter().map(Into::into).collect(),
        }
    }

    fn is_admin(&self, principal: &Principal) -> bool {
        principal
            .groups
            .iter()
            .any(|g| self.admin_groups.contains(g))
    }
}

#[async_trait]
impl AuthorizationEffects for AclAuthorizationHandler {
    async fn can_edit(&self, principal: &Principal, object: &RepositoryObject) -> bool {
        if self.is_admin(principal) {
            return true;
        }
        object
            .permissions
            .iter()
            .any(|entry| entry.access.grants(AccessLevel::Edit) && principal.matches(&entry.agent))
    }

    async fn is_repository_manager(&self, principal: &Principal) -> bool {
        self.is_admin(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_core::{AccessControlEntry, Visibility};

    fn work_editable_by(entry: AccessControlEntry) -> RepositoryObject {
        let mut work = RepositoryObject::work("w1", Visibility::Restricted);
        work.permissions.push(entry);
        work
    }

    #[tokio::test]
    async fn person_edit_grant_allows() {
        let auth = AclAuthorizationHandler::new(["admin"]);
        let work = work_editable_by(AccessControlEntry::person("alice", AccessLevel::Edit));
        assert!(auth.can_edit(&Principal::new("alice"), &work).await);
        assert!(!auth.can_edit(&Principal::new("bob"), &work).await);
    }

    #[tokio::test]
    async fn read_grant_is_not_enough() {
        let auth = AclAuthorizationHandler::new(["admin"]);
        let work = work_editable_by(AccessControlEntry::group("staff", AccessLevel::Read));
        let staff = Principal::new("carol").with_group("staff");
        assert!(!auth.can_edit(&staff, &work).await);
    }

    #[tokio::test]
    async fn admins_edit_everything_and_manage() {
        let auth = AclAuthorizationHandler::new(["admin"]);
        let work = RepositoryObject::work("w1", Visibility::Restricted);
        let admin = Principal::new("root").with_group("admin");
        assert!(auth.can_edit(&admin, &work).await);
        assert!(auth.is_repository_manager(&admin).await);
        assert!(!auth.is_repository_manager(&Principal::new("alice")).await);
    }
}
