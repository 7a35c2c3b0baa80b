use serde::{Deserialize, Serialize};

use crate::identity::{Caller, Owner};

/// How far the ownership check reaches. Applied to every read and mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipScope {
    /// Only the exact `identity@organization` stored as owner.
    #[default]
    Identity,
    /// Any caller from the owner's organization.
    Organization,
}

impl OwnershipScope {
    /// Owner strings that fail to parse grant nothing.
    pub fn permits(self, owner: &str, caller: &Caller) -> bool {
        let Ok(owner) = Owner::parse(owner) else {
            return false;
        };
        match self {
            OwnershipScope::Identity => owner == caller.owner(),
            OwnershipScope::Organization => owner.msp == caller.msp,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            OwnershipScope::Identity => "only the owner can access this asset",
            OwnershipScope::Organization => {
                "only participants of the owner's organization can access this asset"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scope() {
        let scope = OwnershipScope::Identity;
        assert!(scope.permits("alice@Org1", &Caller::new("alice", "Org1")));
        assert!(!scope.permits("alice@Org1", &Caller::new("bob", "Org1")));
        assert!(!scope.permits("alice@Org1", &Caller::new("alice", "Org2")));
    }

    #[test]
    fn test_organization_scope() {
        let scope = OwnershipScope::Organization;
        assert!(scope.permits("alice@Org1", &Caller::new("bob", "Org1")));
        assert!(!scope.permits("alice@Org1", &Caller::new("alice", "Org2")));
        // a suffix match alone is not enough
        assert!(!scope.permits("alice@XOrg1", &Caller::new("bob", "Org1")));
    }

    #[test]
    fn test_malformed_owner_grants_nothing() {
        for scope in [OwnershipScope::Identity, OwnershipScope::Organization] {
            assert!(!scope.permits("", &Caller::new("alice", "Org1")));
            assert!(!scope.permits("@Org1", &Caller::new("", "Org1")));
        }
    }
}
