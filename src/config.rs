use serde::{Deserialize, Serialize};

use crate::{error::Error, policy::OwnershipScope};

/// Fixed for the lifetime of a contract instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub ownership_scope: OwnershipScope,
}

impl ContractConfig {
    pub fn new(ownership_scope: OwnershipScope) -> Self {
        Self { ownership_scope }
    }

    /// Parse `{"ownership_scope": "identity" | "organization"}`. Missing
    /// keys take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(|e| Error::InvalidArgument(format!("config: {}", e)))
    }
}
