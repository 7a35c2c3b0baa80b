use std::fmt::Display;

use ledger::{LedgerError, TransactionContext};

use crate::error::Error;

/// The authenticated submitter of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Subject common name of the caller's certificate.
    pub id: String,
    /// Membership service provider the certificate was issued under.
    pub msp: String,
}

impl Caller {
    pub fn new(id: &str, msp: &str) -> Self {
        Self {
            id: id.to_string(),
            msp: msp.to_string(),
        }
    }

    /// Resolve the caller from the invocation context. No operation may run
    /// without this succeeding.
    pub fn from_context(ctx: &TransactionContext) -> Result<Self, Error> {
        let identity = ctx.client_identity();
        let msp = identity.msp_id().map_err(identity_error)?;
        let id = identity.common_name().map_err(identity_error)?;

        if msp.is_empty() || id.is_empty() {
            return Err(Error::Identity(
                "caller certificate has an empty MSP id or common name".to_string(),
            ));
        }
        // Owner strings split at the last `@`, so the organization cannot hold one.
        if msp.contains('@') {
            return Err(Error::Identity(format!(
                "caller MSP id {:?} must not contain '@'",
                msp
            )));
        }

        Ok(Self { id, msp })
    }

    /// `identity@organization`
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.id.clone(),
            msp: self.msp.clone(),
        }
    }
}

fn identity_error(err: LedgerError) -> Error {
    match err {
        LedgerError::Identity(msg) => Error::Identity(msg),
        other => Error::Identity(other.to_string()),
    }
}

/// Canonical owner string, `identity@organization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub msp: String,
}

impl Owner {
    /// Splits at the last `@`, so identities may themselves contain `@`.
    pub fn parse(value: &str) -> Result<Self, Error> {
        let (id, msp) = value.rsplit_once('@').ok_or_else(|| {
            Error::InvalidArgument(format!("owner {:?} is not of the form identity@organization", value))
        })?;

        if id.is_empty() || msp.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "owner {:?} has an empty identity or organization",
                value
            )));
        }

        Ok(Self {
            id: id.to_string(),
            msp: msp.to_string(),
        })
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.msp)
    }
}
