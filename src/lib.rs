//! # Custodia
//!
//! *custodia: Latin for "safekeeping".*
//!
//! Custodia is the record layer of an asset contract running on a
//! replicated key-value ledger. Organizations that do not trust each other
//! share one world state; custodia decides who may read, change, hand over
//! or delete each record, and turns typed records into the exact bytes every
//! endorsing peer must agree on.
//!
//! ## What's inside
//!
//! ### Record store
//! [`repository::LedgerRepository`] maps a [`Record`] onto the world state:
//! deterministic JSON encoding, a distinguishable not-found, selector
//! queries built from equality filters, and query cursors that are always
//! released.
//!
//! ### Ownership-checked contract
//! [`AssetContract`] resolves the caller as `identity@organization` and
//! applies one [`OwnershipScope`] to every read, update, transfer, delete and
//! listing.
//!
//! ```rust,ignore
//! let contract = AssetContract::new(ContractConfig::default());
//! let ctx = TransactionContext::new(stub, identity);
//!
//! contract.create_asset(&ctx, Asset::new("asset1", "blue", 5, 300)).await?;
//! let previous = contract.transfer_asset(&ctx, "asset1", "carol@Org2").await?;
//! ```
//!
//! The ledger itself, endorsement, ordering and certificate issuance belong
//! to the platform and reach this crate only through [`ledger`].

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod policy;
pub mod query;
pub mod record;
pub mod repository;

pub use ledger;

pub use crate::config::ContractConfig;
pub use crate::contract::AssetContract;
pub use crate::error::Error;
pub use crate::identity::{Caller, Owner};
pub use crate::policy::OwnershipScope;
pub use crate::query::{FieldValue, Selector, ToFieldValue};
pub use crate::record::*;
pub use crate::repository::{LedgerRepository, Repository};
