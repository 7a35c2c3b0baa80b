use ledger::TransactionContext;
use metrics::counter;
use tracing::{debug, error, warn};

use crate::{
    config::ContractConfig,
    error::Error,
    identity::{Caller, Owner},
    query::Selector,
    record::{Asset, Record},
    repository::{LedgerRepository, Repository},
};

/// The asset contract: ownership-checked operations over the record store.
///
/// Holds no per-invocation state. Every method resolves the caller from
/// `ctx` before touching the ledger and fails with `Error::Identity` when it
/// cannot.
pub struct AssetContract {
    config: ContractConfig,
    assets: Box<dyn Repository<Asset>>,
}

impl AssetContract {
    pub fn new(config: ContractConfig) -> Self {
        Self::with_repository(config, Box::new(LedgerRepository::<Asset>::new()))
    }

    pub fn with_repository(config: ContractConfig, assets: Box<dyn Repository<Asset>>) -> Self {
        Self { config, assets }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    // ==================== Mutations ====================

    /// Issue a new asset owned by the caller. Any owner or type in `item` is
    /// overwritten.
    pub async fn create_asset(
        &self,
        ctx: &TransactionContext,
        item: Asset,
    ) -> Result<Asset, Error> {
        let id = item.id.clone();
        observe("CreateAsset", &id, self.create(ctx, item).await)
    }

    /// Replace the descriptive fields of an asset the caller may access.
    /// Owner and type are kept from the stored record.
    pub async fn update_asset(
        &self,
        ctx: &TransactionContext,
        item: Asset,
    ) -> Result<Asset, Error> {
        let id = item.id.clone();
        observe("UpdateAsset", &id, self.update(ctx, item).await)
    }

    pub async fn delete_asset(&self, ctx: &TransactionContext, id: &str) -> Result<(), Error> {
        observe("DeleteAsset", id, self.delete(ctx, id).await)
    }

    /// Hand the asset to `new_owner` and return the previous owner. Nothing
    /// but the owner changes.
    pub async fn transfer_asset(
        &self,
        ctx: &TransactionContext,
        id: &str,
        new_owner: &str,
    ) -> Result<String, Error> {
        observe("TransferAsset", id, self.transfer(ctx, id, new_owner).await)
    }

    // ==================== Reads ====================

    pub async fn read_asset(&self, ctx: &TransactionContext, id: &str) -> Result<Asset, Error> {
        let result = match Caller::from_context(ctx) {
            Ok(caller) => self.read_visible("ReadAsset", ctx, &caller, id).await,
            Err(err) => Err(err),
        };
        observe("ReadAsset", id, result)
    }

    /// Existence is not gated by ownership.
    pub async fn asset_exists(&self, ctx: &TransactionContext, id: &str) -> Result<bool, Error> {
        let result = match Caller::from_context(ctx) {
            Ok(_) => self.exists(ctx, id).await,
            Err(err) => Err(err),
        };
        observe("AssetExists", id, result)
    }

    /// Every asset of the current schema the caller may see, in store order.
    pub async fn get_all_assets(&self, ctx: &TransactionContext) -> Result<Vec<Asset>, Error> {
        observe("GetAllAssets", "*", self.list_all(ctx).await)
    }

    /// Run `query` as given, then drop every result the caller may not see.
    pub async fn query_assets(
        &self,
        ctx: &TransactionContext,
        query: &str,
    ) -> Result<Vec<Asset>, Error> {
        observe("QueryAssets", "*", self.query(ctx, query).await)
    }

    // ==================== Internals ====================

    async fn create(&self, ctx: &TransactionContext, mut item: Asset) -> Result<Asset, Error> {
        let caller = Caller::from_context(ctx)?;
        if item.id.is_empty() {
            return Err(Error::InvalidArgument("asset id must not be empty".to_string()));
        }
        if self.exists(ctx, &item.id).await? {
            return Err(Error::Conflict(item.id));
        }

        item.set_owner(caller.owner().to_string());
        item.stamp_type();

        self.assets.set(ctx, &item).await?;
        Ok(item)
    }

    async fn update(&self, ctx: &TransactionContext, mut item: Asset) -> Result<Asset, Error> {
        let caller = Caller::from_context(ctx)?;
        let current = self.read_visible("UpdateAsset", ctx, &caller, &item.id).await?;

        item.set_owner(current.owner);
        item.stamp_type();

        self.assets.set(ctx, &item).await?;
        Ok(item)
    }

    async fn delete(&self, ctx: &TransactionContext, id: &str) -> Result<(), Error> {
        let caller = Caller::from_context(ctx)?;
        self.read_visible("DeleteAsset", ctx, &caller, id).await?;
        self.assets.delete(ctx, id).await
    }

    async fn transfer(
        &self,
        ctx: &TransactionContext,
        id: &str,
        new_owner: &str,
    ) -> Result<String, Error> {
        let caller = Caller::from_context(ctx)?;
        let new_owner = Owner::parse(new_owner)?;
        let mut asset = self.read_visible("TransferAsset", ctx, &caller, id).await?;

        let old_owner = asset.owner.clone();
        asset.set_owner(new_owner.to_string());

        self.assets.set(ctx, &asset).await?;
        Ok(old_owner)
    }

    async fn list_all(&self, ctx: &TransactionContext) -> Result<Vec<Asset>, Error> {
        let caller = Caller::from_context(ctx)?;
        let selector = Selector::new().where_eq("type", Asset::TYPE);
        let assets = self.assets.filter(ctx, &selector).await?;
        Ok(self.visible_only(&caller, assets))
    }

    async fn query(&self, ctx: &TransactionContext, query: &str) -> Result<Vec<Asset>, Error> {
        let caller = Caller::from_context(ctx)?;
        let assets = self.assets.list(ctx, query).await?;
        Ok(self.visible_only(&caller, assets))
    }

    async fn exists(&self, ctx: &TransactionContext, id: &str) -> Result<bool, Error> {
        match self.assets.get(ctx, id).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The single authorization gate for reads and mutations.
    async fn read_visible(
        &self,
        op: &'static str,
        ctx: &TransactionContext,
        caller: &Caller,
        id: &str,
    ) -> Result<Asset, Error> {
        let asset = self.assets.get(ctx, id).await?;

        if !self.config.ownership_scope.permits(&asset.owner, caller) {
            counter!("custodia.access.denied", "op" => op).increment(1);
            return Err(Error::AccessDenied(
                self.config.ownership_scope.describe().to_string(),
            ));
        }

        Ok(asset)
    }

    fn visible_only(&self, caller: &Caller, assets: Vec<Asset>) -> Vec<Asset> {
        let scope = self.config.ownership_scope;
        assets
            .into_iter()
            .filter(|asset| scope.permits(&asset.owner, caller))
            .collect()
    }
}

/// Log and count the outcome of one operation, passing the result through.
fn observe<T>(op: &'static str, id: &str, result: Result<T, Error>) -> Result<T, Error> {
    match &result {
        Ok(_) => {
            counter!("custodia.operations.total", "op" => op, "outcome" => "ok").increment(1);
            debug!(op, id, "operation succeeded");
        }
        Err(err) => {
            counter!("custodia.operations.total", "op" => op, "outcome" => "error").increment(1);
            if err.is_store_error() {
                error!(op, id, error = %err, "operation failed");
            } else {
                warn!(op, id, error = %err, "operation rejected");
            }
        }
    }
    result
}
