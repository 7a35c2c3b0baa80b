use serde::{Deserialize, Serialize};

/// A typed document stored in the world state under its own key.
///
/// Implementors must declare their serde fields in lexicographic order of
/// their wire names: every endorsing peer re-executes the same transaction
/// and the written bytes have to agree.
pub trait Record: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static {
    /// Schema discriminator persisted in the `type` field. Versioned so that a
    /// layout change never silently reuses an old discriminator.
    const TYPE: &'static str;

    /// Ledger key.
    fn key(&self) -> &str;

    /// Canonical `identity@organization` owner string.
    fn owner(&self) -> &str;

    fn set_owner(&mut self, owner: String);

    /// Stamp the discriminator, discarding whatever the caller sent.
    fn stamp_type(&mut self);

    fn record_type(&self) -> &str;

    fn has_current_type(&self) -> bool {
        self.record_type() == Self::TYPE
    }
}
