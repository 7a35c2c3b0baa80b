// ledger/tests/integration_tests.rs
use custodia_ledger::{
    ClientIdentity, LedgerError, TransactionContext, WorldState,
    adapters::{MemoryIdentity, MemoryLedger},
};
use std::sync::Arc;

fn setup() -> (Arc<MemoryLedger>, TransactionContext) {
    let ledger = Arc::new(MemoryLedger::new());
    let ctx = TransactionContext::new(ledger.clone(), Arc::new(MemoryIdentity::new("Org1", "alice")));
    (ledger, ctx)
}

async fn drain(ctx: &TransactionContext, query: &str) -> Vec<String> {
    let mut cursor = ctx.stub().get_query_result(query).await.unwrap();
    let mut keys = Vec::new();
    while cursor.has_next() {
        keys.push(cursor.next().unwrap().key);
    }
    cursor.close().unwrap();
    keys
}

#[tokio::test]
async fn test_put_get_delete() {
    let (_ledger, ctx) = setup();
    let stub = ctx.stub();

    assert_eq!(stub.get_state("k1").await.unwrap(), None);
    stub.put_state("k1", b"v1".to_vec()).await.unwrap();
    assert_eq!(stub.get_state("k1").await.unwrap(), Some(b"v1".to_vec()));

    stub.del_state("k1").await.unwrap();
    assert_eq!(stub.get_state("k1").await.unwrap(), None);
}

#[tokio::test]
async fn test_query_returns_matches_in_key_order() {
    let (ledger, ctx) = setup();
    ledger.insert_raw("b", br#"{"type":"asset.v1","size":2}"#.to_vec());
    ledger.insert_raw("a", br#"{"type":"asset.v1","size":1}"#.to_vec());
    ledger.insert_raw("c", br#"{"type":"other","size":3}"#.to_vec());
    ledger.insert_raw("d", b"opaque bytes".to_vec());

    let keys = drain(&ctx, r#"{"selector":{"type":"asset.v1"}}"#).await;
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

    let keys = drain(&ctx, r#"{"selector":{"size":{"$gte":2}}}"#).await;
    assert_eq!(keys, vec!["b".to_string(), "c".to_string()]);
    assert_eq!(ledger.open_cursors(), 0);
}

#[tokio::test]
async fn test_cursor_counts_until_closed() {
    let (ledger, ctx) = setup();
    ledger.insert_raw("a", br#"{"n":1}"#.to_vec());

    let mut cursor = ctx
        .stub()
        .get_query_result(r#"{"selector":{}}"#)
        .await
        .unwrap();
    assert_eq!(ledger.open_cursors(), 1);

    cursor.close().unwrap();
    cursor.close().unwrap();
    assert_eq!(ledger.open_cursors(), 0);
    assert!(!cursor.has_next());
}

#[tokio::test]
async fn test_malformed_query_is_rejected() {
    let (ledger, ctx) = setup();
    let err = ctx.stub().get_query_result("{selector").await.err().unwrap();
    assert!(matches!(err, LedgerError::Query(_)));
    assert_eq!(ledger.open_cursors(), 0);
}

#[tokio::test]
async fn test_injected_faults() {
    let (ledger, ctx) = setup();
    let stub = ctx.stub();

    ledger.conflict_on("hot");
    assert_eq!(
        stub.put_state("hot", b"x".to_vec()).await,
        Err(LedgerError::WriteConflict("hot".to_string()))
    );

    ledger.fail_writes(true);
    assert!(matches!(
        stub.put_state("k", b"x".to_vec()).await,
        Err(LedgerError::Storage(_))
    ));
    ledger.fail_writes(false);

    stub.put_state("k", b"x".to_vec()).await.unwrap();
    ledger.fail_deletes(true);
    assert!(matches!(stub.del_state("k").await, Err(LedgerError::Storage(_))));
    assert_eq!(ledger.raw("k"), Some(b"x".to_vec()));

    ledger.insert_raw("j", br#"{"n":1}"#.to_vec());
    ledger.fail_iteration_at(Some(0));
    let mut cursor = stub.get_query_result(r#"{"selector":{}}"#).await.unwrap();
    assert!(cursor.has_next());
    assert!(matches!(cursor.next(), Err(LedgerError::Storage(_))));
    cursor.close().unwrap();
}

#[tokio::test]
async fn test_state_digest_tracks_content() {
    let first = MemoryLedger::new();
    let second = MemoryLedger::new();
    assert_eq!(first.state_digest(), second.state_digest());

    first.put_state("a", b"1".to_vec()).await.unwrap();
    first.put_state("b", b"2".to_vec()).await.unwrap();
    second.put_state("b", b"2".to_vec()).await.unwrap();
    second.put_state("a", b"1".to_vec()).await.unwrap();
    assert_eq!(first.state_digest(), second.state_digest());

    second.put_state("a", b"one".to_vec()).await.unwrap();
    assert_ne!(first.state_digest(), second.state_digest());
}

#[test]
fn test_identity_resolution() {
    let identity = MemoryIdentity::new("Org1", "alice");
    assert_eq!(identity.msp_id().unwrap(), "Org1");
    assert_eq!(identity.common_name().unwrap(), "alice");

    let missing = MemoryIdentity::unresolvable();
    assert!(matches!(missing.msp_id(), Err(LedgerError::Identity(_))));
    assert!(matches!(missing.common_name(), Err(LedgerError::Identity(_))));
}
