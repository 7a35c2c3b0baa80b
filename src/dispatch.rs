//! Routes a platform invocation `(function, args)` to the contract.
//!
//! Arguments arrive as strings: asset payloads are JSON objects, ids, owners
//! and queries are taken verbatim. Results are JSON, or empty for operations
//! that return nothing.

use ledger::TransactionContext;
use serde::Serialize;

use crate::{
    contract::AssetContract,
    error::Error,
    record::{Asset, AssetInput},
};

/// Functions the contract exposes to the platform.
pub const FUNCTIONS: &[&str] = &[
    "CreateAsset",
    "ReadAsset",
    "UpdateAsset",
    "DeleteAsset",
    "AssetExists",
    "TransferAsset",
    "GetAllAssets",
    "QueryAssets",
];

pub async fn invoke(
    contract: &AssetContract,
    ctx: &TransactionContext,
    function: &str,
    args: &[String],
) -> Result<Vec<u8>, Error> {
    match function {
        "CreateAsset" => {
            let [payload] = arity::<1>(function, args)?;
            contract.create_asset(ctx, parse_asset(payload)?).await?;
            Ok(Vec::new())
        }
        "ReadAsset" => {
            let [id] = arity::<1>(function, args)?;
            to_json(&contract.read_asset(ctx, id).await?)
        }
        "UpdateAsset" => {
            let [payload] = arity::<1>(function, args)?;
            contract.update_asset(ctx, parse_asset(payload)?).await?;
            Ok(Vec::new())
        }
        "DeleteAsset" => {
            let [id] = arity::<1>(function, args)?;
            contract.delete_asset(ctx, id).await?;
            Ok(Vec::new())
        }
        "AssetExists" => {
            let [id] = arity::<1>(function, args)?;
            to_json(&contract.asset_exists(ctx, id).await?)
        }
        "TransferAsset" => {
            let [id, new_owner] = arity::<2>(function, args)?;
            to_json(&contract.transfer_asset(ctx, id, new_owner).await?)
        }
        "GetAllAssets" => {
            arity::<0>(function, args)?;
            to_json(&contract.get_all_assets(ctx).await?)
        }
        "QueryAssets" => {
            let [query] = arity::<1>(function, args)?;
            to_json(&contract.query_assets(ctx, query).await?)
        }
        other => Err(Error::InvalidArgument(format!(
            "unknown function {:?}, expected one of {}",
            other,
            FUNCTIONS.join(", ")
        ))),
    }
}

fn arity<'a, const N: usize>(function: &str, args: &'a [String]) -> Result<[&'a str; N], Error> {
    if args.len() != N {
        return Err(Error::InvalidArgument(format!(
            "{} takes {} argument(s), got {}",
            function,
            N,
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

fn parse_asset(payload: &str) -> Result<Asset, Error> {
    serde_json::from_str::<AssetInput>(payload)
        .map(Asset::from)
        .map_err(|e| Error::InvalidArgument(format!("asset payload: {}", e)))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| Error::Serialize(e.to_string()))
}
