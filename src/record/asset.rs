use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A shared asset.
///
/// Fields are declared in alphabetical order of their JSON names so the
/// encoding is identical on every peer.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Asset {
    #[serde(rename = "appraisedValue")]
    pub appraised_value: i64,
    pub color: String,
    pub id: String,
    pub owner: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub record_type: String,
}

impl Asset {
    pub fn new(id: &str, color: &str, size: i64, appraised_value: i64) -> Self {
        Self {
            appraised_value,
            color: color.to_string(),
            id: id.to_string(),
            owner: String::new(),
            size,
            record_type: String::new(),
        }
    }
}

/// Asset fields as submitted by a client. Unlike stored rows, every
/// business field must be present. `owner` and `type` are ignored if sent.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AssetInput {
    #[serde(rename = "appraisedValue")]
    pub appraised_value: i64,
    pub color: String,
    pub id: String,
    pub size: i64,
}

impl From<AssetInput> for Asset {
    fn from(input: AssetInput) -> Self {
        Self {
            appraised_value: input.appraised_value,
            color: input.color,
            id: input.id,
            owner: String::new(),
            size: input.size,
            record_type: String::new(),
        }
    }
}

impl Record for Asset {
    const TYPE: &'static str = "asset.v1";

    fn key(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn set_owner(&mut self, owner: String) {
        self.owner = owner;
    }

    fn stamp_type(&mut self) {
        self.record_type = Self::TYPE.to_string();
    }

    fn record_type(&self) -> &str {
        &self.record_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_layout_is_alphabetical() {
        let mut asset = Asset::new("asset1", "blue", 5, 300);
        asset.owner = "alice@Org1".to_string();
        asset.stamp_type();

        let json = serde_json::to_string(&asset).unwrap();
        assert_eq!(
            json,
            r#"{"appraisedValue":300,"color":"blue","id":"asset1","owner":"alice@Org1","size":5,"type":"asset.v1"}"#
        );
        assert_eq!(serde_json::to_vec(&asset).unwrap(), json.into_bytes());
    }

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let asset: Asset = serde_json::from_str(r#"{"id":"old","color":"red"}"#).unwrap();
        assert_eq!(asset.id, "old");
        assert_eq!(asset.size, 0);
        assert!(!asset.has_current_type());
    }

    #[test]
    fn test_input_requires_every_business_field() {
        let input: AssetInput = serde_json::from_str(
            r#"{"id":"a1","color":"blue","size":5,"appraisedValue":300,"owner":"x@y","type":"z"}"#,
        )
        .unwrap();
        let asset = Asset::from(input);
        assert_eq!(asset, Asset::new("a1", "blue", 5, 300));

        for partial in [
            r#"{"id":"x"}"#,
            r#"{"color":"blue","size":5,"appraisedValue":300}"#,
            r#"{"id":"x","color":"blue","size":5}"#,
            r#"{"id":"x","color":"blue","appraisedValue":300}"#,
        ] {
            assert!(serde_json::from_str::<AssetInput>(partial).is_err(), "{partial}");
        }
    }
}
