use crate::enums::AssetKind;
use serde::{Deserialize, Serialize};

/// Decimal count assumed when the source returns no metadata.
pub const DEFAULT_DECIMALS: u32 = 9;

/// Token metadata as published on DeDust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}

/// One side of a liquidity pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Contract address; empty for the native coin.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

impl Asset {
    /// Native-coin asset with no metadata.
    pub fn native() -> Self {
        Self {
            kind: AssetKind::Native,
            address: String::new(),
            metadata: None,
        }
    }

    /// Jetton asset with no metadata.
    pub fn jetton(address: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Jetton,
            address: address.into(),
            metadata: None,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata.as_ref().map(|m| m.name.as_str()).unwrap_or("")
    }

    pub fn symbol(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.symbol.as_str())
            .unwrap_or("")
    }

    pub fn image(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.image.as_str())
            .unwrap_or("")
    }

    /// Declared decimals, or [`DEFAULT_DECIMALS`] when metadata is absent.
    pub fn decimals(&self) -> u32 {
        self.metadata
            .as_ref()
            .map(|m| m.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_apply_when_absent() {
        let asset = Asset::native();
        assert_eq!(asset.decimals(), DEFAULT_DECIMALS);
        assert_eq!(asset.symbol(), "");
    }

    #[test]
    fn deserializes_jetton_with_metadata() {
        let json = r#"{
            "type": "jetton",
            "address": "0:aa00",
            "metadata": {"name": "Open", "symbol": "OPEN", "decimals": 5}
        }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.kind, AssetKind::Jetton);
        assert_eq!(asset.symbol(), "OPEN");
        assert_eq!(asset.decimals(), 5);
        assert_eq!(asset.image(), "");
    }

    #[test]
    fn metadata_decimals_default_to_nine() {
        let json = r#"{"type": "jetton", "address": "0:aa00", "metadata": {"symbol": "X"}}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.decimals(), DEFAULT_DECIMALS);
    }
}
