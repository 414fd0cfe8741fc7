#![warn(missing_docs)]
//! Content pack schema + validation helpers.

mod loader;

pub use loader::{content_from_file, content_from_str};

use std::collections::BTreeSet;

use menuhand_core::{ItemCatalog, ItemDef, ItemKind, PowerCatalog, PowerDef, NO_ITEM, NO_POWER};
use serde::Deserialize;
use thiserror::Error;

/// Raw content pack as written on disk.
#[derive(Debug, Default, Deserialize)]
pub struct ContentPack {
    /// Item definitions.
    #[serde(default)]
    pub items: Vec<ItemDef>,
    /// Power definitions.
    #[serde(default)]
    pub powers: Vec<PowerDef>,
}

/// Validated catalogs built from a content pack.
#[derive(Debug, Clone, Default)]
pub struct Content {
    /// Item catalog.
    pub items: ItemCatalog,
    /// Power catalog.
    pub powers: PowerCatalog,
}

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read content pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse content pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// The pack parsed but references or ids are inconsistent.
    #[error("invalid content pack: {0}")]
    Invalid(String),
}

/// Parse a JSON string into a raw pack without validation.
pub fn load_pack_from_str(input: &str) -> Result<ContentPack, AssetError> {
    Ok(serde_json::from_str(input)?)
}

impl ContentPack {
    /// Validate ids and cross references, then build catalogs.
    pub fn into_content(self) -> Result<Content, AssetError> {
        let mut item_ids = BTreeSet::new();
        for def in &self.items {
            if def.id == NO_ITEM {
                return Err(AssetError::Invalid(format!(
                    "item '{}' uses the reserved id 0",
                    def.name
                )));
            }
            if !item_ids.insert(def.id) {
                return Err(AssetError::Invalid(format!("duplicate item id {}", def.id)));
            }
            if def.max_quantity == 0 {
                return Err(AssetError::Invalid(format!(
                    "item {} has max_quantity 0",
                    def.id
                )));
            }
        }

        let mut power_ids = BTreeSet::new();
        for def in &self.powers {
            if def.id == NO_POWER {
                return Err(AssetError::Invalid(format!(
                    "power '{}' uses the reserved id 0",
                    def.name
                )));
            }
            if !power_ids.insert(def.id) {
                return Err(AssetError::Invalid(format!("duplicate power id {}", def.id)));
            }
            if let Some(item) = def.requires_item {
                if !item_ids.contains(&item) {
                    return Err(AssetError::Invalid(format!(
                        "power {} requires unknown item {item}",
                        def.id
                    )));
                }
            }
        }

        for def in &self.items {
            if let Some(power) = def.power {
                if !power_ids.contains(&power) {
                    return Err(AssetError::Invalid(format!(
                        "item {} grants unknown power {power}",
                        def.id
                    )));
                }
            }
        }

        let currencies = self
            .items
            .iter()
            .filter(|def| def.kind == ItemKind::Currency)
            .count();
        if currencies > 1 {
            tracing::warn!(currencies, "content pack defines more than one currency item");
        }

        Ok(Content {
            items: ItemCatalog::from_defs(self.items),
            powers: PowerCatalog::from_defs(self.powers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"{
        "items": [
            {"id": 1, "name": "Gold", "kind": {"type": "currency"}, "max_quantity": 9999},
            {"id": 2, "name": "Health Potion", "kind": {"type": "consumable"}, "price": 25, "max_quantity": 10, "power": 1},
            {"id": 3, "name": "Short Sword", "kind": {"type": "equipment", "slot": "main_hand"}, "price": 80}
        ],
        "powers": [
            {"id": 1, "name": "Drink Potion", "requires_item": 2},
            {"id": 2, "name": "Swing"}
        ]
    }"#;

    #[test]
    fn valid_pack_builds_catalogs() {
        let content = load_pack_from_str(PACK)
            .and_then(ContentPack::into_content)
            .expect("pack is valid");
        assert_eq!(content.items.len(), 3);
        assert_eq!(content.powers.len(), 2);
        assert_eq!(content.items.max_quantity(3), 1);
        assert_eq!(content.powers.requires_item(1), Some(2));
    }

    #[test]
    fn unknown_power_reference_is_rejected() {
        let pack = r#"{"items": [{"id": 4, "name": "Wand", "kind": {"type": "misc"}, "power": 99}]}"#;
        let err = load_pack_from_str(pack)
            .and_then(ContentPack::into_content)
            .expect_err("dangling power");
        assert!(matches!(err, AssetError::Invalid(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let pack = r#"{"items": [
            {"id": 4, "name": "A", "kind": {"type": "misc"}},
            {"id": 4, "name": "B", "kind": {"type": "misc"}}
        ]}"#;
        assert!(load_pack_from_str(pack)
            .and_then(ContentPack::into_content)
            .is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            load_pack_from_str("{ not json"),
            Err(AssetError::Parse(_))
        ));
    }
}
