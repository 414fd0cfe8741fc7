//! Powers that can be bound to the action bar.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::ItemId;
use crate::tooltip::{TooltipColor, TooltipData};

/// Power identifier. `0` means "no power".
pub type PowerId = u32;

/// The reserved "no power" id.
pub const NO_POWER: PowerId = 0;

/// Catalog entry for a power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerDef {
    /// Power id (never [`NO_POWER`]).
    pub id: PowerId,
    /// Display name.
    pub name: String,
    /// Icon index in the icon sheet.
    #[serde(default)]
    pub icon: u32,
    /// Description shown in tooltips.
    #[serde(default)]
    pub description: String,
    /// Item that must be carried (consumables) or equipped (gear) to use the power.
    #[serde(default)]
    pub requires_item: Option<ItemId>,
}

/// Lookup table of power definitions.
#[derive(Debug, Clone, Default)]
pub struct PowerCatalog {
    powers: BTreeMap<PowerId, PowerDef>,
}

impl PowerCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions.
    pub fn from_defs(defs: impl IntoIterator<Item = PowerDef>) -> Self {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(def);
        }
        catalog
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, def: PowerDef) {
        self.powers.insert(def.id, def);
    }

    /// Look up a definition.
    pub fn get(&self, id: PowerId) -> Option<&PowerDef> {
        self.powers.get(&id)
    }

    /// Number of known powers.
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// Icon for a power, `0` when unknown.
    pub fn icon(&self, id: PowerId) -> u32 {
        self.get(id).map_or(0, |def| def.icon)
    }

    /// Item the power depends on.
    pub fn requires_item(&self, id: PowerId) -> Option<ItemId> {
        self.get(id).and_then(|def| def.requires_item)
    }

    /// Tooltip for a power. Empty for [`NO_POWER`].
    pub fn tooltip(&self, id: PowerId) -> TooltipData {
        let mut tip = TooltipData::new();
        if id == NO_POWER {
            return tip;
        }
        match self.get(id) {
            Some(def) => {
                tip.add_text(&def.name, TooltipColor::Title);
                if !def.description.is_empty() {
                    tip.add_text(&def.description, TooltipColor::Normal);
                }
            }
            None => tip.add_text(&format!("Unknown power #{id}"), TooltipColor::Warning),
        }
        tip
    }
}
