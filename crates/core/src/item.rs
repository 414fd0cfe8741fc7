//! Item system - stacks, item kinds and the item catalog

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::power::PowerId;
use crate::tooltip::{TooltipColor, TooltipData};

/// Item identifier referencing the item catalog. `0` means "no item".
pub type ItemId = u32;

/// The reserved "no item" id.
pub const NO_ITEM: ItemId = 0;

/// A quantity of one item. A stack with zero quantity is empty and always
/// carries [`NO_ITEM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub item: ItemId,
    /// Number of items in this stack.
    pub quantity: u32,
}

impl ItemStack {
    /// The empty stack.
    pub const EMPTY: Self = Self {
        item: NO_ITEM,
        quantity: 0,
    };

    /// Create a stack, normalizing to [`ItemStack::EMPTY`] when either part is zero.
    pub fn new(item: ItemId, quantity: u32) -> Self {
        if item == NO_ITEM || quantity == 0 {
            Self::EMPTY
        } else {
            Self { item, quantity }
        }
    }

    /// Whether the stack holds nothing.
    pub fn is_empty(&self) -> bool {
        self.item == NO_ITEM || self.quantity == 0
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Same item with a different quantity.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self::new(self.item, quantity)
    }

    /// Remove up to `amount`, returning how many were actually removed.
    pub fn take(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        if self.quantity == 0 {
            self.clear();
        }
        removed
    }
}

/// Equipment slot type. An equippable item only fits slots of its own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    /// Helmets.
    Head,
    /// Body armor.
    Chest,
    /// Gloves.
    Hands,
    /// Boots.
    Feet,
    /// Weapons.
    MainHand,
    /// Shields and off-hand foci.
    OffHand,
    /// Rings.
    Ring,
    /// Artifacts and trinkets.
    Artifact,
}

/// What an item is, which decides where it may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "slot")]
pub enum ItemKind {
    /// Wearable in the given equipment slot.
    Equipment(EquipSlot),
    /// Used up on activation (potions, scrolls).
    Consumable,
    /// Quest items: never sold, stashed or dropped.
    Quest,
    /// Currency.
    Currency,
    /// Anything else.
    Misc,
}

impl ItemKind {
    /// Equipment slot type, if this kind is wearable.
    pub fn equip_slot(self) -> Option<EquipSlot> {
        match self {
            ItemKind::Equipment(slot) => Some(slot),
            _ => None,
        }
    }
}

/// Where a tooltip is being shown, which decides the price line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TooltipContext {
    /// Player inventory or stash.
    Player,
    /// Vendor stock (buy price).
    VendorBuy,
    /// Vendor buy-back (sell price).
    VendorSell,
}

/// Catalog entry for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Item id (never [`NO_ITEM`]).
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Item kind.
    pub kind: ItemKind,
    /// Vendor buy price per unit; zero means the item cannot be sold.
    #[serde(default)]
    pub price: u32,
    /// Sell price per unit. Defaults to a quarter of `price`.
    #[serde(default)]
    pub sell_price: Option<u32>,
    /// Maximum stack size.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
    /// Power granted by this item (bound to the action bar).
    #[serde(default)]
    pub power: Option<PowerId>,
    /// Icon index in the icon sheet.
    #[serde(default)]
    pub icon: u32,
    /// Free-form description shown in tooltips.
    #[serde(default)]
    pub description: String,
}

fn default_max_quantity() -> u32 {
    1
}

impl ItemDef {
    /// Effective sell price per unit.
    pub fn sell_price(&self) -> u32 {
        self.sell_price.unwrap_or(self.price / 4)
    }

    /// Quest items cannot leave the player's carried area.
    pub fn is_quest(&self) -> bool {
        self.kind == ItemKind::Quest
    }
}

/// Lookup table of item definitions.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, ItemDef>,
}

impl ItemCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions. Later duplicates replace earlier ones.
    pub fn from_defs(defs: impl IntoIterator<Item = ItemDef>) -> Self {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(def);
        }
        catalog
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, def: ItemDef) {
        self.items.insert(def.id, def);
    }

    /// Look up a definition.
    pub fn get(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    /// Number of known items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum stack size, `1` for unknown items.
    pub fn max_quantity(&self, id: ItemId) -> u32 {
        self.get(id).map_or(1, |def| def.max_quantity.max(1))
    }

    /// Kind of an item, [`ItemKind::Misc`] for unknown ids.
    pub fn kind(&self, id: ItemId) -> ItemKind {
        self.get(id).map_or(ItemKind::Misc, |def| def.kind)
    }

    /// Whether the item is a quest item.
    pub fn is_quest(&self, id: ItemId) -> bool {
        self.get(id).is_some_and(ItemDef::is_quest)
    }

    /// Power carried by the item, if any.
    pub fn power(&self, id: ItemId) -> Option<PowerId> {
        self.get(id).and_then(|def| def.power)
    }

    /// Display name, or a placeholder for unknown ids.
    pub fn name(&self, id: ItemId) -> String {
        self.get(id)
            .map_or_else(|| format!("Unknown item #{id}"), |def| def.name.clone())
    }

    /// Build the tooltip for a stack.
    pub fn tooltip(&self, stack: &ItemStack, context: TooltipContext) -> TooltipData {
        let mut tip = TooltipData::new();
        if stack.is_empty() {
            return tip;
        }
        let Some(def) = self.get(stack.item) else {
            tip.add_text(&self.name(stack.item), TooltipColor::Warning);
            return tip;
        };

        if stack.quantity > 1 {
            tip.add_text(&format!("{} ({})", def.name, stack.quantity), TooltipColor::Title);
        } else {
            tip.add_text(&def.name, TooltipColor::Title);
        }

        match def.kind {
            ItemKind::Equipment(slot) => {
                tip.add_text(&format!("Equipment: {slot:?}"), TooltipColor::Normal)
            }
            ItemKind::Consumable => tip.add_text("Consumable", TooltipColor::Normal),
            ItemKind::Quest => tip.add_text("Quest item", TooltipColor::Highlight),
            ItemKind::Currency | ItemKind::Misc => {}
        }

        if !def.description.is_empty() {
            tip.add_text(&def.description, TooltipColor::Muted);
        }

        match context {
            TooltipContext::VendorBuy if def.price > 0 => tip.add_text(
                &format!("Buy price: {}", def.price * stack.quantity),
                TooltipColor::Highlight,
            ),
            TooltipContext::VendorSell | TooltipContext::Player if def.price > 0 => {
                if def.kind != ItemKind::Currency {
                    tip.add_text(
                        &format!("Sell price: {}", def.sell_price() * stack.quantity),
                        TooltipColor::Highlight,
                    );
                }
            }
            _ => {}
        }

        tip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potion() -> ItemDef {
        ItemDef {
            id: 1,
            name: "Health Potion".into(),
            kind: ItemKind::Consumable,
            price: 20,
            sell_price: None,
            max_quantity: 10,
            power: Some(7),
            icon: 0,
            description: String::new(),
        }
    }

    #[test]
    fn zero_quantity_normalizes_to_empty() {
        assert_eq!(ItemStack::new(5, 0), ItemStack::EMPTY);
        assert_eq!(ItemStack::new(NO_ITEM, 3), ItemStack::EMPTY);
        assert!(ItemStack::EMPTY.is_empty());
    }

    #[test]
    fn take_clears_at_zero() {
        let mut stack = ItemStack::new(1, 3);
        assert_eq!(stack.take(5), 3);
        assert!(stack.is_empty());
        assert_eq!(stack.item, NO_ITEM);
    }

    #[test]
    fn sell_price_defaults_to_quarter() {
        assert_eq!(potion().sell_price(), 5);
    }

    #[test]
    fn catalog_lookups() {
        let catalog = ItemCatalog::from_defs([potion()]);
        assert_eq!(catalog.max_quantity(1), 10);
        assert_eq!(catalog.max_quantity(99), 1);
        assert_eq!(catalog.power(1), Some(7));
        assert!(!catalog.is_quest(1));
    }

    #[test]
    fn vendor_tooltip_shows_buy_price_for_whole_stack() {
        let catalog = ItemCatalog::from_defs([potion()]);
        let tip = catalog.tooltip(&ItemStack::new(1, 3), TooltipContext::VendorBuy);
        assert!(tip.compare_first_line("Health Potion (3)"));
        assert!(tip.lines().iter().any(|l| l.text == "Buy price: 60"));
    }

    #[test]
    fn item_kind_deserializes_from_tagged_json() {
        let kind: ItemKind = serde_json::from_str(r#"{"type":"equipment","slot":"main_hand"}"#)
            .expect("valid kind");
        assert_eq!(kind.equip_slot(), Some(EquipSlot::MainHand));
    }
}
