//! Standard content and configuration shared by scenario tests.

use std::sync::Arc;

use menuhand_core::{EquipSlot, ItemCatalog, ItemDef, ItemKind, PowerCatalog, PowerDef, Rect};
use menuhand_menus::config::PowerCellConfig;
use menuhand_menus::{MenuConfig, MenuManager};

/// Currency.
pub const GOLD: u32 = 1;
/// Stackable consumable granting [`HEAL`].
pub const POTION: u32 = 2;
/// Main-hand weapon granting [`SLASH`].
pub const SWORD: u32 = 3;
/// Quest item.
pub const LETTER: u32 = 4;
/// Head armor.
pub const HELM: u32 = 5;
/// Valuables with an explicit sell price.
pub const GEM: u32 = 6;

/// Needs a potion in the carried grid.
pub const HEAL: u32 = 10;
/// Needs the sword equipped.
pub const SLASH: u32 = 11;
/// Free power in the tree.
pub const FIREBALL: u32 = 12;
/// Free power in the tree.
pub const FROST: u32 = 13;
/// Tree power that costs a point at level 2.
pub const METEOR: u32 = 14;

fn item(id: u32, name: &str, kind: ItemKind, price: u32, max_quantity: u32) -> ItemDef {
    ItemDef {
        id,
        name: name.to_string(),
        kind,
        price,
        sell_price: None,
        max_quantity,
        power: None,
        icon: id,
        description: String::new(),
    }
}

fn power(id: u32, name: &str, requires_item: Option<u32>) -> PowerDef {
    PowerDef {
        id,
        name: name.to_string(),
        icon: 100 + id,
        description: String::new(),
        requires_item,
    }
}

/// Items and powers used across scenario tests.
pub fn fixture_catalog() -> (ItemCatalog, PowerCatalog) {
    let items = ItemCatalog::from_defs([
        item(GOLD, "Gold", ItemKind::Currency, 0, 100_000),
        ItemDef {
            power: Some(HEAL),
            ..item(POTION, "Health Potion", ItemKind::Consumable, 25, 10)
        },
        ItemDef {
            power: Some(SLASH),
            ..item(SWORD, "Short Sword", ItemKind::Equipment(EquipSlot::MainHand), 100, 1)
        },
        item(LETTER, "Sealed Letter", ItemKind::Quest, 0, 1),
        item(HELM, "Leather Cap", ItemKind::Equipment(EquipSlot::Head), 60, 1),
        ItemDef {
            sell_price: Some(30),
            ..item(GEM, "Ruby", ItemKind::Misc, 40, 5)
        },
    ]);
    let powers = PowerCatalog::from_defs([
        power(HEAL, "Heal", Some(POTION)),
        power(SLASH, "Slash", Some(SWORD)),
        power(FIREBALL, "Fireball", None),
        power(FROST, "Frost Nova", None),
        power(METEOR, "Meteor", None),
    ]);
    (items, powers)
}

/// Default layout plus a powers tree with three cells.
pub fn fixture_config() -> MenuConfig {
    let mut config = MenuConfig::default();
    config.powers.cells = [(FIREBALL, 0, false), (FROST, 0, false), (METEOR, 2, true)]
        .into_iter()
        .enumerate()
        .map(|(i, (power, requires_level, requires_point))| PowerCellConfig {
            power,
            rect: Rect::new(336 + i as i32 * 48, 48, 32, 32),
            requires_level,
            requires_point,
        })
        .collect();
    config
}

/// Manager built from [`fixture_config`] and [`fixture_catalog`].
pub fn fixture_manager() -> MenuManager {
    fixture_manager_with(fixture_config())
}

/// Manager built from a custom configuration and [`fixture_catalog`].
pub fn fixture_manager_with(config: MenuConfig) -> MenuManager {
    let (items, powers) = fixture_catalog();
    MenuManager::new(config, Arc::new(items), Arc::new(powers))
}
