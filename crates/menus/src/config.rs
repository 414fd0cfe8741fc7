//! Menu layout and behavior configuration.
//!
//! Everything here is plain data with a serde default, so a partial TOML file
//! only needs to name the values it overrides.

use std::fs;
use std::path::Path;

use menuhand_core::{EquipSlot, ItemId, Point, PowerId, Rect};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::panel::PanelId;

/// Where [`MenuConfig::load`] looks for the menu configuration.
pub const DEFAULT_MENU_CONFIG_PATH: &str = "config/menus.toml";

/// Uniform grid of square slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridLayout {
    /// Top-left corner of slot 0.
    pub origin: Point,
    /// Slots per row.
    pub cols: usize,
    /// Total slot count.
    pub slots: usize,
    /// Edge length of one slot in pixels.
    pub slot_size: i32,
}

impl GridLayout {
    /// Rect of slot `index`, or `None` past the end.
    pub fn slot_rect(&self, index: usize) -> Option<Rect> {
        if index >= self.slots || self.cols == 0 {
            return None;
        }
        let col = (index % self.cols) as i32;
        let row = (index / self.cols) as i32;
        Some(Rect::new(
            self.origin.x + col * self.slot_size,
            self.origin.y + row * self.slot_size,
            self.slot_size,
            self.slot_size,
        ))
    }

    /// Every slot rect in index order.
    pub fn rects(&self) -> Vec<Rect> {
        (0..self.slots).filter_map(|i| self.slot_rect(i)).collect()
    }
}

/// One typed equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EquipmentSlotConfig {
    /// Screen rect.
    pub rect: Rect,
    /// Accepted equipment type.
    pub slot: EquipSlot,
}

/// Inventory window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InventoryLayout {
    /// Window rect.
    pub window: Rect,
    /// Equipment slots, in index order.
    pub equipment: Vec<EquipmentSlotConfig>,
    /// Carried grid.
    pub carried: GridLayout,
}

/// Vendor window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VendorLayout {
    /// Window rect.
    pub window: Rect,
    /// Buy tab button.
    pub buy_tab: Rect,
    /// Sell (buy-back) tab button.
    pub sell_tab: Rect,
    /// Stock grid, shared by both tabs.
    pub grid: GridLayout,
}

/// Stash window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StashLayout {
    /// Window rect.
    pub window: Rect,
    /// Storage grid.
    pub grid: GridLayout,
}

/// One cell of the powers tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PowerCellConfig {
    /// Power shown in the cell.
    pub power: PowerId,
    /// Screen rect.
    pub rect: Rect,
    /// Minimum avatar level.
    #[serde(default)]
    pub requires_level: u32,
    /// Whether unlocking spends a power point. Cells without this are unlocked
    /// as soon as the level requirement is met.
    #[serde(default)]
    pub requires_point: bool,
}

/// Powers window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PowersLayout {
    /// Window rect.
    pub window: Rect,
    /// Power cells, in tab order.
    pub cells: Vec<PowerCellConfig>,
}

/// A menu button on the action bar that toggles a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MenuButtonConfig {
    /// Panel toggled by the button.
    pub panel: PanelId,
    /// Screen rect.
    pub rect: Rect,
}

/// Action bar strip.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionBarLayout {
    /// Window rect.
    pub window: Rect,
    /// Top-left corner of slot 0; slots are laid out in one row.
    pub origin: Point,
    /// Edge length of one slot.
    pub slot_size: i32,
    /// Menu toggle buttons.
    pub menu_buttons: Vec<MenuButtonConfig>,
}

/// A dialog without storage: a window and its focusable buttons.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DialogLayout {
    /// Window rect.
    pub window: Rect,
    /// Focusable buttons, in tab order.
    #[serde(default)]
    pub buttons: Vec<Rect>,
}

impl DialogLayout {
    fn new(window: Rect, buttons: Vec<Rect>) -> Self {
        Self { window, buttons }
    }
}

/// Layout of every storage-less dialog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DialogLayouts {
    /// Character sheet (stat upgrade buttons).
    pub character: DialogLayout,
    /// Quest log (tab buttons).
    pub quest_log: DialogLayout,
    /// NPC conversation.
    pub talker: DialogLayout,
    /// NPC action menu.
    pub npc_actions: DialogLayout,
    /// Exit confirmation (confirm, cancel).
    pub exit: DialogLayout,
    /// Developer console.
    pub dev_console: DialogLayout,
    /// Readable book.
    pub book: DialogLayout,
    /// Quantity picker (increase, decrease, confirm, cancel).
    pub quantity_picker: DialogLayout,
}

/// Top-level menu configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Inventory layout.
    pub inventory: InventoryLayout,
    /// Vendor layout.
    pub vendor: VendorLayout,
    /// Stash layout.
    pub stash: StashLayout,
    /// Powers layout.
    pub powers: PowersLayout,
    /// Action bar layout.
    pub action_bar: ActionBarLayout,
    /// Dialog layouts.
    pub dialogs: DialogLayouts,
    /// Number of action bar slots.
    pub action_bar_slots: usize,
    /// Action bar slots that can not be rebound.
    pub locked_action_slots: Vec<usize>,
    /// Item used as currency.
    pub currency_item: ItemId,
    /// Allow ctrl-click selling while no vendor is open.
    pub sell_without_vendor: bool,
    /// Whether an open menu pauses the game.
    pub menus_pause: bool,
    /// Click-to-hold dragging: the payload follows the pointer until the next click.
    pub sticky_drag: bool,
    /// Start in keyboard modality and always split stacks through the picker.
    pub keyboard_only: bool,
    /// Number of messages kept in the HUD ring.
    pub hud_log_size: usize,
}

const SLOT: i32 = 32;

impl Default for InventoryLayout {
    fn default() -> Self {
        let types = [
            EquipSlot::Head,
            EquipSlot::Chest,
            EquipSlot::Hands,
            EquipSlot::Feet,
            EquipSlot::MainHand,
            EquipSlot::OffHand,
            EquipSlot::Ring,
            EquipSlot::Artifact,
        ];
        let equipment = types
            .into_iter()
            .enumerate()
            .map(|(i, slot)| EquipmentSlotConfig {
                rect: Rect::new(
                    336 + (i as i32 % 4) * 40,
                    32 + (i as i32 / 4) * 40,
                    SLOT,
                    SLOT,
                ),
                slot,
            })
            .collect();
        Self {
            window: Rect::new(320, 0, 320, 416),
            equipment,
            carried: GridLayout {
                origin: Point::new(336, 128),
                cols: 8,
                slots: 64,
                slot_size: SLOT,
            },
        }
    }
}

impl Default for VendorLayout {
    fn default() -> Self {
        Self {
            window: Rect::new(0, 0, 320, 416),
            buy_tab: Rect::new(16, 16, 96, 24),
            sell_tab: Rect::new(112, 16, 96, 24),
            grid: GridLayout {
                origin: Point::new(16, 48),
                cols: 8,
                slots: 40,
                slot_size: SLOT,
            },
        }
    }
}

impl Default for StashLayout {
    fn default() -> Self {
        Self {
            window: Rect::new(0, 0, 320, 416),
            grid: GridLayout {
                origin: Point::new(16, 48),
                cols: 8,
                slots: 64,
                slot_size: SLOT,
            },
        }
    }
}

impl Default for PowersLayout {
    fn default() -> Self {
        Self {
            window: Rect::new(320, 0, 320, 416),
            cells: Vec::new(),
        }
    }
}

impl Default for ActionBarLayout {
    fn default() -> Self {
        let buttons = [
            PanelId::Character,
            PanelId::Inventory,
            PanelId::Powers,
            PanelId::QuestLog,
        ];
        Self {
            window: Rect::new(0, 416, 640, 64),
            origin: Point::new(32, 432),
            slot_size: SLOT,
            menu_buttons: buttons
                .into_iter()
                .enumerate()
                .map(|(i, panel)| MenuButtonConfig {
                    panel,
                    rect: Rect::new(480 + i as i32 * SLOT, 432, SLOT, SLOT),
                })
                .collect(),
        }
    }
}

impl Default for DialogLayouts {
    fn default() -> Self {
        let left = Rect::new(0, 0, 320, 416);
        Self {
            character: DialogLayout::new(
                left,
                (0..4).map(|i| Rect::new(256, 96 + i * 40, 24, 24)).collect(),
            ),
            quest_log: DialogLayout::new(
                left,
                vec![Rect::new(16, 16, 96, 24), Rect::new(112, 16, 96, 24)],
            ),
            talker: DialogLayout::new(Rect::new(160, 96, 320, 224), Vec::new()),
            npc_actions: DialogLayout::new(Rect::new(220, 140, 200, 136), Vec::new()),
            exit: DialogLayout::new(
                Rect::new(200, 160, 240, 96),
                vec![Rect::new(216, 216, 96, 24), Rect::new(328, 216, 96, 24)],
            ),
            dev_console: DialogLayout::new(Rect::new(0, 0, 640, 200), Vec::new()),
            book: DialogLayout::new(Rect::new(80, 40, 480, 336), Vec::new()),
            quantity_picker: DialogLayout::new(
                Rect::new(220, 180, 200, 96),
                vec![
                    Rect::new(376, 196, 24, 16),
                    Rect::new(376, 216, 24, 16),
                    Rect::new(236, 244, 80, 24),
                    Rect::new(324, 244, 80, 24),
                ],
            ),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            inventory: InventoryLayout::default(),
            vendor: VendorLayout::default(),
            stash: StashLayout::default(),
            powers: PowersLayout::default(),
            action_bar: ActionBarLayout::default(),
            dialogs: DialogLayouts::default(),
            action_bar_slots: 12,
            locked_action_slots: Vec::new(),
            currency_item: 1,
            sell_without_vendor: false,
            menus_pause: false,
            sticky_drag: false,
            keyboard_only: false,
            hud_log_size: 5,
        }
    }
}

impl MenuConfig {
    /// Load the menu configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_MENU_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    MenuConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Menu config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                MenuConfig::default()
            }
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Rect of action bar slot `index`.
    pub fn action_slot_rect(&self, index: usize) -> Rect {
        let size = self.action_bar.slot_size;
        Rect::new(
            self.action_bar.origin.x + index as i32 * size,
            self.action_bar.origin.y,
            size,
            size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_full_layout() {
        let cfg = MenuConfig::default();
        assert_eq!(cfg.action_bar_slots, 12);
        assert_eq!(cfg.inventory.equipment.len(), 8);
        assert_eq!(cfg.inventory.carried.rects().len(), 64);
        assert_eq!(cfg.dialogs.quantity_picker.buttons.len(), 4);
    }

    #[test]
    fn grid_slot_rects_wrap_rows() {
        let grid = GridLayout {
            origin: Point::new(10, 20),
            cols: 4,
            slots: 6,
            slot_size: 8,
        };
        assert_eq!(grid.slot_rect(0), Some(Rect::new(10, 20, 8, 8)));
        assert_eq!(grid.slot_rect(5), Some(Rect::new(18, 28, 8, 8)));
        assert_eq!(grid.slot_rect(6), None);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = MenuConfig::from_toml_str(
            r#"
            sticky_drag = true
            locked_action_slots = [0, 11]

            [stash.grid]
            origin = { x = 0, y = 0 }
            cols = 2
            slots = 4
            slot_size = 16
            "#,
        )
        .expect("valid toml");
        assert!(cfg.sticky_drag);
        assert_eq!(cfg.locked_action_slots, vec![0, 11]);
        assert_eq!(cfg.stash.grid.slots, 4);
        assert_eq!(cfg.stash.window, StashLayout::default().window);
        assert_eq!(cfg.inventory, InventoryLayout::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = MenuConfig::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(cfg, MenuConfig::default());
    }

    #[test]
    fn action_slots_lay_out_in_one_row() {
        let cfg = MenuConfig::default();
        assert_eq!(cfg.action_slot_rect(0), Rect::new(32, 432, 32, 32));
        assert_eq!(cfg.action_slot_rect(11).x, 32 + 11 * 32);
    }
}
