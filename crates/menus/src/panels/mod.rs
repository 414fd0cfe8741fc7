//! Concrete panels and the registry that owns them.

pub mod action_bar;
pub mod dialogs;
pub mod inventory;
pub mod picker;
pub mod powers;
pub mod stash;
pub mod vendor;

use std::sync::Arc;

use menuhand_core::{ItemCatalog, Point, PowerCatalog};

use crate::config::MenuConfig;
use crate::panel::{Panel, PanelId};

pub use action_bar::ActionBar;
pub use dialogs::{Dialog, DialogChoice};
pub use inventory::{Inventory, InventoryArea, InventoryUse};
pub use picker::{PickerOutcome, QuantityPicker};
pub use powers::Powers;
pub use stash::Stash;
pub use vendor::{Vendor, VendorTab};

/// Fixed order in which panels are offered a click once modals and NPC
/// interactions have passed.
pub const REGISTRATION_ORDER: [PanelId; 6] = [
    PanelId::Character,
    PanelId::Stash,
    PanelId::QuestLog,
    PanelId::Inventory,
    PanelId::Powers,
    PanelId::ActionBar,
];

/// Back-to-front draw order.
pub const DRAW_ORDER: [PanelId; 13] = [
    PanelId::ActionBar,
    PanelId::Character,
    PanelId::QuestLog,
    PanelId::Stash,
    PanelId::Vendor,
    PanelId::Inventory,
    PanelId::Powers,
    PanelId::Talker,
    PanelId::NpcActions,
    PanelId::Book,
    PanelId::Exit,
    PanelId::DevConsole,
    PanelId::QuantityPicker,
];

/// Every panel, owned in one place so nothing holds references to another.
#[derive(Debug, Clone)]
pub struct MenuPanels {
    /// Inventory.
    pub inventory: Inventory,
    /// Vendor.
    pub vendor: Vendor,
    /// Stash.
    pub stash: Stash,
    /// Powers.
    pub powers: Powers,
    /// Action bar.
    pub action_bar: ActionBar,
    /// Character sheet.
    pub character: Dialog,
    /// Quest log.
    pub quest_log: Dialog,
    /// NPC conversation.
    pub talker: Dialog,
    /// NPC action menu.
    pub npc_actions: Dialog,
    /// Exit confirmation.
    pub exit: Dialog,
    /// Developer console.
    pub dev_console: Dialog,
    /// Book.
    pub book: Dialog,
    /// Quantity picker.
    pub picker: QuantityPicker,
}

impl MenuPanels {
    /// Build every panel from configuration.
    pub fn new(config: &MenuConfig, items: Arc<ItemCatalog>, powers: Arc<PowerCatalog>) -> Self {
        let dialogs = &config.dialogs;
        Self {
            inventory: Inventory::new(&config.inventory, config.currency_item, Arc::clone(&items)),
            vendor: Vendor::new(&config.vendor, Arc::clone(&items)),
            stash: Stash::new(&config.stash, items),
            powers: Powers::new(&config.powers, Arc::clone(&powers)),
            action_bar: ActionBar::new(config, powers),
            character: Dialog::new(PanelId::Character, &dialogs.character),
            quest_log: Dialog::new(PanelId::QuestLog, &dialogs.quest_log),
            talker: Dialog::new(PanelId::Talker, &dialogs.talker),
            npc_actions: Dialog::new(PanelId::NpcActions, &dialogs.npc_actions),
            exit: Dialog::new(PanelId::Exit, &dialogs.exit),
            dev_console: Dialog::new(PanelId::DevConsole, &dialogs.dev_console),
            book: Dialog::new(PanelId::Book, &dialogs.book),
            picker: QuantityPicker::new(&dialogs.quantity_picker),
        }
    }

    /// Look up a panel.
    pub fn get(&self, id: PanelId) -> &dyn Panel {
        match id {
            PanelId::Inventory => &self.inventory,
            PanelId::Vendor => &self.vendor,
            PanelId::Stash => &self.stash,
            PanelId::Powers => &self.powers,
            PanelId::ActionBar => &self.action_bar,
            PanelId::Character => &self.character,
            PanelId::QuestLog => &self.quest_log,
            PanelId::Talker => &self.talker,
            PanelId::NpcActions => &self.npc_actions,
            PanelId::Exit => &self.exit,
            PanelId::DevConsole => &self.dev_console,
            PanelId::Book => &self.book,
            PanelId::QuantityPicker => &self.picker,
        }
    }

    /// Look up a panel mutably.
    pub fn get_mut(&mut self, id: PanelId) -> &mut dyn Panel {
        match id {
            PanelId::Inventory => &mut self.inventory,
            PanelId::Vendor => &mut self.vendor,
            PanelId::Stash => &mut self.stash,
            PanelId::Powers => &mut self.powers,
            PanelId::ActionBar => &mut self.action_bar,
            PanelId::Character => &mut self.character,
            PanelId::QuestLog => &mut self.quest_log,
            PanelId::Talker => &mut self.talker,
            PanelId::NpcActions => &mut self.npc_actions,
            PanelId::Exit => &mut self.exit,
            PanelId::DevConsole => &mut self.dev_console,
            PanelId::Book => &mut self.book,
            PanelId::QuantityPicker => &mut self.picker,
        }
    }

    /// Whether a panel is shown.
    pub fn is_visible(&self, id: PanelId) -> bool {
        self.get(id).is_visible()
    }

    /// Show or hide a panel.
    pub fn set_visible(&mut self, id: PanelId, visible: bool) {
        self.get_mut(id).set_visible(visible);
    }

    /// Visible panels in draw order.
    pub fn visible(&self) -> impl Iterator<Item = PanelId> + '_ {
        DRAW_ORDER.into_iter().filter(|id| self.is_visible(*id))
    }

    /// Panel and slot under the pointer, searching front to back.
    pub fn slot_under(&self, pos: Point) -> Option<(PanelId, Option<usize>)> {
        DRAW_ORDER
            .iter()
            .rev()
            .copied()
            .find(|id| self.get(*id).contains(pos))
            .map(|id| (id, self.get(id).slot_over(pos)))
    }

    /// Clear the picked slot of every tab list.
    pub fn clear_checked(&mut self) {
        for id in PanelId::ALL {
            if let Some(tablist) = self.get_mut(id).tablist_mut() {
                tablist.clear_checked();
            }
        }
    }

    /// Normalize every item storage after external edits.
    pub fn clean_storage(&mut self) {
        self.inventory.equipment_mut().clean();
        self.inventory.carried_mut().clean();
        self.stash.stock_mut().clean();
        self.vendor.clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panels() -> MenuPanels {
        MenuPanels::new(
            &MenuConfig::default(),
            Arc::new(ItemCatalog::new()),
            Arc::new(PowerCatalog::new()),
        )
    }

    #[test]
    fn lookup_returns_matching_ids() {
        let panels = panels();
        for id in PanelId::ALL {
            assert_eq!(panels.get(id).id(), id);
        }
    }

    #[test]
    fn only_action_bar_starts_visible() {
        let panels = panels();
        assert_eq!(panels.visible().collect::<Vec<_>>(), vec![PanelId::ActionBar]);
    }

    #[test]
    fn slot_under_prefers_frontmost_panel() {
        let mut panels = panels();
        panels.set_visible(PanelId::Stash, true);
        panels.set_visible(PanelId::Talker, true);
        let talker_center = panels.talker.window_area().center();
        assert_eq!(
            panels.slot_under(talker_center).map(|(id, _)| id),
            Some(PanelId::Talker)
        );
        let corner = Point::new(2, 2);
        assert_eq!(panels.slot_under(corner), Some((PanelId::Stash, None)));
    }
}
