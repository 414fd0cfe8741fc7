//! Action bar: hotkey slots bound to powers, plus menu toggle buttons.

use std::sync::Arc;

use menuhand_core::{
    ItemCatalog, ItemKind, Point, PowerCatalog, PowerId, Rect, TooltipColor, TooltipData,
    NO_POWER,
};

use crate::config::{MenuButtonConfig, MenuConfig};
use crate::error::TransferError;
use crate::panel::{Panel, PanelBase, PanelId};
use crate::panels::inventory::Inventory;
use crate::tablist::TabList;

/// Action bar panel. Always visible.
#[derive(Debug, Clone)]
pub struct ActionBar {
    base: PanelBase,
    powers: Arc<PowerCatalog>,
    slot_rects: Vec<Rect>,
    hotkeys: Vec<PowerId>,
    locked: Vec<bool>,
    enabled: Vec<bool>,
    item_counts: Vec<Option<u32>>,
    menu_buttons: Vec<MenuButtonConfig>,
    drag_prev_slot: Option<usize>,
}

impl ActionBar {
    /// Empty bar with the configured slot count and locks.
    pub fn new(config: &MenuConfig, powers: Arc<PowerCatalog>) -> Self {
        let count = config.action_bar_slots;
        let slot_rects = (0..count).map(|i| config.action_slot_rect(i)).collect();
        let mut locked = vec![false; count];
        for slot in &config.locked_action_slots {
            match locked.get_mut(*slot) {
                Some(flag) => *flag = true,
                None => tracing::warn!(slot, count, "locked action slot out of range"),
            }
        }
        let mut base = PanelBase::with_tablist(config.action_bar.window, TabList::new(count, count));
        base.visible = true;
        Self {
            base,
            powers,
            slot_rects,
            hotkeys: vec![NO_POWER; count],
            locked,
            enabled: vec![true; count],
            item_counts: vec![None; count],
            menu_buttons: config.action_bar.menu_buttons.clone(),
            drag_prev_slot: None,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.hotkeys.len()
    }

    /// Whether the bar has no slots.
    pub fn is_empty(&self) -> bool {
        self.hotkeys.is_empty()
    }

    /// Bound powers in slot order.
    pub fn hotkeys(&self) -> &[PowerId] {
        &self.hotkeys
    }

    /// Power bound to a slot.
    pub fn power_at(&self, slot: usize) -> PowerId {
        self.hotkeys.get(slot).copied().unwrap_or(NO_POWER)
    }

    /// Whether a slot is locked.
    pub fn is_locked(&self, slot: usize) -> bool {
        self.locked.get(slot).copied().unwrap_or(false)
    }

    /// Whether a slot can be used right now.
    pub fn is_enabled(&self, slot: usize) -> bool {
        self.enabled.get(slot).copied().unwrap_or(false)
    }

    /// Consumable count shown on a slot.
    pub fn item_count(&self, slot: usize) -> Option<u32> {
        self.item_counts.get(slot).copied().flatten()
    }

    /// Replace every binding (loaded state). Extra entries are ignored.
    pub fn set_hotkeys(&mut self, hotkeys: &[PowerId]) {
        for (slot, power) in self.hotkeys.iter_mut().zip(hotkeys) {
            *slot = *power;
        }
    }

    /// Menu button under the pointer.
    pub fn menu_button_at(&self, pos: Point) -> Option<PanelId> {
        self.menu_buttons
            .iter()
            .find(|button| button.rect.contains(pos))
            .map(|button| button.panel)
    }

    /// Lift the power out of a slot to start dragging it.
    pub fn check_drag(&mut self, slot: usize) -> PowerId {
        let Some(bound) = self.hotkeys.get_mut(slot) else {
            return NO_POWER;
        };
        let power = std::mem::replace(bound, NO_POWER);
        if power != NO_POWER {
            self.drag_prev_slot = Some(slot);
        }
        power
    }

    /// Slot the current drag came from.
    pub fn drag_prev_slot(&self) -> Option<usize> {
        self.drag_prev_slot
    }

    /// Bind a power to a slot.
    ///
    /// When `rearranging`, the power came from another slot of this bar: the
    /// two slots swap bindings and lock flags. Dropping onto a locked slot is
    /// refused either way.
    pub fn drop(&mut self, slot: usize, power: PowerId, rearranging: bool) -> Result<(), TransferError> {
        if slot >= self.hotkeys.len() {
            return Err(TransferError::NoTarget);
        }
        if self.locked[slot] {
            return Err(TransferError::LockedSlot { slot });
        }
        if let Some(origin) = self.drag_prev_slot.filter(|_| rearranging) {
            self.hotkeys[origin] = self.hotkeys[slot];
            self.locked.swap(origin, slot);
        }
        self.hotkeys[slot] = power;
        self.drag_prev_slot = None;
        Ok(())
    }

    /// Put a dragged power back in the slot it came from.
    pub fn action_return(&mut self, power: PowerId) {
        if let Some(slot) = self.drag_prev_slot.take() {
            self.hotkeys[slot] = power;
        }
    }

    /// Whether the slot the current drag came from is locked.
    pub fn origin_locked(&self) -> bool {
        self.drag_prev_slot.is_some_and(|slot| self.locked[slot])
    }

    /// Forget the drag origin; the dragged power is discarded.
    pub fn finish_drag(&mut self) {
        self.drag_prev_slot = None;
    }

    /// Clear a slot's binding (ctrl-click).
    pub fn remove(&mut self, slot: usize) -> Result<PowerId, TransferError> {
        if self.is_locked(slot) {
            return Err(TransferError::LockedSlot { slot });
        }
        let Some(bound) = self.hotkeys.get_mut(slot) else {
            return Err(TransferError::NoTarget);
        };
        Ok(std::mem::replace(bound, NO_POWER))
    }

    /// Bind a power to the first empty unlocked slot unless already bound.
    pub fn add_power(&mut self, power: PowerId) -> Option<usize> {
        if power == NO_POWER || self.hotkeys.contains(&power) {
            return None;
        }
        let slot = (0..self.hotkeys.len())
            .find(|slot| self.hotkeys[*slot] == NO_POWER && !self.locked[*slot])?;
        self.hotkeys[slot] = power;
        Some(slot)
    }

    /// Power to use when a slot is activated, if usable.
    pub fn check_action(&self, slot: usize) -> Option<PowerId> {
        let power = self.power_at(slot);
        (power != NO_POWER && self.is_enabled(slot)).then_some(power)
    }

    /// Refresh item counts and enabled flags from the inventory.
    pub fn update_item_state(&mut self, inventory: &Inventory, items: &ItemCatalog) {
        for slot in 0..self.hotkeys.len() {
            let required = self.powers.requires_item(self.hotkeys[slot]);
            let (enabled, count) = match required {
                None => (true, None),
                Some(item) if items.kind(item) == ItemKind::Consumable => {
                    let count = inventory.count_carried(item);
                    (count > 0, Some(count))
                }
                Some(item) => (inventory.is_equipped(item), None),
            };
            self.enabled[slot] = enabled;
            self.item_counts[slot] = count;
        }
    }
}

impl Panel for ActionBar {
    fn id(&self) -> PanelId {
        PanelId::ActionBar
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        self.slot_rects.iter().position(|rect| rect.contains(pos))
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        self.slot_rects.get(slot).copied()
    }

    fn slot_tooltip(&self, slot: usize) -> TooltipData {
        let mut tip = self.powers.tooltip(self.power_at(slot));
        if !tip.is_empty() && self.is_locked(slot) {
            tip.add_text("Locked", TooltipColor::Muted);
        }
        tip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(locked: Vec<usize>) -> ActionBar {
        let config = MenuConfig {
            locked_action_slots: locked,
            ..MenuConfig::default()
        };
        ActionBar::new(&config, Arc::new(PowerCatalog::new()))
    }

    #[test]
    fn drop_binds_and_replaces() {
        let mut ab = bar(vec![]);
        assert_eq!(ab.drop(2, 5, false), Ok(()));
        assert_eq!(ab.power_at(2), 5);
        assert_eq!(ab.drop(2, 6, false), Ok(()));
        assert_eq!(ab.power_at(2), 6);
    }

    #[test]
    fn locked_slot_refuses_drop() {
        let mut ab = bar(vec![3]);
        assert_eq!(ab.drop(3, 5, false), Err(TransferError::LockedSlot { slot: 3 }));
        assert_eq!(ab.power_at(3), NO_POWER);
    }

    #[test]
    fn rearranging_swaps_bindings() {
        let mut ab = bar(vec![]);
        ab.set_hotkeys(&[1, 2]);
        let power = ab.check_drag(0);
        assert_eq!(power, 1);
        assert_eq!(ab.drop(1, power, true), Ok(()));
        assert_eq!(ab.hotkeys()[..2], [2, 1]);
    }

    #[test]
    fn rearranging_from_locked_slot_moves_the_lock() {
        let mut ab = bar(vec![0]);
        ab.set_hotkeys(&[1, 2]);
        let power = ab.check_drag(0);
        assert!(ab.origin_locked());
        assert_eq!(ab.drop(1, power, true), Ok(()));
        assert!(ab.is_locked(1));
        assert!(!ab.is_locked(0));
        assert_eq!(ab.power_at(0), 2);
    }

    #[test]
    fn action_return_restores_origin() {
        let mut ab = bar(vec![]);
        ab.set_hotkeys(&[0, 0, 7]);
        let power = ab.check_drag(2);
        assert_eq!(ab.power_at(2), NO_POWER);
        ab.action_return(power);
        assert_eq!(ab.power_at(2), 7);
    }

    #[test]
    fn add_power_skips_locked_and_bound() {
        let mut ab = bar(vec![0]);
        assert_eq!(ab.add_power(4), Some(1));
        assert_eq!(ab.add_power(4), None);
        assert_eq!(ab.add_power(NO_POWER), None);
    }

    #[test]
    fn remove_respects_locks() {
        let mut ab = bar(vec![1]);
        ab.set_hotkeys(&[3, 4]);
        assert_eq!(ab.remove(0), Ok(3));
        assert_eq!(ab.remove(1), Err(TransferError::LockedSlot { slot: 1 }));
        assert_eq!(ab.power_at(1), 4);
    }

    #[test]
    fn menu_buttons_map_to_panels() {
        let ab = bar(vec![]);
        let rect = MenuConfig::default().action_bar.menu_buttons[1].rect;
        assert_eq!(ab.menu_button_at(rect.center()), Some(PanelId::Inventory));
    }
}
