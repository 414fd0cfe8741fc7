//! Player inventory: typed equipment slots plus the carried grid.
//!
//! Slots are addressed with one index space: equipment slots first, then the
//! carried grid, matching the tab order.

use std::sync::Arc;

use menuhand_core::{
    EquipSlot, ItemCatalog, ItemId, ItemKind, ItemStack, Point, PowerId, Rect, TooltipContext,
    TooltipData,
};

use crate::config::InventoryLayout;
use crate::error::TransferError;
use crate::panel::{Panel, PanelBase, PanelId};
use crate::storage::{ClickMode, SlotStorage};
use crate::tablist::TabList;

/// The two inventory areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryArea {
    /// Worn items.
    Equipment,
    /// Backpack grid.
    Carried,
}

/// What activating a carried slot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryUse {
    /// One unit of a consumable was used up.
    Consumed {
        /// Item consumed.
        item: ItemId,
        /// Power the item triggers.
        power: Option<PowerId>,
    },
    /// The item was moved into its equipment slot.
    Equipped(ItemId),
}

/// Player inventory panel.
#[derive(Debug, Clone)]
pub struct Inventory {
    base: PanelBase,
    catalog: Arc<ItemCatalog>,
    equipment: SlotStorage,
    carried: SlotStorage,
    currency: ItemId,
    drag_prev_area: Option<InventoryArea>,
    equipped: Vec<ItemId>,
}

impl Inventory {
    /// Build an empty inventory from its layout.
    pub fn new(layout: &InventoryLayout, currency: ItemId, catalog: Arc<ItemCatalog>) -> Self {
        let equipment = SlotStorage::typed(
            Arc::clone(&catalog),
            layout.equipment.iter().map(|e| (e.rect, e.slot)).collect(),
        );
        let carried = SlotStorage::new(Arc::clone(&catalog), layout.carried.rects());
        let tablist = TabList::new(equipment.len() + carried.len(), layout.carried.cols);
        Self {
            base: PanelBase::with_tablist(layout.window, tablist),
            catalog,
            equipment,
            carried,
            currency,
            drag_prev_area: None,
            equipped: Vec::new(),
        }
    }

    /// Worn items.
    pub fn equipment(&self) -> &SlotStorage {
        &self.equipment
    }

    /// Backpack grid.
    pub fn carried(&self) -> &SlotStorage {
        &self.carried
    }

    /// Backpack grid, mutably. Used to seed state.
    pub fn carried_mut(&mut self) -> &mut SlotStorage {
        &mut self.carried
    }

    /// Worn items, mutably. Used to seed state.
    pub fn equipment_mut(&mut self) -> &mut SlotStorage {
        &mut self.equipment
    }

    /// Split a unified slot index into area and local index.
    pub fn locate(&self, slot: usize) -> Option<(InventoryArea, usize)> {
        let equipment = self.equipment.len();
        if slot < equipment {
            Some((InventoryArea::Equipment, slot))
        } else if slot - equipment < self.carried.len() {
            Some((InventoryArea::Carried, slot - equipment))
        } else {
            None
        }
    }

    /// Unified index of a carried slot.
    pub fn carried_index(&self, local: usize) -> usize {
        self.equipment.len() + local
    }

    fn storage(&self, area: InventoryArea) -> &SlotStorage {
        match area {
            InventoryArea::Equipment => &self.equipment,
            InventoryArea::Carried => &self.carried,
        }
    }

    fn storage_mut(&mut self, area: InventoryArea) -> &mut SlotStorage {
        match area {
            InventoryArea::Equipment => &mut self.equipment,
            InventoryArea::Carried => &mut self.carried,
        }
    }

    fn origin(&self) -> Option<(InventoryArea, usize)> {
        let area = self.drag_prev_area?;
        Some((area, self.storage(area).drag_prev_slot()?))
    }

    /// Forget the drag origin once the payload has left for good.
    pub fn finish_drag(&mut self) {
        self.drag_prev_area = None;
        self.equipment.clear_prev_slot();
        self.carried.clear_prev_slot();
        self.equipment.highlight_clear();
    }

    /// Put a stack in an equipment slot. Moves between equipment slots are
    /// not new equips.
    fn place_equipment(&mut self, local: usize, stack: ItemStack) -> ItemStack {
        if self.drag_prev_area != Some(InventoryArea::Equipment) {
            self.equipped.push(stack.item);
        }
        self.equipment.set(local, stack)
    }

    /// Stack in a unified slot.
    pub fn stack_at(&self, slot: usize) -> ItemStack {
        self.locate(slot)
            .map(|(area, local)| self.storage(area).stack_at(local))
            .unwrap_or(ItemStack::EMPTY)
    }

    /// Pick from a slot, remembering it as the drag origin.
    pub fn click(&mut self, slot: usize, mode: ClickMode) -> ItemStack {
        let Some((area, local)) = self.locate(slot) else {
            return ItemStack::EMPTY;
        };
        let stack = self.storage_mut(area).click(local, mode);
        if !stack.is_empty() {
            self.drag_prev_area = Some(area);
        }
        stack
    }

    /// Put a dragged stack back where it came from. Returns what did not fit.
    pub fn item_return(&mut self, stack: ItemStack) -> ItemStack {
        let area = self.drag_prev_area.unwrap_or(InventoryArea::Carried);
        let mut leftover = self.storage_mut(area).item_return(stack);
        if !leftover.is_empty() && area == InventoryArea::Equipment {
            leftover = self.carried.add(leftover, None);
        }
        self.finish_drag();
        leftover
    }

    /// Split `quantity` off the drag origin slot.
    pub fn remove_from_prev_slot(&mut self, quantity: u32) -> ItemStack {
        match self.drag_prev_area {
            Some(area) => self.storage_mut(area).remove_from_prev_slot(quantity),
            None => ItemStack::EMPTY,
        }
    }

    /// Drop a stack picked from this inventory onto one of its slots.
    ///
    /// On error the stack has not been taken and the caller must return it.
    pub fn drop(&mut self, slot: Option<usize>, stack: ItemStack) -> Result<(), TransferError> {
        let (area, local) = slot
            .and_then(|slot| self.locate(slot))
            .ok_or(TransferError::NoTarget)?;
        let origin = self.origin();
        let max = self.catalog.max_quantity(stack.item);

        match area {
            InventoryArea::Equipment => {
                if !self.equipment.accepts(local, stack.item) {
                    return Err(TransferError::InvalidTransfer {
                        reason: "item does not fit that equipment slot",
                    });
                }
                let occupant = self.equipment.stack_at(local);
                if occupant.is_empty() {
                    self.place_equipment(local, stack);
                } else if occupant.item == stack.item && max > 1 {
                    if !self.equipment.fits(&stack) {
                        return Err(TransferError::CapacityExceeded {
                            panel: PanelId::Inventory,
                        });
                    }
                    self.equipment.add(stack, Some(local));
                } else {
                    match origin {
                        Some((InventoryArea::Carried, o)) if self.carried.stack_at(o).is_empty() => {
                            self.carried.set(o, occupant);
                        }
                        Some((InventoryArea::Equipment, o))
                            if self.equipment.stack_at(o).is_empty()
                                && self.equipment.accepts(o, occupant.item) =>
                        {
                            self.place_equipment(o, occupant);
                        }
                        _ if self.carried.fits(&occupant) => {
                            self.carried.add(occupant, None);
                        }
                        _ => {
                            return Err(TransferError::CapacityExceeded {
                                panel: PanelId::Inventory,
                            })
                        }
                    }
                    self.place_equipment(local, stack);
                }
            }
            InventoryArea::Carried => {
                let occupant = self.carried.stack_at(local);
                if occupant.is_empty() {
                    self.carried.set(local, stack);
                } else if occupant.item == stack.item && max > 1 {
                    if !self.carried.fits(&stack) {
                        return Err(TransferError::CapacityExceeded {
                            panel: PanelId::Inventory,
                        });
                    }
                    self.carried.add(stack, Some(local));
                } else {
                    match origin {
                        Some((InventoryArea::Carried, o)) if self.carried.stack_at(o).is_empty() => {
                            self.carried.set(o, occupant);
                        }
                        Some((InventoryArea::Equipment, o))
                            if self.equipment.stack_at(o).is_empty()
                                && self.equipment.accepts(o, occupant.item) =>
                        {
                            self.place_equipment(o, occupant);
                        }
                        _ => {
                            return Err(TransferError::InvalidTransfer {
                                reason: "slot is occupied",
                            })
                        }
                    }
                    self.carried.set(local, stack);
                }
            }
        }

        self.finish_drag();
        Ok(())
    }

    /// Take a stack coming from another panel into the carried grid.
    pub fn receive(&mut self, slot: Option<usize>, stack: ItemStack) -> Result<(), TransferError> {
        if !self.carried.fits(&stack) {
            return Err(TransferError::CapacityExceeded {
                panel: PanelId::Inventory,
            });
        }
        let preferred = slot
            .and_then(|slot| self.locate(slot))
            .and_then(|(area, local)| (area == InventoryArea::Carried).then_some(local));
        let leftover = self.carried.add(stack, preferred);
        debug_assert!(leftover.is_empty());
        Ok(())
    }

    /// Add loot to the carried grid, returning what did not fit.
    pub fn add(&mut self, stack: ItemStack) -> ItemStack {
        self.carried.add(stack, None)
    }

    /// Whether the whole stack fits in the carried grid.
    pub fn fits(&self, stack: &ItemStack) -> bool {
        self.carried.fits(stack)
    }

    /// Remove one unit of an item, carried first.
    pub fn remove(&mut self, item: ItemId) -> bool {
        self.carried.remove(item) || self.equipment.remove(item)
    }

    /// Currency item id.
    pub fn currency_item(&self) -> ItemId {
        self.currency
    }

    /// Currency carried.
    pub fn currency(&self) -> u32 {
        self.carried.count(self.currency)
    }

    /// Pay `cost` currency.
    pub fn pay(&mut self, cost: u32) -> Result<(), TransferError> {
        let available = self.currency();
        if available < cost {
            return Err(TransferError::InsufficientFunds {
                needed: cost,
                available,
            });
        }
        self.carried.remove_quantity(self.currency, cost);
        Ok(())
    }

    /// Receive `amount` currency.
    pub fn credit(&mut self, amount: u32) -> Result<(), TransferError> {
        let stack = ItemStack::new(self.currency, amount);
        if !self.carried.fits(&stack) {
            return Err(TransferError::CapacityExceeded {
                panel: PanelId::Inventory,
            });
        }
        self.carried.add(stack, None);
        Ok(())
    }

    /// What the stack sells for, or why it can not be sold.
    pub fn sell_value(&self, stack: &ItemStack) -> Result<u32, TransferError> {
        let def = self
            .catalog
            .get(stack.item)
            .ok_or(TransferError::InvalidTransfer {
                reason: "unknown item",
            })?;
        match def.kind {
            ItemKind::Quest => Err(TransferError::IllegalPayload { item: def.id }),
            ItemKind::Currency => Err(TransferError::InvalidTransfer {
                reason: "currency can not be sold",
            }),
            _ if def.price == 0 => Err(TransferError::InvalidTransfer {
                reason: "item has no value",
            }),
            _ => Ok(def.sell_price().saturating_mul(stack.quantity)),
        }
    }

    /// Use or equip the item in a carried slot.
    pub fn activate(&mut self, slot: usize) -> Option<InventoryUse> {
        let (InventoryArea::Carried, local) = self.locate(slot)? else {
            return None;
        };
        let stack = self.carried.stack_at(local);
        if stack.is_empty() {
            return None;
        }
        match self.catalog.kind(stack.item) {
            ItemKind::Consumable => {
                self.carried.subtract(local, 1);
                Some(InventoryUse::Consumed {
                    item: stack.item,
                    power: self.catalog.power(stack.item),
                })
            }
            ItemKind::Equipment(kind) => {
                let target = self.equipment_slot_for(kind)?;
                let previous = self.place_equipment(target, stack);
                self.carried.set(local, previous);
                Some(InventoryUse::Equipped(stack.item))
            }
            _ => None,
        }
    }

    /// First empty equipment slot of a type, else the first of that type.
    fn equipment_slot_for(&self, kind: EquipSlot) -> Option<usize> {
        let matching: Vec<usize> = (0..self.equipment.len())
            .filter(|slot| self.equipment.slot_type(*slot) == Some(kind))
            .collect();
        matching
            .iter()
            .copied()
            .find(|slot| self.equipment.stack_at(*slot).is_empty())
            .or_else(|| matching.first().copied())
    }

    /// Whether an item is worn.
    pub fn is_equipped(&self, item: ItemId) -> bool {
        self.equipment.count(item) > 0
    }

    /// Units of an item in the carried grid.
    pub fn count_carried(&self, item: ItemId) -> u32 {
        self.carried.count(item)
    }

    /// Items equipped since the last call.
    pub fn take_equipped(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.equipped)
    }

    /// Highlight equipment slots a dragged item could go to.
    pub fn highlight_matching(&mut self, item: ItemId) {
        match self.catalog.kind(item).equip_slot() {
            Some(kind) => self.equipment.highlight_matching(kind),
            None => self.equipment.highlight_clear(),
        }
    }

    /// Clear equipment highlights.
    pub fn highlight_clear(&mut self) {
        self.equipment.highlight_clear();
    }
}

impl Panel for Inventory {
    fn id(&self) -> PanelId {
        PanelId::Inventory
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        self.equipment
            .slot_over(pos)
            .or_else(|| self.carried.slot_over(pos).map(|local| self.carried_index(local)))
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        let (area, local) = self.locate(slot)?;
        self.storage(area).slot_rect(local)
    }

    fn slot_tooltip(&self, slot: usize) -> TooltipData {
        self.catalog
            .tooltip(&self.stack_at(slot), TooltipContext::Player)
    }
}
