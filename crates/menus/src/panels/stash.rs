//! Player stash.

use std::sync::Arc;

use menuhand_core::{ItemCatalog, ItemStack, Point, Rect, TooltipContext, TooltipData};

use crate::config::StashLayout;
use crate::error::TransferError;
use crate::panel::{Panel, PanelBase, PanelId};
use crate::storage::{ClickMode, SlotStorage};
use crate::tablist::TabList;

/// Stash panel: one storage grid.
#[derive(Debug, Clone)]
pub struct Stash {
    base: PanelBase,
    catalog: Arc<ItemCatalog>,
    stock: SlotStorage,
}

impl Stash {
    /// Empty stash.
    pub fn new(layout: &StashLayout, catalog: Arc<ItemCatalog>) -> Self {
        let stock = SlotStorage::new(Arc::clone(&catalog), layout.grid.rects());
        let tablist = TabList::new(stock.len(), layout.grid.cols);
        Self {
            base: PanelBase::with_tablist(layout.window, tablist),
            catalog,
            stock,
        }
    }

    /// Storage grid.
    pub fn stock(&self) -> &SlotStorage {
        &self.stock
    }

    /// Storage grid, mutably. Used to seed state.
    pub fn stock_mut(&mut self) -> &mut SlotStorage {
        &mut self.stock
    }

    /// Pick from a slot.
    pub fn click(&mut self, slot: usize, mode: ClickMode) -> ItemStack {
        self.stock.click(slot, mode)
    }

    /// Put a dragged stack back. Returns what did not fit.
    pub fn item_return(&mut self, stack: ItemStack) -> ItemStack {
        self.stock.item_return(stack)
    }

    /// Split off the drag origin slot.
    pub fn remove_from_prev_slot(&mut self, quantity: u32) -> ItemStack {
        self.stock.remove_from_prev_slot(quantity)
    }

    /// Forget the drag origin after a completed withdrawal.
    pub fn finish_drag(&mut self) {
        self.stock.clear_prev_slot();
    }

    /// Rearrange a stack picked from this stash.
    pub fn drop(&mut self, slot: Option<usize>, stack: ItemStack) -> Result<(), TransferError> {
        let slot = slot
            .filter(|slot| *slot < self.stock.len())
            .ok_or(TransferError::NoTarget)?;
        let occupant = self.stock.stack_at(slot);
        if occupant.is_empty() {
            self.stock.set(slot, stack);
        } else if occupant.item == stack.item && self.catalog.max_quantity(stack.item) > 1 {
            if !self.stock.fits(&stack) {
                return Err(TransferError::CapacityExceeded {
                    panel: PanelId::Stash,
                });
            }
            self.stock.add(stack, Some(slot));
        } else {
            match self.stock.drag_prev_slot() {
                Some(origin) if self.stock.stack_at(origin).is_empty() => {
                    self.stock.set(origin, occupant);
                    self.stock.set(slot, stack);
                }
                _ => {
                    return Err(TransferError::InvalidTransfer {
                        reason: "slot is occupied",
                    })
                }
            }
        }
        self.stock.clear_prev_slot();
        Ok(())
    }

    /// Store a stack coming from the inventory.
    pub fn receive(&mut self, slot: Option<usize>, stack: ItemStack) -> Result<(), TransferError> {
        if self.catalog.is_quest(stack.item) {
            return Err(TransferError::IllegalPayload { item: stack.item });
        }
        if !self.stock.fits(&stack) {
            return Err(TransferError::CapacityExceeded {
                panel: PanelId::Stash,
            });
        }
        let leftover = self.stock.add(stack, slot);
        debug_assert!(leftover.is_empty());
        Ok(())
    }
}

impl Panel for Stash {
    fn id(&self) -> PanelId {
        PanelId::Stash
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        self.stock.slot_over(pos)
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        self.stock.slot_rect(slot)
    }

    fn slot_tooltip(&self, slot: usize) -> TooltipData {
        self.catalog
            .tooltip(&self.stock.stack_at(slot), TooltipContext::Player)
    }
}
