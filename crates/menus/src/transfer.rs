//! Cross-panel transfer table.
//!
//! Every branch either completes the transfer or hands the payload back to
//! the panel it came from. Nothing is discarded.

use menuhand_core::{ItemCatalog, ItemStack, PowerId};
use serde::Serialize;
use tracing::warn;

use crate::drag::{DragPayload, DragSource};
use crate::error::TransferError;
use crate::panel::PanelId;
use crate::panels::MenuPanels;

/// Where a drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    /// Over a panel, optionally over one of its slots.
    Panel {
        /// Target panel.
        panel: PanelId,
        /// Target slot.
        slot: Option<usize>,
    },
    /// Over the game world.
    World,
}

/// What a completed drag did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// No drag was active.
    Idle,
    /// Moved within or between storages.
    Moved,
    /// Sold to the vendor for this much currency.
    Sold {
        /// Currency credited.
        value: u32,
    },
    /// Bought from the vendor.
    Bought {
        /// Currency paid.
        cost: u32,
    },
    /// A power was bound to an action bar slot.
    Bound {
        /// Slot.
        slot: usize,
        /// Power.
        power: PowerId,
    },
    /// An action bar slot lost its binding.
    Unbound {
        /// Power removed.
        power: PowerId,
    },
    /// Dropped into the world.
    Dropped(ItemStack),
    /// A power from the tree was let go; nothing changes.
    Released,
    /// Refused and given back to the origin.
    Returned(TransferError),
}

/// Apply the transfer table to one drop.
pub(crate) fn resolve(
    panels: &mut MenuPanels,
    items: &ItemCatalog,
    source: DragSource,
    payload: DragPayload,
    target: DropTarget,
    spilled: &mut Vec<ItemStack>,
) -> TransferOutcome {
    let result = match payload {
        DragPayload::None => return TransferOutcome::Idle,
        DragPayload::Stack(stack) => resolve_stack(panels, items, source, stack, target, spilled),
        DragPayload::Power(power) => resolve_power(panels, source, power, target),
    };
    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            return_to_origin(panels, source, payload, spilled);
            TransferOutcome::Returned(err)
        }
    }
}

fn not_accepted() -> TransferError {
    TransferError::InvalidTransfer {
        reason: "target does not take this payload",
    }
}

fn resolve_stack(
    panels: &mut MenuPanels,
    items: &ItemCatalog,
    source: DragSource,
    stack: ItemStack,
    target: DropTarget,
    spilled: &mut Vec<ItemStack>,
) -> Result<TransferOutcome, TransferError> {
    use DropTarget::{Panel, World};

    match (source, target) {
        (DragSource::Inventory, Panel { panel: PanelId::Inventory, slot }) => {
            panels.inventory.drop(slot, stack)?;
            Ok(TransferOutcome::Moved)
        }
        (DragSource::Inventory, Panel { panel: PanelId::Vendor, .. }) => {
            let value = panels.inventory.sell_value(&stack)?;
            panels.inventory.credit(value)?;
            panels.inventory.finish_drag();
            panels.vendor.add_buyback(stack);
            Ok(TransferOutcome::Sold { value })
        }
        (DragSource::Inventory, Panel { panel: PanelId::Stash, slot }) => {
            panels.stash.receive(slot, stack)?;
            panels.inventory.finish_drag();
            Ok(TransferOutcome::Moved)
        }
        (DragSource::Inventory, Panel { panel: PanelId::ActionBar, slot }) => {
            // The item itself never leaves the inventory.
            let leftover = panels.inventory.item_return(stack);
            if !leftover.is_empty() {
                warn!(
                    item = leftover.item,
                    quantity = leftover.quantity,
                    "inventory could not take back its own stack"
                );
                spilled.push(leftover);
            }
            let bound = slot.zip(items.power(stack.item));
            match bound {
                Some((slot, power)) => match panels.action_bar.drop(slot, power, false) {
                    Ok(()) => Ok(TransferOutcome::Bound { slot, power }),
                    Err(err) => Ok(TransferOutcome::Returned(err)),
                },
                None => Ok(TransferOutcome::Returned(TransferError::InvalidTransfer {
                    reason: "item has no power to bind",
                })),
            }
        }
        (DragSource::Inventory, World) => {
            if items.is_quest(stack.item) {
                return Err(TransferError::IllegalPayload { item: stack.item });
            }
            panels.inventory.finish_drag();
            Ok(TransferOutcome::Dropped(stack))
        }
        (DragSource::Vendor, Panel { panel: PanelId::Inventory, slot }) => {
            let cost = panels
                .vendor
                .unit_price(&stack)
                .saturating_mul(stack.quantity);
            let available = panels.inventory.currency();
            if available < cost {
                return Err(TransferError::InsufficientFunds {
                    needed: cost,
                    available,
                });
            }
            if !panels.inventory.fits(&stack) {
                return Err(TransferError::CapacityExceeded {
                    panel: PanelId::Inventory,
                });
            }
            panels.inventory.pay(cost)?;
            panels.inventory.receive(slot, stack)?;
            panels.vendor.finish_drag();
            Ok(TransferOutcome::Bought { cost })
        }
        (DragSource::Stash, Panel { panel: PanelId::Inventory, slot }) => {
            panels.inventory.receive(slot, stack)?;
            panels.stash.finish_drag();
            Ok(TransferOutcome::Moved)
        }
        (DragSource::Stash, Panel { panel: PanelId::Stash, slot }) => {
            panels.stash.drop(slot, stack)?;
            Ok(TransferOutcome::Moved)
        }
        (DragSource::Vendor | DragSource::Stash, World) => Err(TransferError::NoTarget),
        _ => Err(not_accepted()),
    }
}

fn resolve_power(
    panels: &mut MenuPanels,
    source: DragSource,
    power: PowerId,
    target: DropTarget,
) -> Result<TransferOutcome, TransferError> {
    let bar_slot = match target {
        DropTarget::Panel {
            panel: PanelId::ActionBar,
            slot,
        } => slot,
        _ => None,
    };
    match (source, bar_slot) {
        (DragSource::Powers, Some(slot)) => {
            panels.action_bar.drop(slot, power, false)?;
            Ok(TransferOutcome::Bound { slot, power })
        }
        (DragSource::Powers, None) => Ok(TransferOutcome::Released),
        (DragSource::ActionBar, Some(slot)) => {
            panels.action_bar.drop(slot, power, true)?;
            Ok(TransferOutcome::Bound { slot, power })
        }
        (DragSource::ActionBar, None) => {
            if panels.action_bar.origin_locked() {
                let slot = panels.action_bar.drag_prev_slot().unwrap_or_default();
                return Err(TransferError::LockedSlot { slot });
            }
            panels.action_bar.finish_drag();
            Ok(TransferOutcome::Unbound { power })
        }
        _ => Err(not_accepted()),
    }
}

/// Hand a payload back to the panel it came from.
pub(crate) fn return_to_origin(
    panels: &mut MenuPanels,
    source: DragSource,
    payload: DragPayload,
    spilled: &mut Vec<ItemStack>,
) {
    match payload {
        DragPayload::None => {}
        DragPayload::Stack(stack) => {
            let leftover = match source {
                DragSource::Inventory => panels.inventory.item_return(stack),
                DragSource::Vendor => panels.vendor.item_return(stack),
                DragSource::Stash => panels.stash.item_return(stack),
                DragSource::None | DragSource::Powers | DragSource::ActionBar => stack,
            };
            if !leftover.is_empty() {
                warn!(
                    ?source,
                    item = leftover.item,
                    quantity = leftover.quantity,
                    "origin could not take back the whole stack"
                );
                spilled.push(leftover);
            }
        }
        DragPayload::Power(power) => match source {
            DragSource::ActionBar => panels.action_bar.action_return(power),
            DragSource::None
            | DragSource::Powers
            | DragSource::Inventory
            | DragSource::Vendor
            | DragSource::Stash => {}
        },
    }
}
