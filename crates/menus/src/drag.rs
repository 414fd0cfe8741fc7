//! The single item/power "in hand".
//!
//! [`DragController`] is the only owner of [`DragState`]. Panels hand over a
//! payload when clicked and get it back through their return operations; they
//! never touch the drag state themselves.

use std::sync::Arc;

use menuhand_core::{ItemCatalog, ItemStack, PowerCatalog, PowerId, NO_POWER};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::panel::PanelId;
use crate::panels::MenuPanels;
use crate::storage::ClickMode;
use crate::transfer::{self, DropTarget, TransferOutcome};

/// Which panel a drag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSource {
    /// No drag.
    #[default]
    None,
    /// Powers tree.
    Powers,
    /// Inventory.
    Inventory,
    /// Action bar.
    ActionBar,
    /// Vendor.
    Vendor,
    /// Stash.
    Stash,
}

impl DragSource {
    /// Panel the drag came from.
    pub fn panel(self) -> Option<PanelId> {
        match self {
            DragSource::None => None,
            DragSource::Powers => Some(PanelId::Powers),
            DragSource::Inventory => Some(PanelId::Inventory),
            DragSource::ActionBar => Some(PanelId::ActionBar),
            DragSource::Vendor => Some(PanelId::Vendor),
            DragSource::Stash => Some(PanelId::Stash),
        }
    }

    /// Drag source for a panel, if items or powers can be dragged out of it.
    pub fn from_panel(panel: PanelId) -> Option<Self> {
        match panel {
            PanelId::Powers => Some(DragSource::Powers),
            PanelId::Inventory => Some(DragSource::Inventory),
            PanelId::ActionBar => Some(DragSource::ActionBar),
            PanelId::Vendor => Some(DragSource::Vendor),
            PanelId::Stash => Some(DragSource::Stash),
            _ => None,
        }
    }

    fn carries_items(self) -> bool {
        matches!(self, DragSource::Inventory | DragSource::Vendor | DragSource::Stash)
    }

    fn carries_powers(self) -> bool {
        matches!(self, DragSource::Powers | DragSource::ActionBar)
    }
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPayload {
    /// Nothing.
    #[default]
    None,
    /// A power id.
    Power(PowerId),
    /// An item stack.
    Stack(ItemStack),
}

impl DragPayload {
    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        match self {
            DragPayload::None => true,
            DragPayload::Power(power) => *power == NO_POWER,
            DragPayload::Stack(stack) => stack.is_empty(),
        }
    }
}

/// Icon following the pointer while a drag is active. Released when dropped.
#[derive(Debug)]
pub struct DragIcon {
    icon: u32,
    quantity: Option<u32>,
}

impl DragIcon {
    /// Icon sheet index.
    pub fn icon(&self) -> u32 {
        self.icon
    }

    /// Stack size drawn on the icon.
    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }
}

impl Drop for DragIcon {
    fn drop(&mut self) {
        trace!(icon = self.icon, "drag icon released");
    }
}

/// How a drag was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragStart {
    /// Follows the pointer without the button held.
    pub sticky: bool,
    /// Started from keyboard focus.
    pub from_keyboard: bool,
}

/// The active drag.
///
/// `source == None` exactly when the payload is empty, and the payload kind
/// always matches the source.
#[derive(Debug, Default)]
pub struct DragState {
    source: DragSource,
    payload: DragPayload,
    origin_slot: Option<usize>,
    sticky: bool,
    from_keyboard: bool,
    icon: Option<DragIcon>,
}

impl DragState {
    /// Source panel.
    pub fn source(&self) -> DragSource {
        self.source
    }

    /// Payload.
    pub fn payload(&self) -> DragPayload {
        self.payload
    }

    /// Dragged stack, empty for power drags.
    pub fn stack(&self) -> ItemStack {
        match self.payload {
            DragPayload::Stack(stack) => stack,
            _ => ItemStack::EMPTY,
        }
    }

    /// Dragged power, [`NO_POWER`] for item drags.
    pub fn power(&self) -> PowerId {
        match self.payload {
            DragPayload::Power(power) => power,
            _ => NO_POWER,
        }
    }

    /// Slot the payload was picked from.
    pub fn origin_slot(&self) -> Option<usize> {
        self.origin_slot
    }

    /// Whether the payload follows the pointer without the button held.
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Whether the drag was started from keyboard focus.
    pub fn is_from_keyboard(&self) -> bool {
        self.from_keyboard
    }

    /// Icon drawn at the pointer.
    pub fn icon(&self) -> Option<&DragIcon> {
        self.icon.as_ref()
    }
}

/// A stack waiting for the quantity picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSplit {
    /// Source panel.
    pub source: DragSource,
    /// Peeked slot.
    pub slot: usize,
    /// Units in the slot.
    pub max: u32,
    /// Started from keyboard focus.
    pub from_keyboard: bool,
}

/// Owner of the drag state.
#[derive(Debug)]
pub struct DragController {
    items: Arc<ItemCatalog>,
    powers: Arc<PowerCatalog>,
    state: Option<DragState>,
    pending: Option<PendingSplit>,
    spilled: Vec<ItemStack>,
}

impl DragController {
    /// Idle controller.
    pub fn new(items: Arc<ItemCatalog>, powers: Arc<PowerCatalog>) -> Self {
        Self {
            items,
            powers,
            state: None,
            pending: None,
            spilled: Vec::new(),
        }
    }

    /// Whether something is in hand.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Active drag.
    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Source of the active drag.
    pub fn source(&self) -> DragSource {
        self.state.as_ref().map_or(DragSource::None, DragState::source)
    }

    /// Split waiting for the picker.
    pub fn pending_split(&self) -> Option<PendingSplit> {
        self.pending
    }

    /// Stacks a return could not put back. The manager drops them to the ground.
    pub fn take_spilled(&mut self) -> Vec<ItemStack> {
        std::mem::take(&mut self.spilled)
    }

    /// Pick up the whole slot. No-op while a drag or split is already active.
    pub fn start(
        &mut self,
        panels: &mut MenuPanels,
        source: DragSource,
        slot: usize,
        how: DragStart,
    ) -> bool {
        if self.state.is_some() || self.pending.is_some() {
            debug!(?source, slot, "drag already active, ignoring start");
            return false;
        }
        let payload = match source {
            DragSource::None => return false,
            DragSource::Inventory => DragPayload::Stack(panels.inventory.click(slot, ClickMode::Take)),
            DragSource::Vendor => DragPayload::Stack(panels.vendor.click(slot, ClickMode::Take)),
            DragSource::Stash => DragPayload::Stack(panels.stash.click(slot, ClickMode::Take)),
            DragSource::Powers => DragPayload::Power(panels.powers.click(slot)),
            DragSource::ActionBar => DragPayload::Power(panels.action_bar.check_drag(slot)),
        };
        self.adopt(source, payload, slot, how)
    }

    fn adopt(&mut self, source: DragSource, payload: DragPayload, slot: usize, how: DragStart) -> bool {
        let kind_matches = match payload {
            DragPayload::None => false,
            DragPayload::Stack(_) => source.carries_items(),
            DragPayload::Power(_) => source.carries_powers(),
        };
        if payload.is_empty() || !kind_matches {
            return false;
        }
        let icon = match payload {
            DragPayload::Stack(stack) => DragIcon {
                icon: self.items.get(stack.item).map_or(0, |def| def.icon),
                quantity: (stack.quantity > 1).then_some(stack.quantity),
            },
            DragPayload::Power(power) => DragIcon {
                icon: self.powers.icon(power),
                quantity: None,
            },
            DragPayload::None => return false,
        };
        debug!(?source, ?payload, slot, sticky = how.sticky, from_keyboard = how.from_keyboard, "drag started");
        self.state = Some(DragState {
            source,
            payload,
            origin_slot: Some(slot),
            sticky: how.sticky,
            from_keyboard: how.from_keyboard,
            icon: Some(icon),
        });
        true
    }

    /// Peek at a stack and wait for the quantity picker. Returns the stack size
    /// to offer, or `None` when there is nothing to split.
    pub fn begin_split(
        &mut self,
        panels: &mut MenuPanels,
        source: DragSource,
        slot: usize,
        from_keyboard: bool,
    ) -> Option<u32> {
        if self.state.is_some() || self.pending.is_some() {
            return None;
        }
        let stack = match source {
            DragSource::Inventory => panels.inventory.click(slot, ClickMode::Peek),
            DragSource::Vendor => panels.vendor.click(slot, ClickMode::Peek),
            DragSource::Stash => panels.stash.click(slot, ClickMode::Peek),
            DragSource::None | DragSource::Powers | DragSource::ActionBar => return None,
        };
        if stack.quantity < 2 {
            forget_origin(panels, source);
            return None;
        }
        self.pending = Some(PendingSplit {
            source,
            slot,
            max: stack.quantity,
            from_keyboard,
        });
        Some(stack.quantity)
    }

    /// Remove the chosen quantity from the peeked slot and start dragging it.
    /// At most one deduction happens per split, however often this is called.
    pub fn confirm_split(&mut self, panels: &mut MenuPanels, quantity: u32) -> bool {
        let Some(split) = self.pending.take() else {
            return false;
        };
        let quantity = quantity.clamp(1, split.max);
        let removed = match split.source {
            DragSource::Inventory => panels.inventory.remove_from_prev_slot(quantity),
            DragSource::Vendor => panels.vendor.remove_from_prev_slot(quantity),
            DragSource::Stash => panels.stash.remove_from_prev_slot(quantity),
            DragSource::None | DragSource::Powers | DragSource::ActionBar => ItemStack::EMPTY,
        };
        if removed.quantity != quantity {
            warn!(wanted = quantity, got = removed.quantity, "split slot changed under the picker");
        }
        let how = DragStart {
            sticky: true,
            from_keyboard: split.from_keyboard,
        };
        self.adopt(split.source, DragPayload::Stack(removed), split.slot, how)
    }

    /// Drop the pending split without touching the slot.
    pub fn cancel_split(&mut self, panels: &mut MenuPanels) -> bool {
        match self.pending.take() {
            Some(split) => {
                forget_origin(panels, split.source);
                true
            }
            None => false,
        }
    }

    /// Resolve the drag onto a target. Whatever the target refuses goes back
    /// to its origin.
    pub fn complete(&mut self, panels: &mut MenuPanels, target: DropTarget) -> TransferOutcome {
        let Some(state) = self.state.take() else {
            return TransferOutcome::Idle;
        };
        let outcome = transfer::resolve(
            panels,
            &self.items,
            state.source,
            state.payload,
            target,
            &mut self.spilled,
        );
        match &outcome {
            TransferOutcome::Returned(err) => {
                debug!(source = ?state.source, ?target, error = %err, "transfer refused, payload returned")
            }
            other => debug!(source = ?state.source, ?target, outcome = ?other, "drag completed"),
        }
        outcome
    }

    /// Send the payload back to its origin. Returns `false` when idle.
    pub fn cancel(&mut self, panels: &mut MenuPanels) -> bool {
        let Some(state) = self.state.take() else {
            return false;
        };
        debug!(source = ?state.source, payload = ?state.payload, "drag cancelled");
        transfer::return_to_origin(panels, state.source, state.payload, &mut self.spilled);
        true
    }
}

fn forget_origin(panels: &mut MenuPanels, source: DragSource) {
    match source {
        DragSource::Inventory => panels.inventory.finish_drag(),
        DragSource::Vendor => panels.vendor.finish_drag(),
        DragSource::Stash => panels.stash.finish_drag(),
        DragSource::None | DragSource::Powers | DragSource::ActionBar => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use menuhand_core::{ItemDef, ItemKind};

    fn setup() -> (DragController, MenuPanels) {
        let items = Arc::new(ItemCatalog::from_defs([ItemDef {
            id: 2,
            name: "Potion".into(),
            kind: ItemKind::Consumable,
            price: 10,
            sell_price: None,
            max_quantity: 10,
            power: None,
            icon: 4,
            description: String::new(),
        }]));
        let powers = Arc::new(PowerCatalog::new());
        let panels = MenuPanels::new(&MenuConfig::default(), Arc::clone(&items), Arc::clone(&powers));
        (DragController::new(items, powers), panels)
    }

    #[test]
    fn start_then_cancel_restores_origin() {
        let (mut drag, mut panels) = setup();
        panels.inventory.carried_mut().set(3, ItemStack::new(2, 5));
        let slot = panels.inventory.carried_index(3);

        assert!(drag.start(&mut panels, DragSource::Inventory, slot, DragStart::default()));
        let state = drag.state().expect("active");
        assert_eq!(state.stack(), ItemStack::new(2, 5));
        assert_eq!(state.power(), NO_POWER);
        assert_eq!(state.icon().map(DragIcon::icon), Some(4));
        assert!(panels.inventory.carried().stack_at(3).is_empty());

        assert!(drag.cancel(&mut panels));
        assert!(!drag.cancel(&mut panels));
        assert_eq!(panels.inventory.carried().stack_at(3), ItemStack::new(2, 5));
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut drag, mut panels) = setup();
        panels.inventory.carried_mut().set(0, ItemStack::new(2, 1));
        panels.inventory.carried_mut().set(1, ItemStack::new(2, 1));
        let first = panels.inventory.carried_index(0);
        let second = panels.inventory.carried_index(1);
        assert!(drag.start(&mut panels, DragSource::Inventory, first, DragStart::default()));
        assert!(!drag.start(&mut panels, DragSource::Inventory, second, DragStart::default()));
        assert_eq!(panels.inventory.carried().stack_at(1), ItemStack::new(2, 1));
    }

    #[test]
    fn empty_slot_starts_nothing() {
        let (mut drag, mut panels) = setup();
        assert!(!drag.start(&mut panels, DragSource::Stash, 0, DragStart::default()));
        assert!(!drag.start(&mut panels, DragSource::ActionBar, 0, DragStart::default()));
        assert!(!drag.is_active());
        assert_eq!(drag.source(), DragSource::None);
    }

    #[test]
    fn split_deducts_exactly_once() {
        let (mut drag, mut panels) = setup();
        panels.stash.stock_mut().set(0, ItemStack::new(2, 5));
        assert_eq!(drag.begin_split(&mut panels, DragSource::Stash, 0, false), Some(5));
        assert_eq!(panels.stash.stock().stack_at(0), ItemStack::new(2, 5));

        assert!(drag.confirm_split(&mut panels, 2));
        assert!(!drag.confirm_split(&mut panels, 2));
        assert_eq!(panels.stash.stock().stack_at(0), ItemStack::new(2, 3));
        let state = drag.state().expect("active");
        assert_eq!(state.stack(), ItemStack::new(2, 2));
        assert!(state.is_sticky());

        assert!(drag.cancel(&mut panels));
        assert_eq!(panels.stash.stock().stack_at(0), ItemStack::new(2, 5));
    }

    #[test]
    fn cancelled_split_leaves_slot_alone() {
        let (mut drag, mut panels) = setup();
        panels.stash.stock_mut().set(0, ItemStack::new(2, 5));
        drag.begin_split(&mut panels, DragSource::Stash, 0, true);
        assert!(drag.cancel_split(&mut panels));
        assert!(!drag.confirm_split(&mut panels, 3));
        assert_eq!(panels.stash.stock().stack_at(0), ItemStack::new(2, 5));
        assert!(!drag.is_active());
    }

    #[test]
    fn single_items_are_not_split() {
        let (mut drag, mut panels) = setup();
        panels.stash.stock_mut().set(0, ItemStack::new(2, 1));
        assert_eq!(drag.begin_split(&mut panels, DragSource::Stash, 0, false), None);
        assert!(drag.pending_split().is_none());
        assert_eq!(panels.stash.stock().drag_prev_slot(), None);
    }
}
