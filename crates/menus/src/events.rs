//! Events the menus hand to the game loop.

use menuhand_core::{ItemId, ItemStack, PowerId};
use serde::Serialize;

use crate::drag::{DragPayload, DragSource};
use crate::navigation::FocusRecovery;
use crate::panel::PanelId;
use crate::transfer::DropTarget;

/// Something the game loop has to act on, or may want to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuEvent {
    /// Put a stack on the ground at the avatar.
    DropToGround {
        /// Dropped stack.
        stack: ItemStack,
    },
    /// A consumable was used.
    UseItem {
        /// Item used.
        item: ItemId,
        /// Power it triggers.
        power: Option<PowerId>,
    },
    /// An action bar slot was activated.
    UsePower {
        /// Slot.
        slot: usize,
        /// Bound power.
        power: PowerId,
    },
    /// An item went into an equipment slot.
    Equipped {
        /// Item.
        item: ItemId,
    },
    /// A power point was spent.
    PowerUnlocked {
        /// Powers tree cell.
        slot: usize,
    },
    /// The exit dialog was confirmed.
    ExitRequested,
    /// A drag began.
    DragStarted {
        /// Origin panel.
        source: DragSource,
        /// Carried payload.
        payload: DragPayload,
    },
    /// A drag was dropped onto a target and accepted.
    DragCompleted {
        /// Origin panel.
        source: DragSource,
        /// Drop target.
        target: DropTarget,
    },
    /// The target refused the drop; the payload went back to its origin.
    TransferRefused {
        /// Origin panel.
        source: DragSource,
        /// Refusal as logged.
        reason: String,
    },
    /// The payload went back to its origin without a drop.
    DragCancelled {
        /// Origin panel.
        source: DragSource,
    },
    /// Sold to a vendor.
    Sold {
        /// Currency gained.
        value: u32,
    },
    /// Bought from a vendor.
    Bought {
        /// Currency spent.
        cost: u32,
    },
    /// A panel became visible.
    PanelOpened {
        /// Panel.
        panel: PanelId,
    },
    /// A panel was hidden.
    PanelClosed {
        /// Panel.
        panel: PanelId,
    },
    /// Keyboard focus was on a panel that closed.
    FocusRecovered(FocusRecovery),
    /// A message for the player.
    Message {
        /// Text.
        text: String,
    },
}

impl MenuEvent {
    /// Short label for transcripts.
    pub fn kind(&self) -> &'static str {
        match self {
            MenuEvent::DropToGround { .. } => "drop_to_ground",
            MenuEvent::UseItem { .. } => "use_item",
            MenuEvent::UsePower { .. } => "use_power",
            MenuEvent::Equipped { .. } => "equipped",
            MenuEvent::PowerUnlocked { .. } => "power_unlocked",
            MenuEvent::ExitRequested => "exit_requested",
            MenuEvent::DragStarted { .. } => "drag_started",
            MenuEvent::DragCompleted { .. } => "drag_completed",
            MenuEvent::TransferRefused { .. } => "transfer_refused",
            MenuEvent::DragCancelled { .. } => "drag_cancelled",
            MenuEvent::Sold { .. } => "sold",
            MenuEvent::Bought { .. } => "bought",
            MenuEvent::PanelOpened { .. } => "panel_opened",
            MenuEvent::PanelClosed { .. } => "panel_closed",
            MenuEvent::FocusRecovered(_) => "focus_recovered",
            MenuEvent::Message { .. } => "message",
        }
    }
}
