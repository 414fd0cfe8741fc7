//! Why a transfer was refused, and what the player is told.

use menuhand_core::ItemId;
use thiserror::Error;

use crate::panel::PanelId;

/// Why a transfer did not happen.
///
/// None of these leave the menu tick: the payload goes back to the panel it
/// came from and [`TransferError::player_message`] is written to the message log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The target declined the drop.
    #[error("invalid transfer: {reason}")]
    InvalidTransfer {
        /// Short description for logs.
        reason: &'static str,
    },
    /// Dropped back onto nothing in particular. Returned without a message.
    #[error("no drop target")]
    NoTarget,
    /// Destination storage has no room.
    #[error("{panel:?} is full")]
    CapacityExceeded {
        /// The full panel.
        panel: PanelId,
    },
    /// The item may not go there (quest items).
    #[error("item {item} can not be moved there")]
    IllegalPayload {
        /// Offending item.
        item: ItemId,
    },
    /// Not enough currency to buy.
    #[error("needs {needed} currency, has {available}")]
    InsufficientFunds {
        /// Total price.
        needed: u32,
        /// Currency carried.
        available: u32,
    },
    /// Action bar slot can not be rebound.
    #[error("action bar slot {slot} is locked")]
    LockedSlot {
        /// Slot index.
        slot: usize,
    },
}

impl TransferError {
    /// Message shown to the player, if any.
    pub fn player_message(&self) -> Option<String> {
        match self {
            TransferError::InvalidTransfer { .. } | TransferError::NoTarget => None,
            TransferError::CapacityExceeded { panel } => Some(match panel {
                PanelId::Stash => "Stash is full.".to_string(),
                PanelId::Vendor => "Vendor has no room.".to_string(),
                _ => "Inventory is full.".to_string(),
            }),
            TransferError::IllegalPayload { .. } => {
                Some("This item can not be moved there.".to_string())
            }
            TransferError::InsufficientFunds { .. } => Some("Not enough gold.".to_string()),
            TransferError::LockedSlot { .. } => Some("That slot is locked.".to_string()),
        }
    }
}
