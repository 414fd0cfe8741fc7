#![warn(missing_docs)]
//! Menu coordination and drag-and-drop for action RPG panels.
//!
//! A single item stack or power can be "in hand" at a time. [`MenuManager`]
//! runs one tick of menu logic: the [`ModalGate`] decides who owns the tick's
//! click or key, the [`DragController`] moves payloads between panels through
//! the transfer table, the [`NavigationFocusGraph`] links keyboard focus across
//! visible panels and the [`TooltipCache`] keeps tooltip layout work down.

pub mod config;
pub mod drag;
pub mod error;
pub mod events;
pub mod frame;
pub mod manager;
pub mod messages;
pub mod modal;
pub mod navigation;
pub mod panel;
pub mod panels;
pub mod storage;
pub mod tablist;
pub mod tooltip;
pub mod transfer;

pub use config::{MenuConfig, DEFAULT_MENU_CONFIG_PATH};
pub use drag::{DragController, DragPayload, DragSource, DragStart, DragState, PendingSplit};
pub use error::TransferError;
pub use events::MenuEvent;
pub use frame::{ActionSlotFrame, DragIconFrame, MenuFrame, PanelFrame};
pub use manager::{AvatarStatus, MenuManager};
pub use messages::{LogEntry, MessageLog};
pub use modal::ModalGate;
pub use navigation::{FocusRecovery, NavigationFocusGraph};
pub use panel::{Panel, PanelId};
pub use panels::MenuPanels;
pub use storage::{ClickMode, SlotStorage};
pub use tablist::{SlotClickResult, TabList, TabStep};
pub use tooltip::{TooltipCache, TooltipKey, TooltipView};
pub use transfer::{DropTarget, TransferOutcome};
