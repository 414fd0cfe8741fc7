//! Panel identity and the capability trait shared by every menu window.

use std::fmt;

use menuhand_core::{Point, Rect, TooltipData};
use serde::{Deserialize, Serialize};

use crate::tablist::TabList;

/// Every menu window the manager coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    /// Player inventory (equipment + carried).
    Inventory,
    /// NPC vendor.
    Vendor,
    /// Player stash.
    Stash,
    /// Powers tree.
    Powers,
    /// Action bar (always visible).
    ActionBar,
    /// Character sheet.
    Character,
    /// Quest log.
    QuestLog,
    /// NPC conversation.
    Talker,
    /// NPC action menu.
    NpcActions,
    /// Exit confirmation.
    Exit,
    /// Developer console.
    DevConsole,
    /// Readable book.
    Book,
    /// Quantity picker.
    QuantityPicker,
}

impl PanelId {
    /// Every panel.
    pub const ALL: [PanelId; 13] = [
        PanelId::Inventory,
        PanelId::Vendor,
        PanelId::Stash,
        PanelId::Powers,
        PanelId::ActionBar,
        PanelId::Character,
        PanelId::QuestLog,
        PanelId::Talker,
        PanelId::NpcActions,
        PanelId::Exit,
        PanelId::DevConsole,
        PanelId::Book,
        PanelId::QuantityPicker,
    ];

    /// Full-screen modals that own all input while visible, highest first.
    pub const MODALS: [PanelId; 3] = [PanelId::QuantityPicker, PanelId::Exit, PanelId::DevConsole];

    /// Whether the panel is a full-screen modal.
    pub fn is_modal(self) -> bool {
        Self::MODALS.contains(&self)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// State every panel carries.
#[derive(Debug, Clone, Default)]
pub struct PanelBase {
    /// Whether the panel is shown.
    pub visible: bool,
    /// Screen rect of the window.
    pub window_area: Rect,
    /// Keyboard focus order, if the panel is navigable.
    pub tablist: Option<TabList>,
}

impl PanelBase {
    /// Hidden panel without keyboard focus.
    pub fn new(window_area: Rect) -> Self {
        Self {
            visible: false,
            window_area,
            tablist: None,
        }
    }

    /// Hidden panel with a tab list.
    pub fn with_tablist(window_area: Rect, tablist: TabList) -> Self {
        Self {
            visible: false,
            window_area,
            tablist: Some(tablist),
        }
    }
}

/// Capabilities shared by every menu window.
///
/// Panels only know their own stock. Anything that crosses panels goes
/// through the manager.
pub trait Panel {
    /// Which panel this is.
    fn id(&self) -> PanelId;

    /// Shared state.
    fn base(&self) -> &PanelBase;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut PanelBase;

    /// Slot (or button) under the pointer.
    fn slot_over(&self, _pos: Point) -> Option<usize> {
        None
    }

    /// Screen rect of a slot, used to anchor keyboard tooltips.
    fn slot_rect(&self, _slot: usize) -> Option<Rect> {
        None
    }

    /// Tooltip content for a slot.
    fn slot_tooltip(&self, _slot: usize) -> TooltipData {
        TooltipData::new()
    }

    /// Whether the panel is shown.
    fn is_visible(&self) -> bool {
        self.base().visible
    }

    /// Show or hide the panel.
    fn set_visible(&mut self, visible: bool) {
        if self.base().visible != visible {
            tracing::debug!(panel = %self.id(), visible, "panel visibility changed");
        }
        self.base_mut().visible = visible;
    }

    /// Screen rect of the window.
    fn window_area(&self) -> Rect {
        self.base().window_area
    }

    /// Whether the panel is shown and the pointer is over it.
    fn contains(&self, pos: Point) -> bool {
        self.is_visible() && self.window_area().contains(pos)
    }

    /// Keyboard focus order.
    fn tablist(&self) -> Option<&TabList> {
        self.base().tablist.as_ref()
    }

    /// Keyboard focus order, mutably.
    fn tablist_mut(&mut self) -> Option<&mut TabList> {
        self.base_mut().tablist.as_mut()
    }

    /// Tooltip under the pointer.
    fn check_tooltip(&self, pos: Point) -> TooltipData {
        if !self.contains(pos) {
            return TooltipData::new();
        }
        self.slot_over(pos)
            .map(|slot| self.slot_tooltip(slot))
            .unwrap_or_default()
    }
}
