//! Read-only snapshot handed to the renderer.

use menuhand_core::{Point, PowerId, Rect};
use menuhand_input::Modality;
use serde::Serialize;

use crate::panel::PanelId;
use crate::tooltip::TooltipView;

/// A visible panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelFrame {
    /// Panel.
    pub id: PanelId,
    /// Window rect.
    pub area: Rect,
    /// Keyboard-focused slot.
    pub focused_slot: Option<usize>,
    /// Slot picked as a keyboard drop target.
    pub checked_slot: Option<usize>,
}

/// The drag icon drawn under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DragIconFrame {
    /// Icon sheet index.
    pub icon: u32,
    /// Stack size label.
    pub quantity: Option<u32>,
    /// Where to draw it.
    pub at: Point,
}

/// One action bar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSlotFrame {
    /// Bound power.
    pub power: PowerId,
    /// Whether the slot can be used.
    pub enabled: bool,
    /// Carried count of the consumable the power needs.
    pub item_count: Option<u32>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuFrame {
    /// Visible panels, back to front.
    pub panels: Vec<PanelFrame>,
    /// Icon of the payload in hand.
    pub drag_icon: Option<DragIconFrame>,
    /// Tooltip of the active modality.
    pub tooltip: Option<TooltipView>,
    /// Modality the frame was built for.
    pub modality: Modality,
    /// Recent HUD messages, oldest first.
    pub hud: Vec<String>,
    /// Whether open menus pause the game.
    pub paused: bool,
    /// Action bar slots in order.
    pub action_slots: Vec<ActionSlotFrame>,
}

impl MenuFrame {
    /// Whether a panel is drawn.
    pub fn shows(&self, id: PanelId) -> bool {
        self.panels.iter().any(|panel| panel.id == id)
    }
}
