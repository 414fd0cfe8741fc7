//! Who gets this tick's click or key: modals, exclusive panel groups and the
//! toggle-key latch.

use menuhand_core::Point;
use menuhand_input::{Action, InputState};
use tracing::debug;

use crate::panel::PanelId;
use crate::panels::{MenuPanels, REGISTRATION_ORDER};

/// Panels sharing the left half of the screen. Opening one closes the rest.
pub const LEFT_GROUP: [PanelId; 8] = [
    PanelId::Character,
    PanelId::QuestLog,
    PanelId::Stash,
    PanelId::Exit,
    PanelId::Book,
    PanelId::Vendor,
    PanelId::Talker,
    PanelId::NpcActions,
];

/// Panels sharing the right half of the screen.
pub const RIGHT_GROUP: [PanelId; 6] = [
    PanelId::Inventory,
    PanelId::Powers,
    PanelId::Exit,
    PanelId::Book,
    PanelId::Talker,
    PanelId::NpcActions,
];

/// NPC interaction windows offered the click before ordinary panels.
const NPC_PANELS: [PanelId; 4] = [
    PanelId::NpcActions,
    PanelId::Talker,
    PanelId::Vendor,
    PanelId::Book,
];

/// Toggle keys and the panel each one opens.
pub const TOGGLE_KEYS: [(Action, PanelId); 4] = [
    (Action::Inventory, PanelId::Inventory),
    (Action::Powers, PanelId::Powers),
    (Action::Character, PanelId::Character),
    (Action::Log, PanelId::QuestLog),
];

/// Exclusive-access arbiter.
#[derive(Debug, Clone, Default)]
pub struct ModalGate {
    key_lock: bool,
}

impl ModalGate {
    /// Unlatched gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a toggle fired and its key has not been released yet.
    pub fn key_lock(&self) -> bool {
        self.key_lock
    }

    /// Release the latch once no toggle key is held.
    pub fn release_latch(&mut self, input: &InputState) {
        let held = TOGGLE_KEYS
            .iter()
            .any(|(action, _)| input.pressing(*action))
            || input.pressing(Action::DevConsole);
        if !held {
            self.key_lock = false;
        }
    }

    /// Consume a toggle key press, latching until it is released.
    /// Toggles are refused while dragging.
    pub fn take_toggle(&mut self, input: &mut InputState, dragging: bool) -> Option<PanelId> {
        if self.key_lock || dragging {
            return None;
        }
        let panel = TOGGLE_KEYS
            .iter()
            .find(|(action, _)| input.triggered(*action))
            .map(|(action, panel)| {
                input.lock(*action);
                *panel
            })?;
        self.key_lock = true;
        Some(panel)
    }

    /// Consume the dev console key.
    pub fn take_console_toggle(&mut self, input: &mut InputState) -> bool {
        if self.key_lock || !input.consume(Action::DevConsole) {
            return false;
        }
        self.key_lock = true;
        true
    }

    /// Visible full-screen modal, highest precedence first.
    pub fn active_modal(panels: &MenuPanels) -> Option<PanelId> {
        PanelId::MODALS
            .into_iter()
            .find(|id| panels.is_visible(*id))
    }

    /// Whether anything besides the action bar is open.
    pub fn menus_open(panels: &MenuPanels) -> bool {
        panels.visible().any(|id| id != PanelId::ActionBar)
    }

    /// Show a panel, closing the other members of its groups.
    pub fn open(panels: &mut MenuPanels, id: PanelId) {
        for group in [&LEFT_GROUP[..], &RIGHT_GROUP[..]] {
            if group.contains(&id) {
                for other in group.iter().filter(|other| **other != id) {
                    panels.set_visible(*other, false);
                }
            }
        }
        panels.set_visible(id, true);
        debug!(panel = %id, "panel opened");
    }

    /// Open a closed panel or close an open one. Refused while dragging.
    pub fn toggle(&mut self, panels: &mut MenuPanels, id: PanelId, dragging: bool) -> bool {
        if dragging {
            debug!(panel = %id, "toggle ignored while dragging");
            return false;
        }
        if panels.is_visible(id) {
            panels.set_visible(id, false);
            debug!(panel = %id, "panel closed");
        } else {
            Self::open(panels, id);
        }
        true
    }

    fn close_group(panels: &mut MenuPanels, group: &[PanelId], dragging: bool) -> bool {
        if dragging {
            debug!("close request ignored while dragging");
            return false;
        }
        for id in group {
            panels.set_visible(*id, false);
        }
        true
    }

    /// Close the left group.
    pub fn close_left(panels: &mut MenuPanels, dragging: bool) -> bool {
        Self::close_group(panels, &LEFT_GROUP, dragging)
    }

    /// Close the right group.
    pub fn close_right(panels: &mut MenuPanels, dragging: bool) -> bool {
        Self::close_group(panels, &RIGHT_GROUP, dragging)
    }

    /// Close both groups.
    pub fn close_all(panels: &mut MenuPanels, dragging: bool) -> bool {
        Self::close_left(panels, dragging) && Self::close_right(panels, dragging)
    }

    /// Panel that owns a click at `pos`: the active modal, else an NPC
    /// window under the pointer, else the first registered panel under it.
    pub fn click_owner(panels: &MenuPanels, pos: Point) -> Option<PanelId> {
        if let Some(modal) = Self::active_modal(panels) {
            return Some(modal);
        }
        NPC_PANELS
            .into_iter()
            .chain(REGISTRATION_ORDER)
            .find(|id| panels.get(*id).contains(pos))
    }
}
