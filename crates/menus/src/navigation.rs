//! Keyboard/gamepad focus across panels.
//!
//! The graph is rebuilt from panel visibility every tick. Visible navigable
//! panels form a ring in a fixed order: the left side (stash, vendor,
//! character, quest log), then the right side (inventory, powers), then the
//! action bar. Only the focused panel's tab list is unlocked.

use menuhand_input::{Action, InputState};
use serde::Serialize;
use tracing::debug;

use crate::modal::ModalGate;
use crate::panel::PanelId;
use crate::panels::MenuPanels;
use crate::tablist::TabStep;

/// Fixed focus order.
pub const FOCUS_RING: [PanelId; 7] = [
    PanelId::Stash,
    PanelId::Vendor,
    PanelId::Character,
    PanelId::QuestLog,
    PanelId::Inventory,
    PanelId::Powers,
    PanelId::ActionBar,
];

/// Focus was on a panel that is no longer visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusRecovery {
    /// Panel that lost visibility.
    pub lost: PanelId,
    /// Panel that took over focus.
    pub now: Option<PanelId>,
}

/// Per-tick focus graph.
#[derive(Debug, Clone, Default)]
pub struct NavigationFocusGraph {
    focused: Option<PanelId>,
    suspended: Option<PanelId>,
    ring: Vec<PanelId>,
}

fn navigable(panels: &MenuPanels, id: PanelId) -> bool {
    panels.is_visible(id) && panels.get(id).tablist().is_some_and(|t| !t.is_empty())
}

impl NavigationFocusGraph {
    /// Empty graph; the first rebuild picks a focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Focused panel.
    pub fn focused(&self) -> Option<PanelId> {
        self.focused
    }

    /// Visible navigable panels in ring order, as of the last rebuild.
    pub fn ring(&self) -> &[PanelId] {
        &self.ring
    }

    /// Focused panel and slot.
    pub fn focused_slot(&self, panels: &MenuPanels) -> Option<(PanelId, usize)> {
        let id = self.focused?;
        let slot = panels.get(id).tablist()?.current()?;
        Some((id, slot))
    }

    /// Relink tab lists from current visibility and fix up focus.
    pub fn rebuild(&mut self, panels: &mut MenuPanels) -> Option<FocusRecovery> {
        let ring: Vec<PanelId> = FOCUS_RING
            .into_iter()
            .filter(|id| navigable(panels, *id))
            .collect();
        let opened: Vec<PanelId> = ring
            .iter()
            .copied()
            .filter(|id| !self.ring.contains(id))
            .collect();

        for id in PanelId::ALL {
            if let Some(tablist) = panels.get_mut(id).tablist_mut() {
                tablist.set_links(None, None);
                tablist.lock();
            }
        }
        let n = ring.len();
        if n >= 2 {
            for (i, id) in ring.iter().enumerate() {
                let prev = ring[(i + n - 1) % n];
                let next = ring[(i + 1) % n];
                if let Some(tablist) = panels.get_mut(*id).tablist_mut() {
                    tablist.set_links(Some(prev), Some(next));
                }
            }
        }

        let modal = ModalGate::active_modal(panels).filter(|id| navigable(panels, *id));
        let mut recovery = None;

        if let Some(modal) = modal {
            if self.focused != Some(modal) {
                self.suspended = self.focused.filter(|id| !id.is_modal());
                self.focused = Some(modal);
            }
        } else {
            if self.focused.is_some_and(PanelId::is_modal) {
                self.focused = self.suspended.take();
            }
            if let Some(lost) = self.focused.filter(|id| !ring.contains(id)) {
                self.focused = None;
                recovery = Some(lost);
            }
            if let Some(first_opened) = opened.iter().copied().find(|id| *id != PanelId::ActionBar) {
                self.focused = Some(first_opened);
            }
            if self.focused.is_none() {
                self.focused = ring.first().copied();
            }
        }

        if let Some(id) = self.focused {
            if let Some(tablist) = panels.get_mut(id).tablist_mut() {
                tablist.unlock();
            }
        }
        self.ring = ring;

        recovery.map(|lost| {
            debug!(lost = %lost, now = ?self.focused, "focused panel closed, focus recovered");
            FocusRecovery {
                lost,
                now: self.focused,
            }
        })
    }

    /// Move focus from direction keys. Returns whether anything moved.
    pub fn navigate(&mut self, panels: &mut MenuPanels, input: &mut InputState) -> bool {
        let Some(id) = self.focused else {
            return false;
        };
        let forward = if input.consume(Action::Right) {
            Some(true)
        } else if input.consume(Action::Left) {
            Some(false)
        } else {
            None
        };
        let Some(tablist) = panels.get_mut(id).tablist_mut() else {
            return false;
        };
        let step = match forward {
            Some(true) => tablist.next(),
            Some(false) => tablist.prev(),
            None if input.consume(Action::Down) => tablist.down(),
            None if input.consume(Action::Up) => tablist.up(),
            None => return false,
        };
        match step {
            TabStep::Moved => true,
            TabStep::Blocked => false,
            TabStep::Leave(to) => {
                self.move_focus(panels, to, forward.unwrap_or(true));
                true
            }
        }
    }

    /// Hand focus to another panel, landing on its first (or last) slot.
    pub fn move_focus(&mut self, panels: &mut MenuPanels, to: PanelId, forward: bool) {
        if let Some(from) = self.focused {
            if let Some(tablist) = panels.get_mut(from).tablist_mut() {
                tablist.lock();
            }
        }
        if let Some(tablist) = panels.get_mut(to).tablist_mut() {
            tablist.unlock();
            if forward {
                tablist.focus_first();
            } else {
                tablist.focus_last();
            }
        }
        debug!(panel = %to, "keyboard focus moved");
        self.focused = Some(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MenuConfig, PowerCellConfig};
    use menuhand_core::{ItemCatalog, PowerCatalog, Rect};
    use std::sync::Arc;
    use crate::panel::Panel;

    fn panels() -> MenuPanels {
        let mut config = MenuConfig::default();
        config.powers.cells = (0..3)
            .map(|i| PowerCellConfig {
                power: i + 1,
                rect: Rect::new(340 + i as i32 * 40, 40, 32, 32),
                requires_level: 0,
                requires_point: false,
            })
            .collect();
        MenuPanels::new(&config, Arc::new(ItemCatalog::new()), Arc::new(PowerCatalog::new()))
    }

    fn press(input: &mut InputState, action: Action) {
        input.release(action);
        input.press(action);
    }

    #[test]
    fn only_focused_tablist_is_unlocked() {
        let mut panels = panels();
        let mut graph = NavigationFocusGraph::new();
        panels.set_visible(PanelId::Inventory, true);
        graph.rebuild(&mut panels);
        assert_eq!(graph.focused(), Some(PanelId::Inventory));
        assert!(!panels.inventory.tablist().is_some_and(|t| t.is_locked()));
        assert!(panels.action_bar.tablist().is_some_and(|t| t.is_locked()));
    }

    #[test]
    fn next_from_last_inventory_slot_lands_on_powers() {
        let mut panels = panels();
        let mut graph = NavigationFocusGraph::new();
        panels.set_visible(PanelId::Inventory, true);
        panels.set_visible(PanelId::Powers, true);
        graph.rebuild(&mut panels);
        assert_eq!(graph.focused(), Some(PanelId::Inventory));

        let last = panels.inventory.tablist().map_or(0, |t| t.len() - 1);
        if let Some(t) = panels.inventory.tablist_mut() {
            t.set_current(Some(last));
        }
        let mut input = InputState::new();
        press(&mut input, Action::Right);
        assert!(graph.navigate(&mut panels, &mut input));
        assert_eq!(graph.focused_slot(&panels), Some((PanelId::Powers, 0)));
    }

    #[test]
    fn left_side_chains_into_the_right_side() {
        let mut panels = panels();
        let mut graph = NavigationFocusGraph::new();
        panels.set_visible(PanelId::Stash, true);
        panels.set_visible(PanelId::Inventory, true);
        graph.rebuild(&mut panels);
        assert_eq!(
            graph.ring(),
            &[PanelId::Stash, PanelId::Inventory, PanelId::ActionBar]
        );
        assert_eq!(graph.focused(), Some(PanelId::Stash));

        if let Some(t) = panels.stash.tablist_mut() {
            t.focus_last();
        }
        let mut input = InputState::new();
        press(&mut input, Action::Right);
        assert!(graph.navigate(&mut panels, &mut input));
        assert_eq!(graph.focused_slot(&panels), Some((PanelId::Inventory, 0)));

        press(&mut input, Action::Left);
        assert!(graph.navigate(&mut panels, &mut input));
        let last = panels.stash.tablist().map_or(0, |t| t.len() - 1);
        assert_eq!(graph.focused_slot(&panels), Some((PanelId::Stash, last)));
    }

    #[test]
    fn single_panel_wraps_within_itself() {
        let mut panels = panels();
        let mut graph = NavigationFocusGraph::new();
        graph.rebuild(&mut panels);
        assert_eq!(graph.focused(), Some(PanelId::ActionBar));
        if let Some(t) = panels.action_bar.tablist_mut() {
            t.focus_last();
        }
        let mut input = InputState::new();
        press(&mut input, Action::Right);
        graph.navigate(&mut panels, &mut input);
        assert_eq!(graph.focused_slot(&panels), Some((PanelId::ActionBar, 0)));
    }

    #[test]
    fn closing_focused_panel_recovers() {
        let mut panels = panels();
        let mut graph = NavigationFocusGraph::new();
        panels.set_visible(PanelId::Stash, true);
        graph.rebuild(&mut panels);
        assert_eq!(graph.focused(), Some(PanelId::Stash));

        panels.set_visible(PanelId::Stash, false);
        let recovery = graph.rebuild(&mut panels);
        assert_eq!(
            recovery,
            Some(FocusRecovery {
                lost: PanelId::Stash,
                now: Some(PanelId::ActionBar)
            })
        );
    }

    #[test]
    fn modal_takes_focus_and_gives_it_back() {
        let mut panels = panels();
        let mut graph = NavigationFocusGraph::new();
        panels.set_visible(PanelId::Inventory, true);
        graph.rebuild(&mut panels);

        panels.set_visible(PanelId::Exit, true);
        assert_eq!(graph.rebuild(&mut panels), None);
        assert_eq!(graph.focused(), Some(PanelId::Exit));

        panels.set_visible(PanelId::Exit, false);
        assert_eq!(graph.rebuild(&mut panels), None);
        assert_eq!(graph.focused(), Some(PanelId::Inventory));
    }
}
