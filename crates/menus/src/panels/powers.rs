//! Powers tree: unlockable cells whose powers can be dragged to the action bar.

use std::collections::BTreeSet;
use std::sync::Arc;

use menuhand_core::{
    Point, PowerCatalog, PowerId, Rect, TooltipColor, TooltipData, NO_POWER,
};

use crate::config::{PowerCellConfig, PowersLayout};
use crate::panel::{Panel, PanelBase, PanelId};
use crate::tablist::TabList;

/// Powers panel.
#[derive(Debug, Clone)]
pub struct Powers {
    base: PanelBase,
    catalog: Arc<PowerCatalog>,
    cells: Vec<PowerCellConfig>,
    unlocked: BTreeSet<PowerId>,
    level: u32,
}

impl Powers {
    /// Build from the configured cells.
    pub fn new(layout: &PowersLayout, catalog: Arc<PowerCatalog>) -> Self {
        let tablist = TabList::new(layout.cells.len(), layout.cells.len().max(1));
        Self {
            base: PanelBase::with_tablist(layout.window, tablist),
            catalog,
            cells: layout.cells.clone(),
            unlocked: BTreeSet::new(),
            level: 1,
        }
    }

    /// Configured cells.
    pub fn cells(&self) -> &[PowerCellConfig] {
        &self.cells
    }

    /// Update the avatar level used by requirement checks.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Unspent power points.
    pub fn points_left(&self) -> u32 {
        let spent = self
            .cells
            .iter()
            .filter(|cell| cell.requires_point && self.unlocked.contains(&cell.power))
            .count() as u32;
        self.level.saturating_sub(spent)
    }

    /// Whether the power in a cell may be used and dragged.
    pub fn requirements_met(&self, slot: usize) -> bool {
        let Some(cell) = self.cells.get(slot) else {
            return false;
        };
        if self.unlocked.contains(&cell.power) {
            return true;
        }
        !cell.requires_point && self.level >= cell.requires_level
    }

    /// Whether a cell can be unlocked right now.
    pub fn can_unlock(&self, slot: usize) -> bool {
        self.cells.get(slot).is_some_and(|cell| {
            cell.requires_point
                && !self.unlocked.contains(&cell.power)
                && self.level >= cell.requires_level
                && self.points_left() > 0
        })
    }

    /// Spend a point on a cell.
    pub fn unlock_click(&mut self, slot: usize) -> bool {
        if !self.can_unlock(slot) {
            return false;
        }
        let power = self.cells[slot].power;
        self.unlocked.insert(power);
        tracing::info!(power, slot, "power unlocked");
        true
    }

    /// Power in a cell, if it can be dragged. Powers stay in the tree.
    pub fn click(&self, slot: usize) -> PowerId {
        if self.requirements_met(slot) {
            self.cells[slot].power
        } else {
            NO_POWER
        }
    }
}

impl Panel for Powers {
    fn id(&self) -> PanelId {
        PanelId::Powers
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        self.cells.iter().position(|cell| cell.rect.contains(pos))
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        self.cells.get(slot).map(|cell| cell.rect)
    }

    fn slot_tooltip(&self, slot: usize) -> TooltipData {
        let Some(cell) = self.cells.get(slot) else {
            return TooltipData::new();
        };
        let mut tip = self.catalog.tooltip(cell.power);
        if !self.requirements_met(slot) {
            if self.level < cell.requires_level {
                tip.add_text(
                    &format!("Requires level {}", cell.requires_level),
                    TooltipColor::Warning,
                );
            }
            if cell.requires_point {
                tip.add_text("Requires a power point", TooltipColor::Warning);
            }
        }
        tip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn powers() -> Powers {
        let layout = PowersLayout {
            cells: vec![
                PowerCellConfig {
                    power: 10,
                    rect: Rect::new(0, 0, 10, 10),
                    requires_level: 1,
                    requires_point: false,
                },
                PowerCellConfig {
                    power: 11,
                    rect: Rect::new(10, 0, 10, 10),
                    requires_level: 2,
                    requires_point: true,
                },
            ],
            ..PowersLayout::default()
        };
        Powers::new(&layout, Arc::new(PowerCatalog::new()))
    }

    #[test]
    fn free_cells_are_draggable_at_level() {
        let p = powers();
        assert_eq!(p.click(0), 10);
        assert_eq!(p.click(1), NO_POWER);
        assert_eq!(p.click(5), NO_POWER);
    }

    #[test]
    fn unlocking_spends_points() {
        let mut p = powers();
        assert!(!p.unlock_click(1), "level too low");
        p.set_level(2);
        assert_eq!(p.points_left(), 2);
        assert!(p.unlock_click(1));
        assert_eq!(p.points_left(), 1);
        assert!(!p.unlock_click(1), "already unlocked");
        assert_eq!(p.click(1), 11);
    }

    #[test]
    fn locked_cells_explain_requirements() {
        let p = powers();
        let tip = p.slot_tooltip(1);
        assert!(tip.lines().iter().any(|l| l.text == "Requires level 2"));
    }
}
