//! Quantity picker shown before splitting a stack.

use menuhand_core::{Point, Rect};
use menuhand_input::{Action, InputState};

use crate::config::DialogLayout;
use crate::panel::{Panel, PanelBase, PanelId};
use crate::tablist::TabList;

const BUTTON_UP: usize = 0;
const BUTTON_DOWN: usize = 1;
const BUTTON_OK: usize = 2;
const BUTTON_CLOSE: usize = 3;

/// Ticks an arrow must be held before it repeats.
const SPIN_DELAY: u32 = 6;

/// Result of one picker tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Still choosing.
    Pending,
    /// Confirmed with this quantity.
    Confirmed(u32),
    /// Closed without choosing.
    Cancelled,
}

/// Modal quantity picker with value bounds `[min, max]`.
#[derive(Debug, Clone)]
pub struct QuantityPicker {
    base: PanelBase,
    buttons: Vec<Rect>,
    value: u32,
    min: u32,
    max: u32,
    spin_ticks: u32,
    spin_increment: u32,
}

impl QuantityPicker {
    /// Hidden picker.
    pub fn new(layout: &DialogLayout) -> Self {
        Self {
            base: PanelBase::with_tablist(layout.window, TabList::new(layout.buttons.len(), 2)),
            buttons: layout.buttons.clone(),
            value: 1,
            min: 1,
            max: 1,
            spin_ticks: 0,
            spin_increment: 1,
        }
    }

    /// Show the picker for a stack of `max` units. The value starts at the minimum.
    pub fn open(&mut self, max: u32) {
        self.set_bounds(1, max.max(1));
        self.spin_ticks = 0;
        self.spin_increment = 1;
        self.set_visible(true);
        if let Some(tablist) = self.tablist_mut() {
            tablist.unlock();
            tablist.set_current(Some(BUTTON_OK));
        }
    }

    /// Set bounds and reset the value to the lower bound.
    pub fn set_bounds(&mut self, min: u32, max: u32) {
        self.min = min;
        self.max = max.max(min);
        self.value = self.min;
    }

    /// Current value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Bounds.
    pub fn bounds(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    /// Step up. Leaving the bounds lands on the maximum.
    pub fn increase(&mut self, step: u32) {
        let next = u64::from(self.value) + u64::from(step);
        self.value = if next > u64::from(self.max) {
            self.max
        } else {
            next as u32
        };
    }

    /// Step down. Leaving the bounds lands on the minimum.
    pub fn decrease(&mut self, step: u32) {
        self.value = match self.value.checked_sub(step) {
            Some(next) if next >= self.min => next,
            _ => self.min,
        };
    }

    fn button_at(&self, pos: Point) -> Option<usize> {
        self.buttons.iter().position(|rect| rect.contains(pos))
    }

    fn spin(&mut self, up_held: bool, down_held: bool) {
        if !up_held && !down_held {
            self.spin_ticks = 0;
            self.spin_increment = 1;
            return;
        }
        self.spin_ticks += 1;
        if self.spin_ticks % SPIN_DELAY != 0 {
            return;
        }
        if self.spin_ticks % (SPIN_DELAY * 10) == 0 {
            self.spin_increment = self.spin_increment.saturating_mul(10);
        }
        if up_held {
            self.increase(self.spin_increment);
        } else {
            self.decrease(self.spin_increment);
        }
    }

    /// Run one tick. Owns all input while visible.
    pub fn logic(&mut self, input: &mut InputState) -> PickerOutcome {
        if !self.is_visible() {
            return PickerOutcome::Pending;
        }

        if input.consume(Action::Cancel) {
            return self.close(PickerOutcome::Cancelled);
        }
        if input.consume(Action::Accept) {
            return self.close(PickerOutcome::Confirmed(self.value));
        }
        if input.consume(Action::Up) || input.consume(Action::Right) {
            self.increase(1);
        }
        if input.consume(Action::Down) || input.consume(Action::Left) {
            self.decrease(1);
        }

        let pointer = input.pointer();
        if input.consume(Action::Main1) {
            match self.button_at(pointer) {
                Some(BUTTON_UP) => self.increase(1),
                Some(BUTTON_DOWN) => self.decrease(1),
                Some(BUTTON_OK) => return self.close(PickerOutcome::Confirmed(self.value)),
                Some(BUTTON_CLOSE) => return self.close(PickerOutcome::Cancelled),
                _ => {}
            }
        }

        let held = input.pressing(Action::Main1);
        let over = self.button_at(pointer);
        self.spin(
            held && over == Some(BUTTON_UP),
            held && over == Some(BUTTON_DOWN),
        );
        PickerOutcome::Pending
    }

    fn close(&mut self, outcome: PickerOutcome) -> PickerOutcome {
        self.set_visible(false);
        if let Some(tablist) = self.tablist_mut() {
            tablist.lock();
        }
        outcome
    }
}

impl Panel for QuantityPicker {
    fn id(&self) -> PanelId {
        PanelId::QuantityPicker
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        self.button_at(pos)
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        self.buttons.get(slot).copied()
    }
}
