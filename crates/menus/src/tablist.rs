//! Keyboard focus order inside one panel.

use crate::panel::PanelId;

/// Outcome of confirming the focused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClickResult {
    /// Nothing happened (or focus was deactivated).
    None,
    /// The slot was focused/picked, or is the drop target of a held payload.
    Checked,
    /// A held payload was confirmed on the slot it was picked from.
    Activated,
}

/// Result of moving focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStep {
    /// Focus moved within this list.
    Moved,
    /// Focus left the list towards a linked panel.
    Leave(PanelId),
    /// The list is locked or empty.
    Blocked,
}

/// Ordered focusable slots of one panel.
///
/// Links to neighbouring panels are rebuilt every tick by the navigation
/// graph and are never saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabList {
    len: usize,
    cols: usize,
    current: Option<usize>,
    checked: Option<usize>,
    locked: bool,
    prev: Option<PanelId>,
    next: Option<PanelId>,
}

impl TabList {
    /// A list of `len` slots laid out `cols` per row. Starts locked.
    pub fn new(len: usize, cols: usize) -> Self {
        Self {
            len,
            cols: cols.max(1),
            locked: true,
            ..Self::default()
        }
    }

    /// Number of focusable slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there is nothing to focus.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resize, dropping focus that fell off the end.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.current.is_some_and(|c| c >= len) {
            self.current = len.checked_sub(1);
        }
        if self.checked.is_some_and(|c| c >= len) {
            self.checked = None;
        }
    }

    /// Focused slot.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Slot picked by the last confirm.
    pub fn checked(&self) -> Option<usize> {
        self.checked
    }

    /// Focus a specific slot.
    pub fn set_current(&mut self, slot: Option<usize>) {
        self.current = slot.filter(|s| *s < self.len);
    }

    /// Forget the picked slot.
    pub fn clear_checked(&mut self) {
        self.checked = None;
    }

    /// Whether the list refuses focus.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Refuse focus. The focused index is kept so focus returns to it.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Accept focus, landing on the first slot if nothing was focused.
    pub fn unlock(&mut self) {
        self.locked = false;
        if self.current.is_none() && self.len > 0 {
            self.current = Some(0);
        }
    }

    /// Focus the first slot.
    pub fn focus_first(&mut self) {
        self.current = if self.len > 0 { Some(0) } else { None };
    }

    /// Focus the last slot.
    pub fn focus_last(&mut self) {
        self.current = self.len.checked_sub(1);
    }

    /// Set the neighbouring lists for this tick.
    pub fn set_links(&mut self, prev: Option<PanelId>, next: Option<PanelId>) {
        self.prev = prev;
        self.next = next;
    }

    /// Panel that precedes this one.
    pub fn prev_link(&self) -> Option<PanelId> {
        self.prev
    }

    /// Panel that follows this one.
    pub fn next_link(&self) -> Option<PanelId> {
        self.next
    }

    /// Move to the next slot, leaving towards the next panel from the last
    /// slot, or wrapping when no panel is linked.
    pub fn next(&mut self) -> TabStep {
        if self.locked || self.len == 0 {
            return TabStep::Blocked;
        }
        match self.current {
            None => self.current = Some(0),
            Some(c) if c + 1 < self.len => self.current = Some(c + 1),
            Some(_) => match self.next {
                Some(panel) => return TabStep::Leave(panel),
                None => self.current = Some(0),
            },
        }
        TabStep::Moved
    }

    /// Move to the previous slot, mirroring [`TabList::next`].
    pub fn prev(&mut self) -> TabStep {
        if self.locked || self.len == 0 {
            return TabStep::Blocked;
        }
        match self.current {
            None => self.current = self.len.checked_sub(1),
            Some(c) if c > 0 => self.current = Some(c - 1),
            Some(_) => match self.prev {
                Some(panel) => return TabStep::Leave(panel),
                None => self.current = self.len.checked_sub(1),
            },
        }
        TabStep::Moved
    }

    /// Move one row down, staying put on the last row.
    pub fn down(&mut self) -> TabStep {
        if self.locked || self.len == 0 {
            return TabStep::Blocked;
        }
        let c = self.current.unwrap_or(0);
        if c + self.cols < self.len {
            self.current = Some(c + self.cols);
        } else {
            self.current = Some(c);
        }
        TabStep::Moved
    }

    /// Move one row up, staying put on the first row.
    pub fn up(&mut self) -> TabStep {
        if self.locked || self.len == 0 {
            return TabStep::Blocked;
        }
        let c = self.current.unwrap_or(0);
        self.current = Some(c.checked_sub(self.cols).unwrap_or(c));
        TabStep::Moved
    }

    /// Confirm the focused slot.
    ///
    /// Not holding anything: the first confirm checks the slot, confirming the
    /// checked slot again deactivates it. Holding a payload: confirming the
    /// slot it was picked from activates it, any other slot is checked as the
    /// drop target.
    pub fn confirm(&mut self, holding: bool) -> SlotClickResult {
        let Some(current) = self.current.filter(|_| !self.locked) else {
            return SlotClickResult::None;
        };
        if self.checked == Some(current) {
            if holding {
                return SlotClickResult::Activated;
            }
            self.checked = None;
            return SlotClickResult::None;
        }
        self.checked = Some(current);
        SlotClickResult::Checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(len: usize, cols: usize) -> TabList {
        let mut list = TabList::new(len, cols);
        list.unlock();
        list
    }

    #[test]
    fn new_lists_start_locked_and_unfocused() {
        let mut list = TabList::new(4, 2);
        assert!(list.is_locked());
        assert_eq!(list.next(), TabStep::Blocked);
        list.unlock();
        assert_eq!(list.current(), Some(0));
    }

    #[test]
    fn next_wraps_without_link_and_leaves_with_one() {
        let mut list = open(3, 3);
        list.set_current(Some(2));
        assert_eq!(list.next(), TabStep::Moved);
        assert_eq!(list.current(), Some(0));

        list.set_current(Some(2));
        list.set_links(None, Some(PanelId::Powers));
        assert_eq!(list.next(), TabStep::Leave(PanelId::Powers));
        assert_eq!(list.current(), Some(2));
    }

    #[test]
    fn prev_from_first_slot_leaves_backwards() {
        let mut list = open(3, 3);
        list.set_links(Some(PanelId::Stash), None);
        assert_eq!(list.prev(), TabStep::Leave(PanelId::Stash));
        list.set_links(None, None);
        assert_eq!(list.prev(), TabStep::Moved);
        assert_eq!(list.current(), Some(2));
    }

    #[test]
    fn rows_move_by_column_count() {
        let mut list = open(6, 3);
        list.down();
        assert_eq!(list.current(), Some(3));
        list.down();
        assert_eq!(list.current(), Some(3));
        list.up();
        list.up();
        assert_eq!(list.current(), Some(0));
    }

    #[test]
    fn confirm_cycle() {
        let mut list = open(4, 4);
        assert_eq!(list.confirm(false), SlotClickResult::Checked);
        assert_eq!(list.checked(), Some(0));
        // Re-confirming without a payload deactivates.
        assert_eq!(list.confirm(false), SlotClickResult::None);
        assert_eq!(list.checked(), None);

        assert_eq!(list.confirm(false), SlotClickResult::Checked);
        assert_eq!(list.confirm(true), SlotClickResult::Activated);

        list.next();
        assert_eq!(list.confirm(true), SlotClickResult::Checked);
        assert_eq!(list.checked(), Some(1));
    }

    #[test]
    fn shrinking_clamps_focus() {
        let mut list = open(5, 5);
        list.set_current(Some(4));
        list.set_len(2);
        assert_eq!(list.current(), Some(1));
    }
}
