//! Storage-less windows: character sheet, quest log, NPC dialogs, exit
//! confirmation, developer console and books.

use menuhand_core::{Point, Rect};

use crate::config::DialogLayout;
use crate::panel::{Panel, PanelBase, PanelId};
use crate::tablist::TabList;

/// A window whose only interaction is a row of buttons.
#[derive(Debug, Clone)]
pub struct Dialog {
    id: PanelId,
    base: PanelBase,
    buttons: Vec<Rect>,
}

impl Dialog {
    /// Hidden dialog. Dialogs with buttons get a tab list.
    pub fn new(id: PanelId, layout: &DialogLayout) -> Self {
        let base = if layout.buttons.is_empty() {
            PanelBase::new(layout.window)
        } else {
            PanelBase::with_tablist(
                layout.window,
                TabList::new(layout.buttons.len(), layout.buttons.len()),
            )
        };
        Self {
            id,
            base,
            buttons: layout.buttons.clone(),
        }
    }

    /// Button rects in tab order.
    pub fn buttons(&self) -> &[Rect] {
        &self.buttons
    }
}

impl Panel for Dialog {
    fn id(&self) -> PanelId {
        self.id
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        self.buttons.iter().position(|rect| rect.contains(pos))
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        self.buttons.get(slot).copied()
    }
}

/// Exit confirmation buttons.
pub const EXIT_CONFIRM: usize = 0;
/// Exit cancel button.
pub const EXIT_CANCEL: usize = 1;

/// Outcome of one tick of a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    /// Nothing decided.
    Pending,
    /// Confirmed.
    Confirm,
    /// Dismissed.
    Cancel,
}

impl Dialog {
    /// Map a pressed button of a confirm/cancel dialog to a choice.
    pub fn choice_for(&self, button: Option<usize>) -> DialogChoice {
        match button {
            Some(EXIT_CONFIRM) => DialogChoice::Confirm,
            Some(EXIT_CANCEL) => DialogChoice::Cancel,
            _ => DialogChoice::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DialogLayouts;

    #[test]
    fn buttonless_dialogs_are_not_navigable() {
        let layouts = DialogLayouts::default();
        assert!(Dialog::new(PanelId::Book, &layouts.book).tablist().is_none());
        let exit = Dialog::new(PanelId::Exit, &layouts.exit);
        assert_eq!(exit.tablist().map(TabList::len), Some(2));
    }

    #[test]
    fn exit_buttons_map_to_choices() {
        let layouts = DialogLayouts::default();
        let exit = Dialog::new(PanelId::Exit, &layouts.exit);
        let confirm = layouts.exit.buttons[0].center();
        assert_eq!(exit.choice_for(exit.slot_over(confirm)), DialogChoice::Confirm);
        assert_eq!(exit.choice_for(None), DialogChoice::Pending);
    }
}
