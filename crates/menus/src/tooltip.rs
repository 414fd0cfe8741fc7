//! Tooltip caching.
//!
//! One entry follows the pointer and one entry exists per keyboard-navigable
//! panel. An entry is reused only while it points at the same slot with
//! structurally equal content; anything else asks the renderer to lay the
//! text out again. Entries that are not refreshed during a tick are dropped.

use std::collections::BTreeMap;

use menuhand_core::{Point, TooltipData};
use menuhand_input::Modality;
use serde::Serialize;
use tracing::trace;

use crate::panel::PanelId;

/// Which cache an update goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TooltipKey {
    /// Pointer hover.
    Pointer,
    /// Keyboard focus inside a panel.
    Focus(PanelId),
}

/// A cached tooltip ready for drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipView {
    /// Panel and slot the tooltip describes.
    pub panel: PanelId,
    /// Slot index within the panel.
    pub slot: usize,
    /// Content.
    pub data: TooltipData,
    /// Screen anchor.
    pub anchor: Point,
    /// Whether the text has to be laid out again this frame.
    pub rasterize: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    view: TooltipView,
    seen: bool,
}

/// Per-modality tooltip cache.
#[derive(Debug, Clone, Default)]
pub struct TooltipCache {
    pointer: Option<Entry>,
    focus: BTreeMap<PanelId, Entry>,
    rasterizations: u64,
}

impl TooltipCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tick: every entry must be refreshed or it is dropped.
    pub fn begin_tick(&mut self) {
        if let Some(entry) = self.pointer.as_mut() {
            entry.seen = false;
        }
        for entry in self.focus.values_mut() {
            entry.seen = false;
        }
    }

    /// Offer this tick's content for a key. Returns whether it must be
    /// rasterized again.
    pub fn update(
        &mut self,
        key: TooltipKey,
        panel: PanelId,
        slot: usize,
        data: TooltipData,
        anchor: Point,
    ) -> bool {
        let previous = match key {
            TooltipKey::Pointer => self.pointer.take(),
            TooltipKey::Focus(id) => self.focus.remove(&id),
        };
        if data.is_empty() {
            return false;
        }
        let (rasterize, entry) = Self::refresh(previous, panel, slot, data, anchor);
        match key {
            TooltipKey::Pointer => self.pointer = Some(entry),
            TooltipKey::Focus(id) => {
                self.focus.insert(id, entry);
            }
        }
        if rasterize {
            self.rasterizations += 1;
        }
        rasterize
    }

    fn refresh(
        previous: Option<Entry>,
        panel: PanelId,
        slot: usize,
        data: TooltipData,
        anchor: Point,
    ) -> (bool, Entry) {
        match previous {
            Some(mut entry)
                if entry.view.panel == panel && entry.view.slot == slot && entry.view.data == data =>
            {
                entry.view.anchor = anchor;
                entry.view.rasterize = false;
                entry.seen = true;
                (false, entry)
            }
            _ => {
                trace!(%panel, slot, "tooltip content changed");
                let view = TooltipView {
                    panel,
                    slot,
                    data,
                    anchor,
                    rasterize: true,
                };
                (true, Entry { view, seen: true })
            }
        }
    }

    /// Finish a tick, dropping entries nobody refreshed.
    pub fn end_tick(&mut self) {
        if self.pointer.as_ref().is_some_and(|entry| !entry.seen) {
            self.pointer = None;
        }
        self.focus.retain(|_, entry| entry.seen);
    }

    /// Tooltip for the active modality.
    pub fn active(&self, modality: Modality, focused: Option<PanelId>) -> Option<&TooltipView> {
        match modality {
            Modality::Pointer => self.pointer.as_ref().map(|entry| &entry.view),
            Modality::Keyboard => focused
                .and_then(|id| self.focus.get(&id))
                .map(|entry| &entry.view),
        }
    }

    /// Number of times any entry asked for rasterization.
    pub fn rasterizations(&self) -> u64 {
        self.rasterizations
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.pointer = None;
        self.focus.clear();
    }
}
