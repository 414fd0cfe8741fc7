//! Fixed-size slot storage shared by the inventory, vendor and stash.

use std::mem;
use std::sync::Arc;

use menuhand_core::{EquipSlot, ItemCatalog, ItemId, ItemStack, Point, Rect};

/// How a click treats the clicked slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// Lift the whole stack out of the slot.
    Take,
    /// Report the stack but leave it in place (quantity picker pending).
    Peek,
}

/// A fixed number of item slots, each with a screen rect and an optional
/// equipment type restriction.
#[derive(Debug, Clone)]
pub struct SlotStorage {
    catalog: Arc<ItemCatalog>,
    slots: Vec<ItemStack>,
    rects: Vec<Rect>,
    slot_types: Vec<Option<EquipSlot>>,
    highlight: Vec<bool>,
    drag_prev_slot: Option<usize>,
}

impl SlotStorage {
    /// Untyped storage with one slot per rect.
    pub fn new(catalog: Arc<ItemCatalog>, rects: Vec<Rect>) -> Self {
        let count = rects.len();
        Self {
            catalog,
            slots: vec![ItemStack::EMPTY; count],
            rects,
            slot_types: vec![None; count],
            highlight: vec![false; count],
            drag_prev_slot: None,
        }
    }

    /// Typed storage: slot `i` only accepts equipment of `types[i]`.
    pub fn typed(catalog: Arc<ItemCatalog>, slots: Vec<(Rect, EquipSlot)>) -> Self {
        let (rects, types): (Vec<_>, Vec<_>) = slots.into_iter().unzip();
        let mut storage = Self::new(catalog, rects);
        storage.slot_types = types.into_iter().map(Some).collect();
        storage
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the storage has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in index order.
    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    /// Stack in `slot`, empty when out of range.
    pub fn stack_at(&self, slot: usize) -> ItemStack {
        self.slots.get(slot).copied().unwrap_or(ItemStack::EMPTY)
    }

    /// Overwrite a slot, returning what it held.
    pub fn set(&mut self, slot: usize, stack: ItemStack) -> ItemStack {
        match self.slots.get_mut(slot) {
            Some(current) => mem::replace(current, stack),
            None => stack,
        }
    }

    /// Equipment type required by `slot`.
    pub fn slot_type(&self, slot: usize) -> Option<EquipSlot> {
        self.slot_types.get(slot).copied().flatten()
    }

    /// Whether `slot` may hold `item` at all.
    pub fn accepts(&self, slot: usize, item: ItemId) -> bool {
        match self.slot_types.get(slot) {
            None => false,
            Some(None) => true,
            Some(Some(required)) => self.catalog.kind(item).equip_slot() == Some(*required),
        }
    }

    /// Screen rect of `slot`.
    pub fn slot_rect(&self, slot: usize) -> Option<Rect> {
        self.rects.get(slot).copied()
    }

    /// Slot under the pointer.
    pub fn slot_over(&self, pos: Point) -> Option<usize> {
        self.rects.iter().position(|rect| rect.contains(pos))
    }

    /// Free space for `item` in one slot.
    fn space_in(&self, slot: usize, item: ItemId) -> u32 {
        if !self.accepts(slot, item) {
            return 0;
        }
        let max = self.catalog.max_quantity(item);
        let current = self.slots[slot];
        if current.is_empty() {
            max
        } else if current.item == item {
            max.saturating_sub(current.quantity)
        } else {
            0
        }
    }

    /// Total units of `item` the storage can still take.
    pub fn capacity_for(&self, item: ItemId) -> u64 {
        (0..self.slots.len())
            .map(|slot| u64::from(self.space_in(slot, item)))
            .sum()
    }

    /// Whether the whole stack fits.
    pub fn fits(&self, stack: &ItemStack) -> bool {
        stack.is_empty() || self.capacity_for(stack.item) >= u64::from(stack.quantity)
    }

    /// Whether not even one unit of `item` fits.
    pub fn full(&self, item: ItemId) -> bool {
        self.capacity_for(item) == 0
    }

    fn fill(&mut self, slot: usize, remaining: &mut ItemStack) {
        let space = self.space_in(slot, remaining.item);
        if space == 0 {
            return;
        }
        let moved = remaining.quantity.min(space);
        let current = self.slots[slot];
        let base = if current.is_empty() { 0 } else { current.quantity };
        self.slots[slot] = ItemStack::new(remaining.item, base + moved);
        remaining.take(moved);
    }

    /// Add a stack, returning whatever did not fit.
    ///
    /// The preferred slot is tried first when it is empty or holds the same
    /// item, then partial stacks of the same item, then empty slots.
    pub fn add(&mut self, stack: ItemStack, preferred: Option<usize>) -> ItemStack {
        let mut remaining = stack;
        if remaining.is_empty() {
            return ItemStack::EMPTY;
        }

        if let Some(slot) = preferred.filter(|slot| *slot < self.slots.len()) {
            self.fill(slot, &mut remaining);
        }

        if self.catalog.max_quantity(remaining.item) > 1 {
            for slot in 0..self.slots.len() {
                if remaining.is_empty() {
                    break;
                }
                if self.slots[slot].item == remaining.item {
                    self.fill(slot, &mut remaining);
                }
            }
        }

        for slot in 0..self.slots.len() {
            if remaining.is_empty() {
                break;
            }
            if self.slots[slot].is_empty() {
                self.fill(slot, &mut remaining);
            }
        }

        remaining
    }

    /// Remove up to `quantity` from `slot`, returning the removed stack.
    pub fn subtract(&mut self, slot: usize, quantity: u32) -> ItemStack {
        let Some(current) = self.slots.get_mut(slot) else {
            return ItemStack::EMPTY;
        };
        let item = current.item;
        let removed = current.take(quantity);
        ItemStack::new(item, removed)
    }

    /// Remove one unit of `item` from the first slot holding it.
    pub fn remove(&mut self, item: ItemId) -> bool {
        self.remove_quantity(item, 1) == 1
    }

    /// Remove up to `quantity` units of `item` across slots, last slot first.
    pub fn remove_quantity(&mut self, item: ItemId, quantity: u32) -> u32 {
        let mut left = quantity;
        for slot in self.slots.iter_mut().rev() {
            if left == 0 {
                break;
            }
            if slot.item == item {
                left -= slot.take(left);
            }
        }
        quantity - left
    }

    /// Units of `item` held.
    pub fn count(&self, item: ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|stack| stack.item == item)
            .fold(0u32, |acc, stack| acc.saturating_add(stack.quantity))
    }

    /// Whether at least `quantity` units of `item` are held.
    pub fn contains(&self, item: ItemId, quantity: u32) -> bool {
        self.count(item) >= quantity
    }

    /// Normalize half-empty slots left behind by external edits.
    pub fn clean(&mut self) {
        for (slot, stack) in self.slots.iter_mut().enumerate() {
            if stack.is_empty() && *stack != ItemStack::EMPTY {
                stack.clear();
            }
            let max = self.catalog.max_quantity(stack.item);
            if !stack.is_empty() && stack.quantity > max {
                tracing::warn!(slot, item = stack.item, quantity = stack.quantity, max, "slot holds more than a full stack");
            }
        }
    }

    /// Pick from `slot`, remembering it as the drag origin.
    pub fn click(&mut self, slot: usize, mode: ClickMode) -> ItemStack {
        if slot >= self.slots.len() || self.slots[slot].is_empty() {
            return ItemStack::EMPTY;
        }
        self.drag_prev_slot = Some(slot);
        match mode {
            ClickMode::Take => mem::take(&mut self.slots[slot]),
            ClickMode::Peek => self.slots[slot],
        }
    }

    /// Slot the current drag was picked from.
    pub fn drag_prev_slot(&self) -> Option<usize> {
        self.drag_prev_slot
    }

    /// Forget the drag origin.
    pub fn clear_prev_slot(&mut self) {
        self.drag_prev_slot = None;
    }

    /// Put a dragged stack back where it came from, returning what did not fit.
    pub fn item_return(&mut self, stack: ItemStack) -> ItemStack {
        let origin = self.drag_prev_slot.take();
        self.add(stack, origin)
    }

    /// Split `quantity` off the drag origin slot.
    pub fn remove_from_prev_slot(&mut self, quantity: u32) -> ItemStack {
        match self.drag_prev_slot {
            Some(slot) => self.subtract(slot, quantity),
            None => ItemStack::EMPTY,
        }
    }

    /// Highlight slots of the given equipment type.
    pub fn highlight_matching(&mut self, kind: EquipSlot) {
        for (flag, slot_type) in self.highlight.iter_mut().zip(&self.slot_types) {
            *flag = *slot_type == Some(kind);
        }
    }

    /// Clear every highlight.
    pub fn highlight_clear(&mut self) {
        self.highlight.iter_mut().for_each(|flag| *flag = false);
    }

    /// Whether `slot` is highlighted.
    pub fn highlighted(&self, slot: usize) -> bool {
        self.highlight.get(slot).copied().unwrap_or(false)
    }

    /// Evict the first non-empty stack.
    pub fn evict_first(&mut self) -> ItemStack {
        self.slots
            .iter_mut()
            .find(|stack| !stack.is_empty())
            .map(mem::take)
            .unwrap_or(ItemStack::EMPTY)
    }

    /// Item catalog this storage stacks against.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }
}
