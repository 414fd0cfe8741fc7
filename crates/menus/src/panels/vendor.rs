//! NPC vendor with a buy tab (stock) and a sell tab (buy-back).

use std::sync::Arc;

use menuhand_core::{ItemCatalog, ItemStack, Point, Rect, TooltipContext, TooltipData};

use crate::config::VendorLayout;
use crate::panel::{Panel, PanelBase, PanelId};
use crate::storage::{ClickMode, SlotStorage};
use crate::tablist::TabList;

/// Vendor tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorTab {
    /// Vendor stock, sold at the buy price.
    Buy,
    /// Items the player sold, bought back at the sell price.
    Sell,
}

impl VendorTab {
    fn index(self) -> usize {
        match self {
            VendorTab::Buy => 0,
            VendorTab::Sell => 1,
        }
    }
}

/// Vendor panel.
///
/// Unified slot indices cover both tabs: the buy tab first, then the sell tab.
#[derive(Debug, Clone)]
pub struct Vendor {
    base: PanelBase,
    catalog: Arc<ItemCatalog>,
    stock: [SlotStorage; 2],
    active: VendorTab,
    tab_rects: [Rect; 2],
    drag_prev_tab: Option<VendorTab>,
}

impl Vendor {
    /// Empty vendor.
    pub fn new(layout: &VendorLayout, catalog: Arc<ItemCatalog>) -> Self {
        let rects = layout.grid.rects();
        let stock = [
            SlotStorage::new(Arc::clone(&catalog), rects.clone()),
            SlotStorage::new(Arc::clone(&catalog), rects),
        ];
        let tablist = TabList::new(layout.grid.slots * 2, layout.grid.cols);
        Self {
            base: PanelBase::with_tablist(layout.window, tablist),
            catalog,
            stock,
            active: VendorTab::Buy,
            tab_rects: [layout.buy_tab, layout.sell_tab],
            drag_prev_tab: None,
        }
    }

    fn tab_len(&self) -> usize {
        self.stock[0].len()
    }

    /// Split a unified index into tab and local slot.
    pub fn locate(&self, slot: usize) -> Option<(VendorTab, usize)> {
        let len = self.tab_len();
        if slot < len {
            Some((VendorTab::Buy, slot))
        } else if slot < len * 2 {
            Some((VendorTab::Sell, slot - len))
        } else {
            None
        }
    }

    fn index_of(&self, tab: VendorTab, local: usize) -> usize {
        tab.index() * self.tab_len() + local
    }

    /// Storage of one tab.
    pub fn stock(&self, tab: VendorTab) -> &SlotStorage {
        &self.stock[tab.index()]
    }

    /// Replace the vendor's stock and clear the buy-back tab.
    pub fn set_stock(&mut self, items: &[ItemStack]) {
        let rects: Vec<Rect> = (0..self.tab_len())
            .filter_map(|i| self.stock[0].slot_rect(i))
            .collect();
        self.stock = [
            SlotStorage::new(Arc::clone(&self.catalog), rects.clone()),
            SlotStorage::new(Arc::clone(&self.catalog), rects),
        ];
        for stack in items {
            let leftover = self.stock[0].add(*stack, None);
            if !leftover.is_empty() {
                tracing::warn!(item = leftover.item, quantity = leftover.quantity, "vendor stock overflow");
            }
        }
        self.active = VendorTab::Buy;
    }

    /// Normalize both tabs.
    pub fn clean(&mut self) {
        for stock in &mut self.stock {
            stock.clean();
        }
    }

    /// Visible tab.
    pub fn active_tab(&self) -> VendorTab {
        self.active
    }

    /// Switch tabs. Keyboard focus keeps its place in the grid.
    pub fn set_tab(&mut self, tab: VendorTab) {
        if self.active == tab {
            return;
        }
        self.active = tab;
        let len = self.tab_len();
        if let Some(tablist) = self.base.tablist.as_mut() {
            if let Some(current) = tablist.current() {
                tablist.set_current(Some(tab.index() * len + current % len.max(1)));
            }
        }
    }

    /// Show the tab that holds the keyboard-focused slot.
    pub fn follow_focus(&mut self) {
        let focused = self.base.tablist.as_ref().and_then(TabList::current);
        if let Some((tab, _)) = focused.and_then(|slot| self.locate(slot)) {
            if tab != self.active {
                tracing::debug!(?tab, "vendor tab follows keyboard focus");
                self.active = tab;
            }
        }
    }

    /// Tab button under the pointer.
    pub fn tab_over(&self, pos: Point) -> Option<VendorTab> {
        if self.tab_rects[0].contains(pos) {
            Some(VendorTab::Buy)
        } else if self.tab_rects[1].contains(pos) {
            Some(VendorTab::Sell)
        } else {
            None
        }
    }

    /// Stack in a unified slot.
    pub fn stack_at(&self, slot: usize) -> ItemStack {
        self.locate(slot)
            .map(|(tab, local)| self.stock[tab.index()].stack_at(local))
            .unwrap_or(ItemStack::EMPTY)
    }

    /// Tab the current drag came from.
    pub fn drag_prev_tab(&self) -> Option<VendorTab> {
        self.drag_prev_tab
    }

    /// Pick from a slot.
    pub fn click(&mut self, slot: usize, mode: ClickMode) -> ItemStack {
        let Some((tab, local)) = self.locate(slot) else {
            return ItemStack::EMPTY;
        };
        let stack = self.stock[tab.index()].click(local, mode);
        if !stack.is_empty() {
            self.drag_prev_tab = Some(tab);
        }
        stack
    }

    /// Put a dragged stack back. Returns what did not fit.
    pub fn item_return(&mut self, stack: ItemStack) -> ItemStack {
        let tab = self.drag_prev_tab.take().unwrap_or(VendorTab::Buy);
        self.stock[tab.index()].item_return(stack)
    }

    /// Split off the drag origin slot.
    pub fn remove_from_prev_slot(&mut self, quantity: u32) -> ItemStack {
        match self.drag_prev_tab {
            Some(tab) => self.stock[tab.index()].remove_from_prev_slot(quantity),
            None => ItemStack::EMPTY,
        }
    }

    /// Unit price of the dragged stack: the buy price from stock, the sell
    /// price from buy-back.
    pub fn unit_price(&self, stack: &ItemStack) -> u32 {
        let Some(def) = self.catalog.get(stack.item) else {
            return 0;
        };
        match self.drag_prev_tab {
            Some(VendorTab::Sell) => def.sell_price(),
            _ => def.price,
        }
    }

    /// Forget the drag origin after a completed purchase.
    pub fn finish_drag(&mut self) {
        if let Some(tab) = self.drag_prev_tab.take() {
            self.stock[tab.index()].clear_prev_slot();
        }
    }

    /// Put a sold stack on the buy-back tab, evicting the oldest stack when full.
    pub fn add_buyback(&mut self, stack: ItemStack) {
        let buyback = &mut self.stock[VendorTab::Sell.index()];
        let mut leftover = buyback.add(stack, None);
        while !leftover.is_empty() {
            let evicted = buyback.evict_first();
            if evicted.is_empty() {
                break;
            }
            tracing::debug!(item = evicted.item, quantity = evicted.quantity, "buy-back evicted");
            leftover = buyback.add(leftover, None);
        }
    }
}

impl Panel for Vendor {
    fn id(&self) -> PanelId {
        PanelId::Vendor
    }

    fn base(&self) -> &PanelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }

    fn slot_over(&self, pos: Point) -> Option<usize> {
        let local = self.stock[self.active.index()].slot_over(pos)?;
        Some(self.index_of(self.active, local))
    }

    fn slot_rect(&self, slot: usize) -> Option<Rect> {
        let (tab, local) = self.locate(slot)?;
        self.stock[tab.index()].slot_rect(local)
    }

    fn slot_tooltip(&self, slot: usize) -> TooltipData {
        let context = match self.locate(slot) {
            Some((VendorTab::Sell, _)) => TooltipContext::VendorSell,
            _ => TooltipContext::VendorBuy,
        };
        self.catalog.tooltip(&self.stack_at(slot), context)
    }
}
