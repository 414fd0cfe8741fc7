//! One tick of menu logic.
//!
//! [`MenuManager`] owns every panel, the drag controller, the modal gate, the
//! focus graph and the tooltip cache. Panels never call each other; anything
//! that crosses panels happens here or in the transfer table.

use std::sync::Arc;

use menuhand_core::{ItemCatalog, ItemStack, Point, PowerCatalog, PowerId, SimTick, NO_POWER};
use menuhand_input::{Action, InputState, Modality};
use tracing::{debug, info, warn};

use crate::config::MenuConfig;
use crate::drag::{DragController, DragSource, DragStart, DragState};
use crate::events::MenuEvent;
use crate::frame::{ActionSlotFrame, DragIconFrame, MenuFrame, PanelFrame};
use crate::messages::MessageLog;
use crate::modal::ModalGate;
use crate::navigation::NavigationFocusGraph;
use crate::panel::{Panel, PanelId};
use crate::panels::{DialogChoice, InventoryUse, MenuPanels, PickerOutcome};
use crate::tablist::SlotClickResult;
use crate::tooltip::{TooltipCache, TooltipKey};
use crate::transfer::{DropTarget, TransferOutcome};
use crate::TransferError;

/// What the menus need to know about the avatar each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarStatus {
    /// Dead avatars lose whatever is in hand and every open menu.
    pub alive: bool,
    /// Level, for power requirements.
    pub level: u32,
}

impl Default for AvatarStatus {
    fn default() -> Self {
        Self {
            alive: true,
            level: 1,
        }
    }
}

/// Coordinates all menus.
#[derive(Debug)]
pub struct MenuManager {
    config: MenuConfig,
    items: Arc<ItemCatalog>,
    panels: MenuPanels,
    drag: DragController,
    gate: ModalGate,
    nav: NavigationFocusGraph,
    tooltips: TooltipCache,
    messages: MessageLog,
    events: Vec<MenuEvent>,
    shown: Vec<PanelId>,
    tick: SimTick,
    modality: Modality,
    pointer: Point,
    warned_sticky_split: bool,
    storage_edited: bool,
}

impl MenuManager {
    /// Build every panel from configuration and catalogs.
    pub fn new(config: MenuConfig, items: Arc<ItemCatalog>, powers: Arc<PowerCatalog>) -> Self {
        let mut panels = MenuPanels::new(&config, Arc::clone(&items), Arc::clone(&powers));
        let mut nav = NavigationFocusGraph::new();
        nav.rebuild(&mut panels);
        let shown = panels.visible().collect();
        let modality = if config.keyboard_only {
            Modality::Keyboard
        } else {
            Modality::Pointer
        };
        Self {
            messages: MessageLog::new(config.hud_log_size),
            drag: DragController::new(Arc::clone(&items), powers),
            config,
            items,
            panels,
            gate: ModalGate::new(),
            nav,
            tooltips: TooltipCache::new(),
            events: Vec::new(),
            shown,
            tick: SimTick::ZERO,
            modality,
            pointer: Point::default(),
            warned_sticky_split: false,
            storage_edited: false,
        }
    }

    /// Advance the menus by one tick.
    pub fn logic(&mut self, input: &mut InputState, avatar: &AvatarStatus) {
        self.tick = self.tick.advance(1);
        self.modality = if self.config.keyboard_only {
            Modality::Keyboard
        } else {
            input.modality()
        };
        self.pointer = input.pointer();
        self.gate.release_latch(input);
        self.panels.powers.set_level(avatar.level);
        if std::mem::take(&mut self.storage_edited) {
            self.panels.clean_storage();
        }

        if !avatar.alive {
            self.reset_drag();
        } else if !self.modal_logic(input) {
            self.cancel_logic(input);
            self.toggle_logic(input);
            match self.modality {
                Modality::Keyboard => self.keyboard_logic(input),
                Modality::Pointer => self.pointer_logic(input),
            }
        }
        self.finish_tick();
    }

    /// Snapshot for the renderer.
    pub fn render(&self) -> MenuFrame {
        let keyboard = self.modality == Modality::Keyboard;
        let focused = self.nav.focused_slot(&self.panels).filter(|_| keyboard);
        let panels = self
            .panels
            .visible()
            .map(|id| {
                let panel = self.panels.get(id);
                PanelFrame {
                    id,
                    area: panel.window_area(),
                    focused_slot: focused.filter(|(f, _)| *f == id).map(|(_, slot)| slot),
                    checked_slot: panel.tablist().and_then(|t| t.checked()),
                }
            })
            .collect();
        let drag_icon = self.drag.state().and_then(|state| {
            let icon = state.icon()?;
            let at = match focused {
                Some((panel, slot)) if state.is_from_keyboard() => self
                    .panels
                    .get(panel)
                    .slot_rect(slot)
                    .map_or(self.pointer, |rect| rect.origin()),
                _ => self.pointer,
            };
            Some(DragIconFrame {
                icon: icon.icon(),
                quantity: icon.quantity(),
                at,
            })
        });
        MenuFrame {
            panels,
            drag_icon,
            tooltip: self
                .tooltips
                .active(self.modality, self.nav.focused())
                .cloned(),
            modality: self.modality,
            hud: self.messages.hud().map(|entry| entry.text.clone()).collect(),
            paused: self.is_paused(),
            action_slots: (0..self.panels.action_bar.len())
                .map(|slot| {
                    let bar = &self.panels.action_bar;
                    ActionSlotFrame {
                        power: bar.power_at(slot),
                        enabled: bar.is_enabled(slot),
                        item_count: bar.item_count(slot),
                    }
                })
                .collect(),
        }
    }

    /// Cancel any drag or pending split, then close every menu.
    pub fn reset_drag(&mut self) {
        self.cancel_drag();
        if self.drag.cancel_split(&mut self.panels) {
            debug!("pending split dropped");
        }
        self.panels.set_visible(PanelId::QuantityPicker, false);
        self.panels.set_visible(PanelId::DevConsole, false);
        ModalGate::close_all(&mut self.panels, false);
    }

    /// Close both groups. Ignored while dragging.
    pub fn close_all(&mut self) -> bool {
        let dragging = self.is_dragging();
        ModalGate::close_all(&mut self.panels, dragging)
    }

    /// Close the left group. Ignored while dragging.
    pub fn close_left(&mut self) -> bool {
        let dragging = self.is_dragging();
        ModalGate::close_left(&mut self.panels, dragging)
    }

    /// Close the right group. Ignored while dragging.
    pub fn close_right(&mut self) -> bool {
        let dragging = self.is_dragging();
        ModalGate::close_right(&mut self.panels, dragging)
    }

    /// Whether something is in hand or waiting for the quantity picker.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active() || self.drag.pending_split().is_some()
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<MenuEvent> {
        std::mem::take(&mut self.events)
    }

    /// Open a vendor with its stock, alongside the inventory.
    pub fn open_vendor(&mut self, stock: &[ItemStack]) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.panels.vendor.set_stock(stock);
        ModalGate::open(&mut self.panels, PanelId::Vendor);
        ModalGate::open(&mut self.panels, PanelId::Inventory);
        true
    }

    /// Open the stash alongside the inventory.
    pub fn open_stash(&mut self) -> bool {
        if self.is_dragging() {
            return false;
        }
        ModalGate::open(&mut self.panels, PanelId::Stash);
        ModalGate::open(&mut self.panels, PanelId::Inventory);
        true
    }

    /// Open an NPC window: talker, action menu or book.
    pub fn open_npc_window(&mut self, id: PanelId) -> bool {
        if self.is_dragging() || !matches!(id, PanelId::Talker | PanelId::NpcActions | PanelId::Book) {
            return false;
        }
        ModalGate::open(&mut self.panels, id);
        true
    }

    /// A cutscene takes over the screen.
    pub fn start_cutscene(&mut self) {
        info!("cutscene started, closing menus");
        self.reset_drag();
    }

    /// Give loot to the inventory. What does not fit is dropped to the ground.
    pub fn add_item(&mut self, stack: ItemStack) -> bool {
        let leftover = self.panels.inventory.add(stack);
        if leftover.is_empty() {
            return true;
        }
        self.message("Inventory is full.".to_string());
        self.events.push(MenuEvent::DropToGround { stack: leftover });
        false
    }

    /// Every panel.
    pub fn panels(&self) -> &MenuPanels {
        &self.panels
    }

    /// Every panel, mutably (loading state, test setup). Slot storage is
    /// cleaned at the start of the next tick.
    pub fn panels_mut(&mut self) -> &mut MenuPanels {
        self.storage_edited = true;
        &mut self.panels
    }

    /// The drag controller.
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Message log.
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Tooltip cache.
    pub fn tooltips(&self) -> &TooltipCache {
        &self.tooltips
    }

    /// Keyboard-focused panel and slot.
    pub fn focus(&self) -> Option<(PanelId, usize)> {
        self.nav.focused_slot(&self.panels)
    }

    /// Ticks run so far.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Active configuration.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Whether open menus pause the game.
    pub fn is_paused(&self) -> bool {
        self.config.menus_pause && ModalGate::menus_open(&self.panels)
    }

    fn modal_logic(&mut self, input: &mut InputState) -> bool {
        let Some(modal) = ModalGate::active_modal(&self.panels) else {
            return false;
        };
        match modal {
            PanelId::QuantityPicker => match self.panels.picker.logic(input) {
                PickerOutcome::Confirmed(quantity) => {
                    if self.drag.confirm_split(&mut self.panels, quantity) {
                        self.drag_started();
                    }
                }
                PickerOutcome::Cancelled => {
                    self.drag.cancel_split(&mut self.panels);
                    self.panels.clear_checked();
                }
                PickerOutcome::Pending => {}
            },
            PanelId::Exit => self.exit_logic(input),
            _ => {
                if input.consume(Action::Cancel) || self.gate.take_console_toggle(input) {
                    self.panels.set_visible(modal, false);
                }
            }
        }
        if input.pressing(Action::Main1) {
            input.lock(Action::Main1);
        }
        true
    }

    fn exit_logic(&mut self, input: &mut InputState) {
        if input.consume(Action::Cancel) {
            self.panels.set_visible(PanelId::Exit, false);
            return;
        }
        if self.modality == Modality::Keyboard {
            self.nav.navigate(&mut self.panels, input);
        }
        let button = if input.consume(Action::Accept) {
            self.panels.exit.tablist().and_then(|t| t.current())
        } else if input.consume(Action::Main1) {
            self.panels.exit.slot_over(self.pointer)
        } else {
            None
        };
        match self.panels.exit.choice_for(button) {
            DialogChoice::Confirm => {
                info!("exit confirmed");
                self.panels.set_visible(PanelId::Exit, false);
                self.events.push(MenuEvent::ExitRequested);
            }
            DialogChoice::Cancel => self.panels.set_visible(PanelId::Exit, false),
            DialogChoice::Pending => {}
        }
    }

    fn cancel_logic(&mut self, input: &mut InputState) {
        if !input.consume(Action::Cancel) {
            return;
        }
        if self.drag.is_active() {
            self.cancel_drag();
        } else if ModalGate::menus_open(&self.panels) {
            ModalGate::close_all(&mut self.panels, false);
            self.panels.clear_checked();
        } else {
            ModalGate::open(&mut self.panels, PanelId::Exit);
        }
    }

    fn toggle_logic(&mut self, input: &mut InputState) {
        let dragging = self.is_dragging();
        if let Some(id) = self.gate.take_toggle(input, dragging) {
            self.gate.toggle(&mut self.panels, id, dragging);
        }
        if !dragging && self.gate.take_console_toggle(input) {
            ModalGate::open(&mut self.panels, PanelId::DevConsole);
        }
        self.enforce_vendor_rule();
    }

    fn enforce_vendor_rule(&mut self) {
        if self.panels.is_visible(PanelId::Vendor) && !self.panels.is_visible(PanelId::Inventory) {
            debug!("inventory closed, closing vendor");
            self.panels.set_visible(PanelId::Vendor, false);
        }
    }

    fn keyboard_logic(&mut self, input: &mut InputState) {
        self.nav.navigate(&mut self.panels, input);
        let Some((panel, slot)) = self.nav.focused_slot(&self.panels) else {
            return;
        };
        if panel == PanelId::Vendor {
            self.panels.vendor.follow_focus();
        }
        if !self.drag.is_active() && input.consume(Action::Main2) {
            self.activate(panel, slot);
            return;
        }
        if !input.consume(Action::Accept) {
            return;
        }
        let holding = self.drag.is_active();
        let Some(result) = self
            .panels
            .get_mut(panel)
            .tablist_mut()
            .map(|t| t.confirm(holding))
        else {
            return;
        };
        let from_origin = self.drag.source().panel() == Some(panel);
        match (result, holding) {
            (SlotClickResult::Checked, false) => {
                if !self.keyboard_pick(panel, slot, input.split_modifier()) {
                    self.panels.clear_checked();
                }
            }
            (SlotClickResult::Activated, true) if from_origin => self.keyboard_quick_action(slot),
            (SlotClickResult::Checked | SlotClickResult::Activated, true) => {
                self.complete_drag(DropTarget::Panel {
                    panel,
                    slot: Some(slot),
                })
            }
            _ => {}
        }
    }

    fn keyboard_pick(&mut self, panel: PanelId, slot: usize, split: bool) -> bool {
        match panel {
            PanelId::ActionBar => {
                self.activate(panel, slot);
                false
            }
            PanelId::Powers if self.panels.powers.can_unlock(slot) => {
                self.unlock_power(slot);
                false
            }
            _ => match DragSource::from_panel(panel) {
                Some(source) => {
                    let how = DragStart {
                        sticky: false,
                        from_keyboard: true,
                    };
                    self.pick(source, slot, split || self.config.keyboard_only, how)
                }
                None => false,
            },
        }
    }

    /// Confirming the origin slot again: do what a ctrl-click would.
    fn keyboard_quick_action(&mut self, slot: usize) {
        let source = self.drag.source();
        if let Some(target) = self.quick_target(source) {
            self.complete_drag(target);
            return;
        }
        let power = self.drag.state().map_or(NO_POWER, DragState::power);
        self.cancel_drag();
        match source {
            DragSource::Inventory => self.activate(PanelId::Inventory, slot),
            DragSource::Powers => self.bind_first_free(power),
            _ => {}
        }
    }

    fn pointer_logic(&mut self, input: &mut InputState) {
        let pos = self.pointer;
        if let Some(state) = self.drag.state() {
            let click_to_drop = state.is_sticky() || state.is_from_keyboard();
            if click_to_drop {
                if input.consume(Action::Main1) {
                    self.complete_drag(self.pointer_target(pos));
                }
            } else if !input.pressing(Action::Main1) {
                self.complete_drag(self.pointer_target(pos));
            }
            return;
        }

        if input.triggered(Action::Main2) {
            if let Some((panel, Some(slot))) = self.panels.slot_under(pos) {
                input.lock(Action::Main2);
                self.activate(panel, slot);
            }
        }
        if !input.triggered(Action::Main1) {
            return;
        }
        let Some(owner) = ModalGate::click_owner(&self.panels, pos) else {
            return;
        };
        input.lock(Action::Main1);
        let ctrl = input.pressing(Action::Ctrl);
        let split = input.split_modifier();
        self.click_panel(owner, pos, ctrl, split);
    }

    fn click_panel(&mut self, owner: PanelId, pos: Point, ctrl: bool, split: bool) {
        match owner {
            PanelId::ActionBar => {
                if let Some(menu) = self.panels.action_bar.menu_button_at(pos) {
                    self.gate.toggle(&mut self.panels, menu, false);
                    self.enforce_vendor_rule();
                    return;
                }
            }
            PanelId::Vendor => {
                if let Some(tab) = self.panels.vendor.tab_over(pos) {
                    self.panels.vendor.set_tab(tab);
                    return;
                }
            }
            _ => {}
        }
        let Some(slot) = self.panels.get(owner).slot_over(pos) else {
            return;
        };
        if owner == PanelId::Powers && self.panels.powers.can_unlock(slot) {
            self.unlock_power(slot);
            return;
        }
        let Some(source) = DragSource::from_panel(owner) else {
            return;
        };
        if ctrl {
            self.quick_transfer(source, slot);
            return;
        }
        let how = DragStart {
            sticky: self.config.sticky_drag,
            from_keyboard: false,
        };
        self.pick(source, slot, split || self.config.keyboard_only, how);
    }

    /// Start a drag, or hand the stack to the quantity picker first.
    fn pick(&mut self, source: DragSource, slot: usize, split: bool, how: DragStart) -> bool {
        if split {
            if let Some(max) = self.drag.begin_split(&mut self.panels, source, slot, how.from_keyboard) {
                if !how.sticky && !how.from_keyboard && !self.warned_sticky_split {
                    warn!("split drags are sticky even with hold-to-drag configured");
                    self.warned_sticky_split = true;
                }
                self.panels.picker.open(max);
                return true;
            }
        }
        if !self.drag.start(&mut self.panels, source, slot, how) {
            return false;
        }
        self.drag_started();
        true
    }

    fn drag_started(&mut self) {
        let Some(state) = self.drag.state() else {
            return;
        };
        let source = state.source();
        let payload = state.payload();
        let stack = state.stack();
        if !stack.is_empty() {
            self.panels.inventory.highlight_matching(stack.item);
        }
        self.events.push(MenuEvent::DragStarted { source, payload });
    }

    fn quick_target(&self, source: DragSource) -> Option<DropTarget> {
        let to = |panel| DropTarget::Panel { panel, slot: None };
        match source {
            DragSource::Vendor | DragSource::Stash => Some(to(PanelId::Inventory)),
            DragSource::Inventory if self.panels.is_visible(PanelId::Stash) => Some(to(PanelId::Stash)),
            DragSource::Inventory
                if self.panels.is_visible(PanelId::Vendor) || self.config.sell_without_vendor =>
            {
                Some(to(PanelId::Vendor))
            }
            _ => None,
        }
    }

    /// Ctrl-click: start and complete within the tick.
    fn quick_transfer(&mut self, source: DragSource, slot: usize) {
        match source {
            DragSource::ActionBar => match self.panels.action_bar.remove(slot) {
                Ok(power) => debug!(slot, power, "action bar slot cleared"),
                Err(err) => self.refused(source, &err),
            },
            DragSource::Powers => {
                let power = self.panels.powers.click(slot);
                self.bind_first_free(power);
            }
            _ => {
                if let Some(target) = self.quick_target(source) {
                    if self.pick(source, slot, false, DragStart::default()) {
                        self.complete_drag(target);
                    }
                }
            }
        }
    }

    fn bind_first_free(&mut self, power: PowerId) {
        if power == NO_POWER {
            return;
        }
        match self.panels.action_bar.add_power(power) {
            Some(slot) => debug!(slot, power, "power bound to first free slot"),
            None => debug!(power, "no free action bar slot"),
        }
    }

    fn unlock_power(&mut self, slot: usize) {
        if self.panels.powers.unlock_click(slot) {
            self.events.push(MenuEvent::PowerUnlocked { slot });
        }
    }

    fn activate(&mut self, panel: PanelId, slot: usize) {
        match panel {
            PanelId::Inventory => {
                if let Some(InventoryUse::Consumed { item, power }) = self.panels.inventory.activate(slot) {
                    self.events.push(MenuEvent::UseItem { item, power });
                }
            }
            PanelId::ActionBar => {
                if let Some(power) = self.panels.action_bar.check_action(slot) {
                    self.events.push(MenuEvent::UsePower { slot, power });
                }
            }
            _ => {}
        }
    }

    fn pointer_target(&self, pos: Point) -> DropTarget {
        match self.panels.slot_under(pos) {
            Some((panel, slot)) => DropTarget::Panel { panel, slot },
            None => DropTarget::World,
        }
    }

    fn complete_drag(&mut self, target: DropTarget) {
        let source = self.drag.source();
        let outcome = self.drag.complete(&mut self.panels, target);
        self.panels.clear_checked();
        match outcome {
            TransferOutcome::Idle => {}
            TransferOutcome::Returned(err) => self.refused(source, &err),
            outcome => {
                self.events.push(MenuEvent::DragCompleted { source, target });
                match outcome {
                    TransferOutcome::Sold { value } => self.events.push(MenuEvent::Sold { value }),
                    TransferOutcome::Bought { cost } => self.events.push(MenuEvent::Bought { cost }),
                    TransferOutcome::Dropped(stack) => self.events.push(MenuEvent::DropToGround { stack }),
                    _ => {}
                }
            }
        }
    }

    fn cancel_drag(&mut self) -> bool {
        let source = self.drag.source();
        if !self.drag.cancel(&mut self.panels) {
            return false;
        }
        self.panels.clear_checked();
        self.events.push(MenuEvent::DragCancelled { source });
        true
    }

    fn refused(&mut self, source: DragSource, err: &TransferError) {
        if let Some(text) = err.player_message() {
            self.message(text);
        }
        self.events.push(MenuEvent::TransferRefused {
            source,
            reason: err.to_string(),
        });
    }

    fn message(&mut self, text: String) {
        self.messages.push(self.tick, text.clone());
        self.events.push(MenuEvent::Message { text });
    }

    fn finish_tick(&mut self) {
        for item in self.panels.inventory.take_equipped() {
            self.events.push(MenuEvent::Equipped { item });
            if let Some(power) = self.items.power(item) {
                self.bind_first_free(power);
            }
        }
        self.panels
            .action_bar
            .update_item_state(&self.panels.inventory, &self.items);
        for stack in self.drag.take_spilled() {
            self.events.push(MenuEvent::DropToGround { stack });
        }

        let now: Vec<PanelId> = self.panels.visible().collect();
        for id in &now {
            if !self.shown.contains(id) {
                self.events.push(MenuEvent::PanelOpened { panel: *id });
            }
        }
        for id in &self.shown {
            if !now.contains(id) {
                self.events.push(MenuEvent::PanelClosed { panel: *id });
            }
        }
        self.shown = now;

        if let Some(recovery) = self.nav.rebuild(&mut self.panels) {
            self.events.push(MenuEvent::FocusRecovered(recovery));
        }
        self.update_tooltips();
    }

    fn update_tooltips(&mut self) {
        self.tooltips.begin_tick();
        if !self.drag.is_active() {
            if let Some((panel, Some(slot))) = self.panels.slot_under(self.pointer) {
                let data = self.panels.get(panel).check_tooltip(self.pointer);
                self.tooltips
                    .update(TooltipKey::Pointer, panel, slot, data, self.pointer);
            }
            for &id in self.nav.ring() {
                let panel = self.panels.get(id);
                let Some(slot) = panel.tablist().and_then(|t| t.current()) else {
                    continue;
                };
                let anchor = panel
                    .slot_rect(slot)
                    .map_or(panel.window_area().origin(), |r| Point::new(r.x, r.y + r.h));
                self.tooltips
                    .update(TooltipKey::Focus(id), id, slot, panel.slot_tooltip(slot), anchor);
            }
        }
        self.tooltips.end_tick();
    }
}
