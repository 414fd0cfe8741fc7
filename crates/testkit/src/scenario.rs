//! Tick-scenario harness.
//!
//! A scenario owns a [`MenuManager`] and an [`InputState`] and steps them one
//! [`InputFrame`] at a time, collecting every emitted event with its tick.

use menuhand_core::{Point, SimTick};
use menuhand_input::{Action, InputFrame, InputState, Modality};
use menuhand_menus::{AvatarStatus, MenuEvent, MenuFrame, MenuManager, PanelId};

/// Events emitted during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickEvents {
    /// Tick the events were emitted on.
    pub tick: SimTick,
    /// Events in emission order.
    pub events: Vec<MenuEvent>,
}

/// Step `manager` once per frame and collect the events of each tick.
pub fn run_ticks<I>(manager: &mut MenuManager, frames: I, avatar: &AvatarStatus) -> Vec<TickEvents>
where
    I: IntoIterator<Item = InputFrame>,
{
    let mut input = InputState::new();
    frames
        .into_iter()
        .map(|frame| {
            input.apply_frame(&frame);
            manager.logic(&mut input, avatar);
            TickEvents {
                tick: manager.tick(),
                events: manager.drain_events(),
            }
        })
        .collect()
}

/// A manager driven by synthetic input.
pub struct Scenario {
    manager: MenuManager,
    input: InputState,
    pointer: Point,
    modality: Modality,
    avatar: AvatarStatus,
    events: Vec<(SimTick, MenuEvent)>,
}

impl Scenario {
    /// Wrap a manager. Input starts idle with the pointer at the origin.
    pub fn new(manager: MenuManager) -> Self {
        Self {
            manager,
            input: InputState::new(),
            pointer: Point::default(),
            modality: Modality::Pointer,
            avatar: AvatarStatus::default(),
            events: Vec::new(),
        }
    }

    /// The manager.
    pub fn manager(&self) -> &MenuManager {
        &self.manager
    }

    /// The manager, mutably.
    pub fn manager_mut(&mut self) -> &mut MenuManager {
        &mut self.manager
    }

    /// Switch the input modality for the following ticks.
    pub fn set_modality(&mut self, modality: Modality) {
        self.modality = modality;
    }

    /// Set the avatar status for the following ticks.
    pub fn set_avatar(&mut self, avatar: AvatarStatus) {
        self.avatar = avatar;
    }

    /// Run one tick holding `pressed`.
    pub fn step(&mut self, pressed: &[Action]) -> &mut Self {
        let frame = InputFrame {
            pressed: pressed.to_vec(),
            pointer: self.pointer,
            modality: self.modality,
        };
        self.input.apply_frame(&frame);
        self.manager.logic(&mut self.input, &self.avatar);
        let tick = self.manager.tick();
        self.events
            .extend(self.manager.drain_events().into_iter().map(|event| (tick, event)));
        self
    }

    /// Run `ticks` ticks with nothing held.
    pub fn idle(&mut self, ticks: usize) -> &mut Self {
        for _ in 0..ticks {
            self.step(&[]);
        }
        self
    }

    /// Press and release an action.
    pub fn tap(&mut self, action: Action) -> &mut Self {
        self.step(&[action]).step(&[])
    }

    /// Press and release an action while holding modifiers.
    pub fn tap_with(&mut self, modifiers: &[Action], action: Action) -> &mut Self {
        let mut held = modifiers.to_vec();
        held.push(action);
        self.step(&held).step(modifiers).step(&[])
    }

    /// Move the pointer.
    pub fn point_at(&mut self, pos: Point) -> &mut Self {
        self.pointer = pos;
        self
    }

    /// Click the primary button at `pos`.
    pub fn click(&mut self, pos: Point) -> &mut Self {
        self.point_at(pos).tap(Action::Main1)
    }

    /// Click the primary button at `pos` while holding modifiers.
    pub fn click_with(&mut self, modifiers: &[Action], pos: Point) -> &mut Self {
        self.point_at(pos).tap_with(modifiers, Action::Main1)
    }

    /// Press at `from`, move while held, release at `to`.
    pub fn drag(&mut self, from: Point, to: Point) -> &mut Self {
        self.point_at(from).step(&[Action::Main1]);
        self.point_at(to).step(&[Action::Main1]).step(&[])
    }

    /// Center of a panel slot on screen.
    pub fn slot_center(&self, panel: PanelId, slot: usize) -> Point {
        self.manager
            .panels()
            .get(panel)
            .slot_rect(slot)
            .map(|rect| rect.center())
            .unwrap_or_default()
    }

    /// What the renderer would draw now.
    pub fn frame(&self) -> MenuFrame {
        self.manager.render()
    }

    /// Every event so far with its tick.
    pub fn events(&self) -> &[(SimTick, MenuEvent)] {
        &self.events
    }

    /// Take the events collected so far.
    pub fn take_events(&mut self) -> Vec<MenuEvent> {
        std::mem::take(&mut self.events)
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    /// Whether any collected event matches.
    pub fn saw(&self, predicate: impl Fn(&MenuEvent) -> bool) -> bool {
        self.events.iter().any(|(_, event)| predicate(event))
    }
}
