#![warn(missing_docs)]
//! Abstract per-tick input: action press/lock flags, pointer position and modality.
//!
//! Device polling lives outside this crate. Whatever polls the keyboard, mouse
//! or gamepad translates it into an [`InputFrame`] each tick and feeds it to
//! [`InputState::apply_frame`].

use std::fmt;
use std::str::FromStr;

use menuhand_core::Point;
use serde::{Deserialize, Serialize};

/// Logical input actions consumed by the menu logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Close/back. Cancels an active drag first.
    Cancel,
    /// Confirm the focused slot or button.
    Accept,
    /// Focus up.
    Up,
    /// Focus down.
    Down,
    /// Focus left.
    Left,
    /// Focus right (also "next" past the end of a panel).
    Right,
    /// Primary pointer button.
    Main1,
    /// Secondary pointer button.
    Main2,
    /// Quick-transfer modifier.
    Ctrl,
    /// Quantity-split modifier.
    Shift,
    /// Touch press-and-hold, treated like the split modifier.
    TouchHold,
    /// Toggle the inventory.
    Inventory,
    /// Toggle the powers panel.
    Powers,
    /// Toggle the character sheet.
    Character,
    /// Toggle the quest log.
    Log,
    /// Toggle the developer console.
    DevConsole,
}

/// Number of distinct actions.
pub const ACTION_COUNT: usize = 16;

impl Action {
    /// Every action, in index order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Cancel,
        Action::Accept,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Main1,
        Action::Main2,
        Action::Ctrl,
        Action::Shift,
        Action::TouchHold,
        Action::Inventory,
        Action::Powers,
        Action::Character,
        Action::Log,
        Action::DevConsole,
    ];

    /// Dense index into per-action arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name used in scripts and config files.
    pub fn name(self) -> &'static str {
        match self {
            Action::Cancel => "cancel",
            Action::Accept => "accept",
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Main1 => "main1",
            Action::Main2 => "main2",
            Action::Ctrl => "ctrl",
            Action::Shift => "shift",
            Action::TouchHold => "touch_hold",
            Action::Inventory => "inventory",
            Action::Powers => "powers",
            Action::Character => "character",
            Action::Log => "log",
            Action::DevConsole => "dev_console",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown input action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Which device family the player is currently using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Mouse or touch pointer.
    #[default]
    Pointer,
    /// Keyboard or gamepad, navigating by focus.
    Keyboard,
}

/// One tick of device-independent input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Actions held down this tick.
    #[serde(default)]
    pub pressed: Vec<Action>,
    /// Pointer position.
    #[serde(default)]
    pub pointer: Point,
    /// Active modality.
    #[serde(default)]
    pub modality: Modality,
}

/// Input state tracking for a single tick.
///
/// `pressing[action]` mirrors the device. `lock[action]` is set the moment a
/// logic phase consumes a press, so the same physical press is not
/// reinterpreted by a later phase. A lock is released only when the action is
/// released.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressing: [bool; ACTION_COUNT],
    lock: [bool; ACTION_COUNT],
    pointer: Point,
    modality: Modality,
}

impl InputState {
    /// Create a new input state with nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace device state with `frame`. Actions missing from the frame are released.
    pub fn apply_frame(&mut self, frame: &InputFrame) {
        for action in Action::ALL {
            if frame.pressed.contains(&action) {
                self.press(action);
            } else {
                self.release(action);
            }
        }
        self.pointer = frame.pointer;
        self.modality = frame.modality;
    }

    /// Mark an action as held.
    pub fn press(&mut self, action: Action) {
        self.pressing[action.index()] = true;
    }

    /// Mark an action as released, clearing its lock.
    pub fn release(&mut self, action: Action) {
        self.pressing[action.index()] = false;
        self.lock[action.index()] = false;
    }

    /// Whether the action is held.
    pub fn pressing(&self, action: Action) -> bool {
        self.pressing[action.index()]
    }

    /// Whether the current press has already been consumed.
    pub fn locked(&self, action: Action) -> bool {
        self.lock[action.index()]
    }

    /// Held and not yet consumed.
    pub fn triggered(&self, action: Action) -> bool {
        self.pressing(action) && !self.locked(action)
    }

    /// Consume the current press of `action`.
    pub fn lock(&mut self, action: Action) {
        self.lock[action.index()] = true;
    }

    /// Check-then-lock in one step: returns `true` at most once per physical press.
    pub fn consume(&mut self, action: Action) -> bool {
        if self.triggered(action) {
            self.lock(action);
            true
        } else {
            false
        }
    }

    /// Pointer position.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Move the pointer.
    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    /// Active modality.
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Switch modality.
    pub fn set_modality(&mut self, modality: Modality) {
        self.modality = modality;
    }

    /// Whether keyboard/gamepad navigation is active.
    pub fn keyboard_active(&self) -> bool {
        self.modality == Modality::Keyboard
    }

    /// Whether any of the quantity-split modifiers is held.
    pub fn split_modifier(&self) -> bool {
        self.pressing(Action::Shift) || self.pressing(Action::TouchHold)
    }
}
