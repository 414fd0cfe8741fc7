use anyhow::Context;
use menuhand_core::{ItemStack, Point};
use menuhand_input::{Action, InputFrame, Modality};
use menuhand_menus::{AvatarStatus, MenuManager, PanelId};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

/// Something the game would do to the menus outside of player input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptCommand {
    /// Hand loot to the inventory.
    AddItem { stack: ItemStack },
    /// Talk to a merchant.
    OpenVendor { stock: Vec<ItemStack> },
    /// Use a stash chest.
    OpenStash,
    /// Open a talker, NPC action menu or book.
    OpenNpcWindow { panel: PanelId },
    /// A cutscene takes over.
    StartCutscene,
    /// Avatar level changes.
    SetLevel { level: u32 },
    /// Avatar dies.
    Die,
    /// Avatar respawns.
    Respawn,
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptedStep {
    #[serde(default = "one_tick")]
    ticks: u32,
    #[serde(default)]
    pressed: Vec<Action>,
    #[serde(default)]
    pointer: Point,
    #[serde(default)]
    modality: Modality,
    #[serde(default)]
    commands: Vec<ScriptCommand>,
}

fn one_tick() -> u32 {
    1
}

/// What to feed the menus on one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedTick {
    /// Input for the tick.
    pub frame: InputFrame,
    /// Commands to apply before the tick runs.
    pub commands: Vec<ScriptCommand>,
}

/// Replays scripted input one tick at a time.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    ticks_in_step: u32,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            ticks_in_step: 0,
        })
    }

    /// Total ticks the script covers.
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.ticks)).sum()
    }

    /// Next tick, or `None` once every step has run. Commands fire on the
    /// first tick of their step.
    pub fn advance(&mut self) -> Option<ScriptedTick> {
        while let Some(step) = self.steps.get(self.index) {
            if self.ticks_in_step < step.ticks {
                let commands = if self.ticks_in_step == 0 {
                    step.commands.clone()
                } else {
                    Vec::new()
                };
                self.ticks_in_step += 1;
                return Some(ScriptedTick {
                    frame: InputFrame {
                        pressed: step.pressed.clone(),
                        pointer: step.pointer,
                        modality: step.modality,
                    },
                    commands,
                });
            }
            self.index += 1;
            self.ticks_in_step = 0;
        }
        None
    }

    pub fn finished(&self) -> bool {
        self.index >= self.steps.len()
    }
}

impl ScriptCommand {
    /// Apply the command to the menus and the avatar.
    pub fn apply(&self, manager: &mut MenuManager, avatar: &mut AvatarStatus) {
        let accepted = match self {
            ScriptCommand::AddItem { stack } => manager.add_item(*stack),
            ScriptCommand::OpenVendor { stock } => manager.open_vendor(stock),
            ScriptCommand::OpenStash => manager.open_stash(),
            ScriptCommand::OpenNpcWindow { panel } => manager.open_npc_window(*panel),
            ScriptCommand::StartCutscene => {
                manager.start_cutscene();
                true
            }
            ScriptCommand::SetLevel { level } => {
                avatar.level = *level;
                true
            }
            ScriptCommand::Die => {
                avatar.alive = false;
                true
            }
            ScriptCommand::Respawn => {
                avatar.alive = true;
                true
            }
        };
        if !accepted {
            tracing::debug!(command = ?self, "scripted command refused");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "steps": [
            { "commands": [{ "type": "open_stash" }] },
            { "ticks": 2, "pressed": ["main1"], "pointer": { "x": 40, "y": 60 } },
            { "modality": "keyboard", "pressed": ["accept"] }
        ]
    }"#;

    #[test]
    fn steps_expand_into_ticks() {
        let mut player = ScriptedInputPlayer::from_json(SCRIPT).expect("valid script");
        assert_eq!(player.total_ticks(), 4);

        let first = player.advance().expect("tick 1");
        assert_eq!(first.commands, vec![ScriptCommand::OpenStash]);
        assert!(first.frame.pressed.is_empty());

        let second = player.advance().expect("tick 2");
        let third = player.advance().expect("tick 3");
        assert_eq!(second.frame.pointer, Point::new(40, 60));
        assert_eq!(second.frame.pressed, vec![Action::Main1]);
        assert_eq!(second.frame, third.frame);
        assert!(third.commands.is_empty());

        let fourth = player.advance().expect("tick 4");
        assert_eq!(fourth.frame.modality, Modality::Keyboard);
        assert!(player.advance().is_none());
        assert!(player.finished());
    }

    #[test]
    fn empty_scripts_are_rejected() {
        assert!(ScriptedInputPlayer::from_json(r#"{ "steps": [] }"#).is_err());
    }
}
