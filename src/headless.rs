use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use menuhand_assets::Content;
use menuhand_input::{InputFrame, InputState};
use menuhand_menus::{AvatarStatus, MenuConfig, MenuEvent, MenuManager};
use menuhand_testkit::JsonlSink;
use std::path::PathBuf;
use std::sync::Arc;

pub struct HeadlessConfig {
    pub menus: MenuConfig,
    pub content: Content,
    pub scripted_input: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub event_log: Option<PathBuf>,
    pub exit_when_requested: bool,
}

/// What a headless run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub events: u64,
    pub exit_requested: bool,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let mut player = match cfg.scripted_input.as_deref() {
        Some(path) => Some(ScriptedInputPlayer::from_path(path)?),
        None => None,
    };
    let max_ticks = match (&player, cfg.max_ticks) {
        (_, Some(max)) => max,
        (Some(player), None) => player.total_ticks(),
        (None, None) => 1,
    };
    let mut sink = match cfg.event_log.as_deref() {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))?,
        ),
        None => None,
    };

    let mut manager = MenuManager::new(
        cfg.menus,
        Arc::new(cfg.content.items),
        Arc::new(cfg.content.powers),
    );
    let mut input = InputState::new();
    let mut avatar = AvatarStatus::default();
    let mut summary = RunSummary::default();

    while summary.ticks < max_ticks {
        let frame = match player.as_mut() {
            Some(player) => match player.advance() {
                Some(tick) => {
                    for command in &tick.commands {
                        command.apply(&mut manager, &mut avatar);
                    }
                    tick.frame
                }
                None => break,
            },
            None => InputFrame::default(),
        };
        input.apply_frame(&frame);
        manager.logic(&mut input, &avatar);
        summary.ticks += 1;

        for event in manager.drain_events() {
            summary.events += 1;
            if let Some(sink) = sink.as_mut() {
                sink.record(manager.tick(), &event)?;
            }
            if event == MenuEvent::ExitRequested {
                summary.exit_requested = true;
            }
        }
        if summary.exit_requested && cfg.exit_when_requested {
            tracing::info!(tick = manager.tick().0, "exit requested, stopping");
            break;
        }
    }

    if player.as_ref().is_some_and(|player| !player.finished()) {
        tracing::warn!(ticks = summary.ticks, "max ticks reached before the input script finished");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("menuhand-{name}-{nanos}"))
    }

    #[test]
    fn scripted_exit_is_recorded_and_stops_the_run() {
        let script = temp_path("script.json");
        // Cancel with nothing open asks to exit; the confirm button sits at (216, 216).
        std::fs::write(
            &script,
            r#"{ "steps": [
                { "pressed": ["cancel"] },
                { "ticks": 2 },
                { "pressed": ["main1"], "pointer": { "x": 230, "y": 220 } },
                { "ticks": 10 }
            ] }"#,
        )
        .unwrap();
        let log = temp_path("events.jsonl");

        let summary = run(HeadlessConfig {
            menus: MenuConfig::default(),
            content: Content::default(),
            scripted_input: Some(script),
            max_ticks: None,
            event_log: Some(log.clone()),
            exit_when_requested: true,
        })
        .unwrap();

        assert!(summary.exit_requested);
        assert_eq!(summary.ticks, 4);
        let transcript = std::fs::read_to_string(log).unwrap();
        assert!(transcript.lines().any(|line| line.contains("\"exit_requested\"")));
    }

    #[test]
    fn runs_idle_without_a_script() {
        let summary = run(HeadlessConfig {
            menus: MenuConfig::default(),
            content: Content::default(),
            scripted_input: None,
            max_ticks: Some(5),
            event_log: None,
            exit_when_requested: false,
        })
        .unwrap();
        assert_eq!(summary.ticks, 5);
        assert!(!summary.exit_requested);
    }
}
