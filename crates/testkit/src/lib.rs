#![warn(missing_docs)]
//! Deterministic testing surfaces: event transcripts, a tick-scenario harness
//! and the standard fixtures scenario tests build on.

mod fixtures;
mod scenario;

use anyhow::Result;
use menuhand_core::SimTick;
use menuhand_menus::MenuEvent;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use fixtures::*;
pub use scenario::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Tick when the event occurred.
    pub tick: SimTick,
    /// Event label.
    pub kind: &'a str,
    /// Event body as JSON.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Append a menu event emitted on `tick`.
    pub fn record(&mut self, tick: SimTick, event: &MenuEvent) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        self.write(&EventRecord {
            tick,
            kind: event.kind(),
            payload: &payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuhand_core::ItemStack;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "menuhand-events-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.record(SimTick(3), &MenuEvent::ExitRequested)
            .expect("write succeeds");
        sink.record(
            SimTick(4),
            &MenuEvent::DropToGround {
                stack: ItemStack::new(2, 5),
            },
        )
        .expect("write succeeds");

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("exit_requested"));
        assert!(lines[1].contains("drop_to_ground"));
        assert!(lines[1].contains("\"tick\":4"));
    }
}
