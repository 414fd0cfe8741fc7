//! Player-facing messages: the quest log's message tab and the HUD ring.

use std::collections::VecDeque;

use menuhand_core::SimTick;

/// One logged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Tick the message was written on.
    pub tick: SimTick,
    /// Text.
    pub text: String,
}

/// Message log with a bounded HUD ring of recent entries.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
    hud: VecDeque<LogEntry>,
    hud_capacity: usize,
}

impl MessageLog {
    /// Create a log whose HUD ring keeps `hud_capacity` entries.
    pub fn new(hud_capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            hud: VecDeque::with_capacity(hud_capacity),
            hud_capacity,
        }
    }

    /// Write a message to both the log and the HUD.
    pub fn push(&mut self, tick: SimTick, text: impl Into<String>) {
        let entry = LogEntry {
            tick,
            text: text.into(),
        };
        tracing::debug!(tick = tick.0, text = %entry.text, "menu message");
        if self.hud_capacity > 0 {
            while self.hud.len() >= self.hud_capacity {
                self.hud.pop_front();
            }
            self.hud.push_back(entry.clone());
        }
        self.entries.push(entry);
    }

    /// Every message, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Most recent message text.
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.text.as_str())
    }

    /// HUD ring, oldest first.
    pub fn hud(&self) -> impl Iterator<Item = &LogEntry> {
        self.hud.iter()
    }

    /// Clear the HUD ring without touching the log.
    pub fn clear_hud(&mut self) {
        self.hud.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_ring_is_bounded_but_log_is_not() {
        let mut log = MessageLog::new(2);
        for i in 0..4 {
            log.push(SimTick(i), format!("m{i}"));
        }
        assert_eq!(log.entries().len(), 4);
        let hud: Vec<_> = log.hud().map(|e| e.text.as_str()).collect();
        assert_eq!(hud, vec!["m2", "m3"]);
        assert_eq!(log.last(), Some("m3"));
    }

    #[test]
    fn zero_capacity_hud_stays_empty() {
        let mut log = MessageLog::new(0);
        log.push(SimTick::ZERO, "hello");
        assert_eq!(log.hud().count(), 0);
        assert_eq!(log.entries().len(), 1);
    }
}
