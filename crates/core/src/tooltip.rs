//! Tooltip content.
//!
//! Tooltips are plain text lines with a color role. Two tooltips are the same
//! when their lines are the same, which is what the tooltip caches compare on.

use serde::{Deserialize, Serialize};

/// Color role for a tooltip line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipColor {
    /// Default text.
    #[default]
    Normal,
    /// Item or power name.
    Title,
    /// Prices and quantities.
    Highlight,
    /// Unmet requirements and warnings.
    Warning,
    /// Flavor text.
    Muted,
}

/// A single rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipLine {
    /// Line text (never contains a newline).
    pub text: String,
    /// Color role.
    pub color: TooltipColor,
}

/// Tooltip content, compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TooltipData {
    lines: Vec<TooltipLine>,
}

impl TooltipData {
    /// Create an empty tooltip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text, splitting on newlines. Blank lines are kept as a single space
    /// so they still take up a row.
    pub fn add_text(&mut self, text: &str, color: TooltipColor) {
        for line in text.split('\n') {
            let text = if line.is_empty() { " ".to_string() } else { line.to_string() };
            self.lines.push(TooltipLine { text, color });
        }
    }

    /// Builder form of [`TooltipData::add_text`].
    pub fn with_text(mut self, text: &str, color: TooltipColor) -> Self {
        self.add_text(text, color);
        self
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[TooltipLine] {
        &self.lines
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether the first line reads `text`.
    pub fn compare_first_line(&self, text: &str) -> bool {
        self.lines.first().is_some_and(|line| line.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_text_splits_lines_and_keeps_blanks() {
        let tip = TooltipData::new().with_text("Potion\n\nRestores 25 HP", TooltipColor::Normal);
        let texts: Vec<&str> = tip.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Potion", " ", "Restores 25 HP"]);
        assert!(tip.compare_first_line("Potion"));
    }

    #[test]
    fn equality_is_structural() {
        let a = TooltipData::new().with_text("Sword", TooltipColor::Title);
        let b = TooltipData::new().with_text("Sword", TooltipColor::Title);
        let c = TooltipData::new().with_text("Sword", TooltipColor::Warning);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
