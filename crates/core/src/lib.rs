#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod geometry;
pub mod item;
pub mod power;
pub mod tooltip;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use geometry::{Point, Rect};
pub use item::{EquipSlot, ItemCatalog, ItemDef, ItemId, ItemKind, ItemStack, TooltipContext, NO_ITEM};
pub use power::{PowerCatalog, PowerDef, PowerId, NO_POWER};
pub use tooltip::{TooltipColor, TooltipData, TooltipLine};

/// Fixed tick counter for the menu logic loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances() {
        assert_eq!(SimTick::ZERO.advance(3), SimTick(3));
    }
}
