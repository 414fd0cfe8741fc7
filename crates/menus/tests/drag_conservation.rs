use std::collections::BTreeMap;
use std::sync::Arc;

use menuhand_core::{ItemId, ItemStack};
use menuhand_menus::{DragController, DragSource, DragStart, DropTarget, MenuPanels, PanelId, TransferOutcome};
use menuhand_testkit::{fixture_catalog, fixture_config, GEM, HELM, LETTER, POTION, SWORD};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start { from_stash: bool, slot: usize },
    Cancel,
    Complete { target: u8, slot: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 0usize..12).prop_map(|(from_stash, slot)| Op::Start { from_stash, slot }),
        Just(Op::Cancel),
        (0u8..3, 0usize..12).prop_map(|(target, slot)| Op::Complete { target, slot }),
    ]
}

fn setup() -> (DragController, MenuPanels) {
    let (items, powers) = fixture_catalog();
    let (items, powers) = (Arc::new(items), Arc::new(powers));
    let mut panels = MenuPanels::new(&fixture_config(), Arc::clone(&items), Arc::clone(&powers));
    panels.inventory.equipment_mut().set(0, ItemStack::new(HELM, 1));
    let carried = panels.inventory.carried_mut();
    carried.set(0, ItemStack::new(POTION, 7));
    carried.set(1, ItemStack::new(SWORD, 1));
    carried.set(2, ItemStack::new(LETTER, 1));
    let stash = panels.stash.stock_mut();
    stash.set(0, ItemStack::new(GEM, 5));
    stash.set(1, ItemStack::new(POTION, 4));
    (DragController::new(items, powers), panels)
}

fn totals(drag: &DragController, panels: &MenuPanels, ground: &BTreeMap<ItemId, u32>) -> BTreeMap<ItemId, u32> {
    let mut counts = ground.clone();
    let stored = panels
        .inventory
        .equipment()
        .slots()
        .iter()
        .chain(panels.inventory.carried().slots())
        .chain(panels.stash.stock().slots());
    for stack in stored.filter(|stack| !stack.is_empty()) {
        *counts.entry(stack.item).or_default() += stack.quantity;
    }
    if let Some(state) = drag.state() {
        let held = state.stack();
        *counts.entry(held.item).or_default() += held.quantity;
    }
    counts
}

proptest! {
    #[test]
    fn drags_never_create_or_destroy_items(ops in prop::collection::vec(op(), 1..40)) {
        let (mut drag, mut panels) = setup();
        let mut ground = BTreeMap::new();
        let expected = totals(&drag, &panels, &ground);

        for op in ops {
            match op {
                Op::Start { from_stash, slot } => {
                    let source = if from_stash { DragSource::Stash } else { DragSource::Inventory };
                    drag.start(&mut panels, source, slot, DragStart::default());
                }
                Op::Cancel => {
                    drag.cancel(&mut panels);
                }
                Op::Complete { target, slot } => {
                    let target = match target {
                        0 => DropTarget::Panel { panel: PanelId::Inventory, slot: Some(slot) },
                        1 => DropTarget::Panel { panel: PanelId::Stash, slot: Some(slot) },
                        _ => DropTarget::World,
                    };
                    if let TransferOutcome::Dropped(stack) = drag.complete(&mut panels, target) {
                        prop_assert_ne!(stack.item, LETTER);
                        *ground.entry(stack.item).or_default() += stack.quantity;
                    }
                }
            }
            for stack in drag.take_spilled() {
                *ground.entry(stack.item).or_default() += stack.quantity;
            }
            prop_assert_eq!(totals(&drag, &panels, &ground), expected.clone());
            if let Some(state) = drag.state() {
                prop_assert!(!state.stack().is_empty());
                prop_assert!(matches!(state.source(), DragSource::Inventory | DragSource::Stash));
            }
        }
    }

    #[test]
    fn cancel_restores_the_exact_layout(from_stash in any::<bool>(), slot in 0usize..12) {
        let (mut drag, mut panels) = setup();
        let inventory = (
            panels.inventory.equipment().slots().to_vec(),
            panels.inventory.carried().slots().to_vec(),
        );
        let stash = panels.stash.stock().slots().to_vec();
        let source = if from_stash { DragSource::Stash } else { DragSource::Inventory };

        let started = drag.start(&mut panels, source, slot, DragStart::default());
        prop_assert_eq!(drag.cancel(&mut panels), started);
        prop_assert!(!drag.cancel(&mut panels));

        prop_assert_eq!(panels.inventory.equipment().slots(), &inventory.0[..]);
        prop_assert_eq!(panels.inventory.carried().slots(), &inventory.1[..]);
        prop_assert_eq!(panels.stash.stock().slots(), &stash[..]);
    }
}
