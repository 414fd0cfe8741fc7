use menuhand_core::{ItemStack, Point, NO_POWER};
use menuhand_input::Action;
use menuhand_menus::panels::VendorTab;
use menuhand_menus::{ActionSlotFrame, AvatarStatus, DragPayload, DragSource, MenuEvent, PanelId};
use menuhand_testkit::{
    fixture_config, fixture_manager, fixture_manager_with, Scenario, FIREBALL, FROST, GEM, GOLD,
    HEAL, HELM, LETTER, METEOR, POTION, SLASH, SWORD,
};

fn carried(s: &Scenario, local: usize) -> usize {
    s.manager().panels().inventory.carried_index(local)
}

fn give(s: &mut Scenario, local: usize, stack: ItemStack) {
    s.manager_mut()
        .panels_mut()
        .inventory
        .carried_mut()
        .set(local, stack);
}

#[test]
fn full_stash_refuses_and_returns_the_stack() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_stash();
    {
        let stash = s.manager_mut().panels_mut().stash.stock_mut();
        for slot in 0..stash.len() {
            stash.set(slot, ItemStack::new(GEM, 5));
        }
    }
    give(&mut s, 0, ItemStack::new(POTION, 5));
    s.idle(1);

    let from = s.slot_center(PanelId::Inventory, carried(&s, 0));
    let to = s.slot_center(PanelId::Stash, 0);
    s.drag(from, to);

    let m = s.manager();
    assert_eq!(m.panels().inventory.carried().stack_at(0), ItemStack::new(POTION, 5));
    assert_eq!(m.panels().stash.stock().count(POTION), 0);
    assert_eq!(m.panels().stash.stock().stack_at(0), ItemStack::new(GEM, 5));
    assert_eq!(m.messages().last(), Some("Stash is full."));
    assert!(!m.drag().is_active());
    assert!(s.saw(|e| matches!(e, MenuEvent::TransferRefused { source: DragSource::Inventory, .. })));
}

#[test]
fn selling_credits_gold_and_fills_buyback() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_vendor(&[ItemStack::new(POTION, 4)]);
    give(&mut s, 0, ItemStack::new(GEM, 3));
    s.idle(1);

    let from = s.slot_center(PanelId::Inventory, carried(&s, 0));
    let to = s.slot_center(PanelId::Vendor, 5);
    s.drag(from, to);

    let panels = s.manager().panels();
    assert_eq!(panels.inventory.currency(), 90);
    assert_eq!(panels.inventory.count_carried(GEM), 0);
    assert_eq!(panels.vendor.stock(VendorTab::Sell).count(GEM), 3);
    assert!(s.saw(|e| *e == MenuEvent::Sold { value: 90 }));
}

#[test]
fn buying_pays_and_places_the_stack() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_vendor(&[ItemStack::new(POTION, 4)]);
    give(&mut s, 0, ItemStack::new(GOLD, 100));
    s.idle(1);

    let from = s.slot_center(PanelId::Vendor, 0);
    let to = s.slot_center(PanelId::Inventory, carried(&s, 5));
    s.drag(from, to);

    let panels = s.manager().panels();
    assert_eq!(panels.inventory.currency(), 0);
    assert_eq!(panels.inventory.carried().stack_at(5), ItemStack::new(POTION, 4));
    assert!(panels.vendor.stock(VendorTab::Buy).stack_at(0).is_empty());
    assert!(s.saw(|e| *e == MenuEvent::Bought { cost: 100 }));
}

#[test]
fn buying_without_enough_gold_gives_the_stock_back() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_vendor(&[ItemStack::new(POTION, 4)]);
    give(&mut s, 0, ItemStack::new(GOLD, 50));
    s.idle(1);

    let from = s.slot_center(PanelId::Vendor, 0);
    let to = s.slot_center(PanelId::Inventory, carried(&s, 5));
    s.drag(from, to);

    let panels = s.manager().panels();
    assert_eq!(panels.inventory.currency(), 50);
    assert_eq!(panels.inventory.count_carried(POTION), 0);
    assert_eq!(panels.vendor.stock(VendorTab::Buy).stack_at(0), ItemStack::new(POTION, 4));
    assert_eq!(s.manager().messages().last(), Some("Not enough gold."));
}

#[test]
fn quest_items_stay_out_of_the_world() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(LETTER, 1));
    s.tap(Action::Inventory);

    let from = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.drag(from, Point::new(100, 100));

    assert_eq!(
        s.manager().panels().inventory.carried().stack_at(0),
        ItemStack::new(LETTER, 1)
    );
    assert_eq!(s.manager().messages().last(), Some("This item can not be moved there."));
    assert!(!s.saw(|e| matches!(e, MenuEvent::DropToGround { .. })));
}

#[test]
fn dropping_into_the_world_hands_the_stack_to_the_game() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(POTION, 2));
    s.tap(Action::Inventory);

    let from = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.drag(from, Point::new(100, 100));

    assert_eq!(s.manager().panels().inventory.count_carried(POTION), 0);
    assert!(s.saw(|e| *e
        == MenuEvent::DropToGround {
            stack: ItemStack::new(POTION, 2)
        }));
}

#[test]
fn ctrl_click_moves_between_stash_and_inventory() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_stash();
    give(&mut s, 0, ItemStack::new(POTION, 3));
    s.idle(1);

    let slot = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.click_with(&[Action::Ctrl], slot);
    assert_eq!(s.manager().panels().stash.stock().stack_at(0), ItemStack::new(POTION, 3));
    assert_eq!(s.manager().panels().inventory.count_carried(POTION), 0);

    let back = s.slot_center(PanelId::Stash, 0);
    s.click_with(&[Action::Ctrl], back);
    assert_eq!(s.manager().panels().inventory.count_carried(POTION), 3);
    assert_eq!(s.manager().panels().stash.stock().count(POTION), 0);
    assert!(!s.manager().drag().is_active());
}

#[test]
fn secondary_click_equips_and_binds_the_granted_power() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(SWORD, 1));
    s.tap(Action::Inventory);

    let slot = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.point_at(slot).tap(Action::Main2);

    let panels = s.manager().panels();
    assert!(panels.inventory.is_equipped(SWORD));
    assert_eq!(panels.action_bar.power_at(0), SLASH);
    assert!(panels.action_bar.is_enabled(0));
    assert!(s.saw(|e| *e == MenuEvent::Equipped { item: SWORD }));
}

#[test]
fn secondary_click_uses_a_potion() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(POTION, 2));
    s.tap(Action::Inventory);

    let slot = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.point_at(slot).tap(Action::Main2);

    assert_eq!(s.manager().panels().inventory.count_carried(POTION), 1);
    assert!(s.saw(|e| *e
        == MenuEvent::UseItem {
            item: POTION,
            power: Some(HEAL)
        }));
}

#[test]
fn split_through_the_picker_drags_the_chosen_quantity() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(POTION, 5));
    s.tap(Action::Inventory);

    let slot = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.click_with(&[Action::Shift], slot);
    assert!(s.manager().panels().is_visible(PanelId::QuantityPicker));
    assert!(s.manager().is_dragging());

    s.tap(Action::Up).tap(Action::Up).tap(Action::Accept);
    let state = s.manager().drag().state().expect("split drag");
    assert_eq!(state.stack(), ItemStack::new(POTION, 3));
    assert!(state.is_sticky());
    assert_eq!(s.manager().panels().inventory.carried().stack_at(0), ItemStack::new(POTION, 2));

    let target = s.slot_center(PanelId::Inventory, carried(&s, 4));
    s.click(target);
    let carried_grid = s.manager().panels().inventory.carried();
    assert_eq!(carried_grid.stack_at(0), ItemStack::new(POTION, 2));
    assert_eq!(carried_grid.stack_at(4), ItemStack::new(POTION, 3));
    assert!(!s.manager().drag().is_active());
}

#[test]
fn cancelling_the_picker_leaves_the_stack_alone() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(POTION, 5));
    s.tap(Action::Inventory);

    let slot = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.click_with(&[Action::Shift], slot);
    s.tap(Action::Cancel);

    assert!(!s.manager().is_dragging());
    assert!(!s.manager().panels().is_visible(PanelId::QuantityPicker));
    assert!(s.manager().panels().is_visible(PanelId::Inventory));
    assert_eq!(s.manager().panels().inventory.carried().stack_at(0), ItemStack::new(POTION, 5));
}

#[test]
fn powers_bind_and_replace_on_the_action_bar() {
    let mut s = Scenario::new(fixture_manager());
    s.tap(Action::Powers);

    let bar = s.slot_center(PanelId::ActionBar, 0);
    let fireball = s.slot_center(PanelId::Powers, 0);
    s.drag(fireball, bar);
    assert_eq!(s.manager().panels().action_bar.power_at(0), FIREBALL);

    let frost = s.slot_center(PanelId::Powers, 1);
    s.drag(frost, bar);
    assert_eq!(s.manager().panels().action_bar.power_at(0), FROST);
    assert!(s.saw(|e| matches!(e, MenuEvent::DragCompleted { source: DragSource::Powers, .. })));
}

#[test]
fn locked_slots_refuse_changes() {
    let mut config = fixture_config();
    config.locked_action_slots = vec![0];
    let mut s = Scenario::new(fixture_manager_with(config));
    s.manager_mut().panels_mut().action_bar.set_hotkeys(&[FIREBALL]);
    s.idle(1);

    let bar = s.slot_center(PanelId::ActionBar, 0);
    s.click_with(&[Action::Ctrl], bar);

    assert_eq!(s.manager().panels().action_bar.power_at(0), FIREBALL);
    assert_eq!(s.manager().messages().last(), Some("That slot is locked."));
}

#[test]
fn action_bar_slots_rearrange_and_unbind() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut()
        .panels_mut()
        .action_bar
        .set_hotkeys(&[FIREBALL, FROST]);
    s.idle(1);

    let first = s.slot_center(PanelId::ActionBar, 0);
    let third = s.slot_center(PanelId::ActionBar, 2);
    s.drag(first, third);
    let bar = &s.manager().panels().action_bar;
    assert_eq!(bar.power_at(2), FIREBALL);
    assert_eq!(bar.power_at(1), FROST);

    let third = s.slot_center(PanelId::ActionBar, 2);
    s.drag(third, Point::new(100, 100));
    assert!(!s.manager().panels().action_bar.hotkeys().contains(&FIREBALL));
}

#[test]
fn secondary_click_on_the_bar_uses_the_power() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().panels_mut().action_bar.set_hotkeys(&[FIREBALL]);
    s.idle(1);

    let bar = s.slot_center(PanelId::ActionBar, 0);
    s.point_at(bar).tap(Action::Main2);
    assert!(s.saw(|e| *e
        == MenuEvent::UsePower {
            slot: 0,
            power: FIREBALL
        }));
}

#[test]
fn menu_buttons_toggle_their_panels() {
    let mut s = Scenario::new(fixture_manager());
    let inventory_button = s
        .manager()
        .config()
        .action_bar
        .menu_buttons
        .iter()
        .find(|button| button.panel == PanelId::Inventory)
        .map(|button| button.rect.center())
        .expect("inventory button");
    s.click(inventory_button);
    assert!(s.manager().panels().is_visible(PanelId::Inventory));
    s.click(inventory_button);
    assert!(!s.manager().panels().is_visible(PanelId::Inventory));
}

#[test]
fn spending_a_point_unlocks_a_tree_power() {
    let mut s = Scenario::new(fixture_manager());
    s.set_avatar(AvatarStatus { alive: true, level: 2 });
    s.tap(Action::Powers);

    let meteor = s.slot_center(PanelId::Powers, 2);
    s.click(meteor);

    assert!(s.saw(|e| *e == MenuEvent::PowerUnlocked { slot: 2 }));
    assert!(s.manager().panels().powers.requirements_met(2));
    assert_eq!(s.manager().panels().powers.points_left(), 1);
    assert_eq!(METEOR, s.manager().panels().powers.click(2));
}

#[test]
fn cancelling_an_equipment_drag_is_not_an_equip() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut()
        .panels_mut()
        .inventory
        .equipment_mut()
        .set(0, ItemStack::new(HELM, 1));
    s.tap(Action::Inventory);
    s.take_events();

    let helm = s.slot_center(PanelId::Inventory, 0);
    s.point_at(helm).step(&[Action::Main1]);
    s.tap(Action::Cancel);

    let drag_events: Vec<MenuEvent> = s
        .take_events()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                MenuEvent::DragStarted { .. }
                    | MenuEvent::DragCompleted { .. }
                    | MenuEvent::DragCancelled { .. }
                    | MenuEvent::Equipped { .. }
            )
        })
        .collect();
    assert_eq!(
        drag_events,
        vec![
            MenuEvent::DragStarted {
                source: DragSource::Inventory,
                payload: DragPayload::Stack(ItemStack::new(HELM, 1)),
            },
            MenuEvent::DragCancelled {
                source: DragSource::Inventory
            },
        ]
    );
    assert_eq!(
        s.manager().panels().inventory.equipment().stack_at(0),
        ItemStack::new(HELM, 1)
    );
}

#[test]
fn dragging_a_potion_onto_the_bar_binds_its_power() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(POTION, 3));
    s.tap(Action::Inventory);

    let from = s.slot_center(PanelId::Inventory, carried(&s, 0));
    let to = s.slot_center(PanelId::ActionBar, 1);
    s.drag(from, to);

    let panels = s.manager().panels();
    assert_eq!(panels.action_bar.power_at(1), HEAL);
    assert_eq!(panels.inventory.carried().stack_at(0), ItemStack::new(POTION, 3));
    assert!(!s.manager().drag().is_active());
}

#[test]
fn stash_stack_stays_put_when_the_inventory_is_full() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_stash();
    let slots = s.manager().panels().inventory.carried().len();
    for local in 0..slots {
        give(&mut s, local, ItemStack::new(HELM, 1));
    }
    s.manager_mut()
        .panels_mut()
        .stash
        .stock_mut()
        .set(0, ItemStack::new(GEM, 2));
    s.idle(1);

    let from = s.slot_center(PanelId::Stash, 0);
    let to = s.slot_center(PanelId::Inventory, carried(&s, 0));
    s.drag(from, to);

    let panels = s.manager().panels();
    assert_eq!(panels.stash.stock().stack_at(0), ItemStack::new(GEM, 2));
    assert_eq!(panels.inventory.count_carried(GEM), 0);
    assert_eq!(s.manager().messages().last(), Some("Inventory is full."));
    assert!(s.saw(|e| matches!(e, MenuEvent::TransferRefused { source: DragSource::Stash, .. })));
}

#[test]
fn buying_into_a_full_inventory_costs_nothing() {
    let mut s = Scenario::new(fixture_manager());
    s.manager_mut().open_vendor(&[ItemStack::new(POTION, 4)]);
    let slots = s.manager().panels().inventory.carried().len();
    give(&mut s, 0, ItemStack::new(GOLD, 500));
    for local in 1..slots {
        give(&mut s, local, ItemStack::new(HELM, 1));
    }
    s.idle(1);

    let from = s.slot_center(PanelId::Vendor, 0);
    let to = s.slot_center(PanelId::Inventory, carried(&s, 5));
    s.drag(from, to);

    let panels = s.manager().panels();
    assert_eq!(panels.inventory.currency(), 500);
    assert_eq!(panels.inventory.count_carried(POTION), 0);
    assert_eq!(panels.vendor.stock(VendorTab::Buy).stack_at(0), ItemStack::new(POTION, 4));
    assert_eq!(s.manager().messages().last(), Some("Inventory is full."));
    assert!(!s.saw(|e| matches!(e, MenuEvent::Bought { .. })));
}

#[test]
fn dragging_onto_a_locked_bar_slot_puts_the_power_back() {
    let mut config = fixture_config();
    config.locked_action_slots = vec![2];
    let mut s = Scenario::new(fixture_manager_with(config));
    s.manager_mut()
        .panels_mut()
        .action_bar
        .set_hotkeys(&[FIREBALL, NO_POWER, FROST]);
    s.idle(1);

    let first = s.slot_center(PanelId::ActionBar, 0);
    let locked = s.slot_center(PanelId::ActionBar, 2);
    s.drag(first, locked);

    let bar = &s.manager().panels().action_bar;
    assert_eq!(bar.power_at(0), FIREBALL);
    assert_eq!(bar.power_at(2), FROST);
    assert!(bar.is_locked(2));
    assert_eq!(s.manager().messages().last(), Some("That slot is locked."));
}

#[test]
fn bar_slots_show_the_carried_potion_count() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack::new(POTION, 3));
    s.manager_mut()
        .panels_mut()
        .action_bar
        .set_hotkeys(&[HEAL, FIREBALL]);
    s.idle(1);

    let frame = s.frame();
    assert_eq!(
        frame.action_slots[0],
        ActionSlotFrame {
            power: HEAL,
            enabled: true,
            item_count: Some(3),
        }
    );
    assert_eq!(frame.action_slots[1].item_count, None);

    give(&mut s, 0, ItemStack::EMPTY);
    s.idle(1);
    let frame = s.frame();
    assert!(!frame.action_slots[0].enabled);
    assert_eq!(frame.action_slots[0].item_count, Some(0));
}

#[test]
fn half_empty_slots_are_cleared_after_loading() {
    let mut s = Scenario::new(fixture_manager());
    give(&mut s, 0, ItemStack { item: GEM, quantity: 0 });
    s.manager_mut()
        .panels_mut()
        .stash
        .stock_mut()
        .set(3, ItemStack { item: POTION, quantity: 0 });
    s.idle(1);

    let panels = s.manager().panels();
    assert_eq!(panels.inventory.carried().stack_at(0), ItemStack::EMPTY);
    assert_eq!(panels.stash.stock().stack_at(3), ItemStack::EMPTY);
}
