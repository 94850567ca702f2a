//! Integration tests for command parsing errors: every rejected line
//! produces exactly one message and leaves the store untouched.

use std::cell::RefCell;
use std::rc::Rc;

use supermarket::config::StoreConfig;
use supermarket::engine::{Engine, MemorySink};
use supermarket::slots::SlotId;
use supermarket::synth::SilentBank;

fn store() -> (Engine, MemorySink, Rc<RefCell<SilentBank>>) {
    let sink = MemorySink::new();
    let bank = Rc::new(RefCell::new(SilentBank::new()));
    let engine = Engine::with_seed(
        StoreConfig::default(),
        Box::new(bank.clone()),
        Box::new(sink.clone()),
        7,
    );
    (engine, sink, bank)
}

#[test]
fn test_unknown_command_reports_once_and_changes_nothing() {
    let (mut engine, sink, bank) = store();
    let bpm = engine.state().transport.bpm();

    assert!(!engine.execute_command("launch the rocket"));

    assert_eq!(sink.messages().len(), 1);
    assert_eq!(
        sink.last().unwrap(),
        "Unknown command - the register won't accept that."
    );
    assert_eq!(engine.state().slots.occupied_count(), 0);
    assert_eq!(engine.state().transport.bpm(), bpm);
    assert_eq!(bank.borrow().built_total(), 0);
}

#[test]
fn test_unknown_product_builds_no_voice() {
    let (mut engine, sink, bank) = store();

    assert!(!engine.execute_command("[0] add fresh xyzzy"));

    assert_eq!(
        sink.last().unwrap(),
        "Unknown product: xyzzy. This market has been abandoned for decades."
    );
    assert!(engine.state().slots.current(SlotId::new(0).unwrap()).is_none());
    assert_eq!(bank.borrow().built_total(), 0);
}

#[test]
fn test_add_without_slot_prefix_is_rejected() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command("add beer"));
    assert_eq!(
        sink.last().unwrap(),
        "❌ Slot required! Use [0] through [9], e.g.: [0] add beer"
    );
    assert_eq!(engine.state().slots.occupied_count(), 0);
}

#[test]
fn test_remove_without_slot_prefix_is_rejected() {
    let (mut engine, sink, _bank) = store();
    engine.execute_command("[0] add beer");
    assert!(!engine.execute_command("remove beer"));
    assert_eq!(
        sink.last().unwrap(),
        "❌ Specify slot to remove, e.g.: [0] remove, or use: remove all"
    );
    assert_eq!(engine.state().slots.occupied_count(), 1);
}

#[test]
fn test_remove_with_trailing_words_gets_a_hint() {
    let (mut engine, sink, _bank) = store();
    engine.execute_command("[2] add beer");
    assert!(!engine.execute_command("[2] remove beer"));
    assert_eq!(
        sink.last().unwrap(),
        "⚠️ To remove slot [2], just use: [2] remove"
    );
    // The product stays on the shelf.
    assert_eq!(engine.state().slots.occupied_count(), 1);
}

#[test]
fn test_out_of_range_slot_address() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command("[12] add beer"));
    assert_eq!(
        sink.last().unwrap(),
        "❌ Invalid slot [12]! Use [0] through [9]"
    );
}

#[test]
fn test_excess_modifiers_are_truncated_not_rejected() {
    let (mut engine, _sink, _bank) = store();
    assert!(engine.execute_command("[0] add fresh old cheap strong expensive beer"));

    let current = engine.state().slots.current(SlotId::new(0).unwrap()).unwrap();
    assert_eq!(current.request.product, "beer");
    assert_eq!(current.request.modifiers, vec!["fresh", "old", "cheap"]);
}

#[test]
fn test_invalid_security_level() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command("security level 150"));
    assert_eq!(
        sink.last().unwrap(),
        "Invalid security level. Use: low, medium, high, paranoid, or 0-100"
    );
    // Level stays at the default.
    assert_eq!(engine.state().security.level, 0.5);
}

#[test]
fn test_invalid_performance_mode() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command("performance mode turbo"));
    assert_eq!(
        sink.last().unwrap(),
        "Invalid performance mode. Use: performance, balanced, or quality"
    );
}

#[test]
fn test_unknown_wheel_type() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command("my cart has wooden wheels"));
    let message = sink.last().unwrap();
    assert!(message.contains("Invalid cart wheels"));
    assert_eq!(engine.state().cart.wheels, "none");
}

#[test]
fn test_invalid_season_and_coupon() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command("season monsoon"));
    assert_eq!(sink.last().unwrap(), "Invalid season: monsoon");

    assert!(!engine.execute_command("apply coupon EXPIRED"));
    assert_eq!(sink.last().unwrap(), "Invalid coupon: expired");
}

#[test]
fn test_blank_lines_say_nothing() {
    let (mut engine, sink, _bank) = store();
    assert!(!engine.execute_command(""));
    assert!(!engine.execute_command("   "));
    assert!(!engine.execute_command("[3]"));
    assert!(sink.messages().is_empty());
}

#[test]
fn test_commands_are_case_insensitive() {
    let (mut engine, sink, _bank) = store();
    assert!(engine.execute_command("[0] ADD BEER"));
    assert!(engine.execute_command("It's Closing Time"));
    assert!(engine.execute_command("REMOVE ALL"));
    assert!(sink.contains("All 1 slots cleared"));
}

#[test]
fn test_extra_whitespace_is_tolerated() {
    let (mut engine, _sink, _bank) = store();
    assert!(engine.execute_command("  [0]   add   fresh   beer  "));
    let current = engine.state().slots.current(SlotId::new(0).unwrap()).unwrap();
    assert_eq!(current.request.product, "beer");
    assert_eq!(current.request.modifiers, vec!["fresh"]);
}

#[test]
fn test_error_replies_do_not_disturb_pending_swaps() {
    let (mut engine, _sink, _bank) = store();
    engine.state_mut().transport.start();
    engine.execute_command("[0] add beer");
    engine.execute_command("[0] add cheese");
    assert_eq!(engine.state().slots.pending_count(), 1);

    engine.execute_command("gibberish at the register");

    assert_eq!(engine.state().slots.pending_count(), 1);
    assert_eq!(engine.state().transport.armed_count(), 1);
}
