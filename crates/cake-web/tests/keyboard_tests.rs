// Host-side tests for the key mapping.
// The crate itself is wasm-only, so the pure module is included directly.

#![allow(dead_code)]
mod keys {
    include!("../src/keys.rs");
}

use keys::*;

#[test]
fn receiver_keys_blow_relight_and_toggle_the_mic() {
    assert_eq!(key_action(" ", Mode::Receiver), Some(KeyAction::BlowOnce));
    assert_eq!(key_action("r", Mode::Receiver), Some(KeyAction::ResetRound));
    assert_eq!(key_action("R", Mode::Receiver), Some(KeyAction::ResetRound));
    assert_eq!(key_action("m", Mode::Receiver), Some(KeyAction::ToggleMic));
}

#[test]
fn creator_keys_edit_the_cake() {
    assert_eq!(key_action("t", Mode::Creator), Some(KeyAction::NextTheme));
    assert_eq!(key_action("ArrowUp", Mode::Creator), Some(KeyAction::MoreCandles));
    assert_eq!(key_action("-", Mode::Creator), Some(KeyAction::FewerCandles));
}

#[test]
fn keys_do_not_leak_across_modes() {
    assert_eq!(key_action(" ", Mode::Creator), None);
    assert_eq!(key_action("ArrowUp", Mode::Receiver), None);
    assert_eq!(key_action("t", Mode::Receiver), None);
    assert_eq!(key_action("x", Mode::Receiver), None);
}

#[test]
fn auto_rotate_toggles_in_both_modes() {
    for mode in [Mode::Creator, Mode::Receiver] {
        assert_eq!(key_action("a", mode), Some(KeyAction::ToggleAutoRotate));
    }
}

#[test]
fn only_scrolling_keys_prevent_default() {
    assert!(KeyAction::BlowOnce.prevents_default());
    assert!(KeyAction::MoreCandles.prevents_default());
    assert!(!KeyAction::ToggleAutoRotate.prevents_default());
    assert!(!KeyAction::ResetRound.prevents_default());
}

#[test]
fn stepped_count_stays_in_range() {
    assert_eq!(stepped_count(1, false, 50), 1);
    assert_eq!(stepped_count(1, true, 50), 2);
    assert_eq!(stepped_count(50, true, 50), 50);
    assert_eq!(stepped_count(7, false, 50), 6);
}
