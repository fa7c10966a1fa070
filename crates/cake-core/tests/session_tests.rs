// Blow detection and the receiver session.

use cake_core::blow::*;
use cake_core::constants::*;
use cake_core::session::*;

#[test]
fn rms_maps_onto_the_analyser_scale() {
    assert_eq!(strength_from_rms(0.0), 0.0);
    assert_eq!(strength_from_rms(1.0), STRENGTH_MAX);
    let s = strength_from_rms(30.0 / RMS_TO_BYTE_LEVEL);
    assert!((s - 1.0).abs() < 1e-5);
    assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
}

#[test]
fn meter_converges_towards_input() {
    let mut m = LoudnessMeter::default();
    for _ in 0..20 {
        m.push(2.0);
    }
    assert!((m.value() - 2.0).abs() < 1e-3);
    m.reset();
    assert_eq!(m.value(), 0.0);
}

#[test]
fn labels_follow_thresholds() {
    assert_eq!(strength_label(2.0), "Strong!");
    assert_eq!(strength_label(1.0), "Good");
    assert_eq!(strength_label(0.2), "Blow harder");
    assert_eq!(strength_bar_percent(5.0), 100.0);
}

#[test]
fn samples_are_ignored_until_listening() {
    let mut s = BlowSession::with_seed(5, 7);
    for _ in 0..50 {
        assert_eq!(s.on_strength(STRENGTH_MAX), None);
    }
    assert_eq!(s.lit().lit_count(), 5);
}

#[test]
fn all_out_is_emitted_exactly_once() {
    let mut s = BlowSession::with_seed(6, 42);
    s.start_listening();
    let mut all_out = 0;
    for _ in 0..500 {
        if let Some(SessionEvent::AllOut { wish }) = s.on_strength(STRENGTH_MAX) {
            assert!(WISH_MESSAGES.contains(&wish));
            all_out += 1;
        }
    }
    assert_eq!(all_out, 1);
    assert!(s.celebrated());
    assert!(!s.is_listening());
    assert!(s.lit().all_out());
}

#[test]
fn reset_starts_a_new_round() {
    let mut s = BlowSession::with_seed(3, 1).with_policy(BlowPolicy {
        probability: 1.0,
        ..Default::default()
    });
    assert!(matches!(s.blow_once(), Some(SessionEvent::AllOut { .. })));
    assert_eq!(s.blow_once(), None);
    s.reset();
    assert!(!s.celebrated());
    assert_eq!(s.lit().lit_count(), 3);
    s.set_candle_count(9);
    assert_eq!(s.lit().len(), 9);
}

#[test]
fn weak_blows_leave_candles_lit() {
    let mut s = BlowSession::with_seed(4, 3);
    s.start_listening();
    for _ in 0..200 {
        assert_eq!(s.on_strength(1.0), None);
    }
    assert_eq!(s.lit().lit_count(), 4);
}
