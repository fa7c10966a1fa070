// Host-side tests for the frame loop bookkeeping.

#![allow(dead_code)]
mod loop_slot {
    include!("../src/loop_slot.rs");
}

use loop_slot::LoopSlot;
use std::rc::Rc;

struct FrameContext;

type Tick = Box<dyn Fn() -> bool>;

/// A slot whose callback captures both the slot and a context, like the rAF loop.
fn self_scheduling_loop(ctx: &Rc<FrameContext>) -> Rc<LoopSlot<Tick>> {
    let slot: Rc<LoopSlot<Tick>> = Rc::new(LoopSlot::default());
    let inner = slot.clone();
    let ctx = ctx.clone();
    slot.install(Box::new(move || {
        let _ = &ctx;
        inner.begin_frame() && inner.end_frame()
    }));
    slot
}

#[test]
fn stopping_releases_the_callback_and_its_captures() {
    let ctx = Rc::new(FrameContext);
    let slot = self_scheduling_loop(&ctx);
    assert_eq!(Rc::strong_count(&ctx), 2);
    assert_eq!(Rc::strong_count(&slot), 2);

    assert!(slot.stop());
    drop(slot.release());
    assert_eq!(Rc::strong_count(&ctx), 1);
    assert_eq!(Rc::strong_count(&slot), 1);
}

#[test]
fn stop_is_idempotent() {
    let ctx = Rc::new(FrameContext);
    let slot = self_scheduling_loop(&ctx);
    assert!(slot.is_running());
    assert!(slot.stop());
    assert!(!slot.stop());
    assert!(slot.release().is_some());
    assert!(slot.release().is_none());
}

#[test]
fn running_loop_reschedules_until_stopped() {
    let ctx = Rc::new(FrameContext);
    let slot = self_scheduling_loop(&ctx);
    assert_eq!(slot.with_callback(|tick| tick()), Some(true));
    slot.stop();
    assert_eq!(slot.with_callback(|tick| tick()), Some(false));
}

#[test]
fn stopping_mid_frame_is_visible_to_the_caller() {
    let slot: LoopSlot<()> = LoopSlot::default();
    slot.set_pending(Some(7));
    assert!(slot.begin_frame());
    assert_eq!(slot.take_pending(), None);
    assert!(slot.in_frame());
    slot.stop();
    assert!(slot.in_frame());
    assert!(!slot.end_frame());
    assert!(!slot.in_frame());
}

#[test]
fn pending_frame_is_handed_out_once() {
    let slot: LoopSlot<()> = LoopSlot::default();
    slot.set_pending(Some(3));
    assert_eq!(slot.take_pending(), Some(3));
    assert_eq!(slot.take_pending(), None);
}
