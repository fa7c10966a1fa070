// CakeView state machine driven through a recording presenter.

use cake_core::animation::{FrameInput, FramePresenter};
use cake_core::lifecycle::*;
use cake_core::scene::AssemblyTag;
use cake_core::theme::ThemeId;
use std::convert::Infallible;

#[derive(Default)]
struct Recorder {
    frames: usize,
    nodes: usize,
    azimuths: Vec<f32>,
    max_lights: usize,
}

impl FramePresenter for Recorder {
    type Error = Infallible;
    fn present(&mut self, frame: &FrameInput<'_>) -> Result<(), Self::Error> {
        self.frames += 1;
        self.nodes = frame.scene.len();
        self.azimuths.push(frame.camera.azimuth);
        self.max_lights = frame.max_point_lights;
        Ok(())
    }
}

fn mounted(count: usize) -> CakeView {
    let mut view = CakeView::new(SceneInputs {
        candle_count: count,
        ..Default::default()
    });
    view.mount();
    view
}

#[test]
fn mount_builds_one_assembly() {
    let view = mounted(5);
    assert_eq!(view.state(), ViewState::Built);
    assert_eq!(view.candles().len(), 5);
    assert_eq!(view.lit(), &[true; 5]);
}

#[test]
fn count_change_rebuilds_on_next_frame() {
    let mut view = mounted(5);
    let nodes_for_five = view.scene().len();
    view.set_candle_count(8);
    assert_eq!(view.state(), ViewState::RebuildPending);
    assert_eq!(view.candles().len(), 5);

    let mut rec = Recorder::default();
    view.frame(&mut rec).unwrap();
    assert_eq!(view.state(), ViewState::Built);
    assert_eq!(view.candles().len(), 8);
    assert_eq!(view.scene().count_tagged(AssemblyTag::Candle), 8 * 7);
    assert_eq!(view.rebuilds(), 1);

    view.set_candle_count(5);
    view.apply_pending();
    assert_eq!(view.scene().len(), nodes_for_five);
}

#[test]
fn rebuild_reapplies_lit_state_without_smoke() {
    let mut view = mounted(3);
    view.sync_lit(&[true, false, true]);
    assert_eq!(view.smoke().len(), 1);

    view.set_theme(ThemeId::Luxury);
    assert!(view.apply_pending());
    assert!(view.smoke().is_empty());
    let c1 = view.candles().get(1).unwrap();
    assert!(!view.scene().get(c1.flame).unwrap().visible);
    assert!(view.scene().get(c1.wick).unwrap().visible);
}

#[test]
fn sync_after_count_change_applies_pending_first() {
    let mut view = mounted(3);
    view.set_candle_count(4);
    let report = view.sync_lit(&[false, true, true, true]);
    assert_eq!(view.state(), ViewState::Built);
    assert_eq!(report.smoke_spawned, 1);
}

#[test]
fn count_change_relights_every_candle() {
    let mut view = mounted(3);
    view.sync_lit(&[true, false, false]);
    view.set_candle_count(5);
    assert!(view.apply_pending());
    assert_eq!(view.lit(), &[true; 5]);
    for handle in view.candles().iter() {
        assert!(view.scene().get(handle.flame).unwrap().visible);
        assert!(!view.scene().get(handle.wick).unwrap().visible);
    }
}

#[test]
fn count_round_trip_before_rebuild_still_relights() {
    let mut view = mounted(3);
    view.sync_lit(&[true, false, true]);
    view.set_candle_count(5);
    view.set_candle_count(3);
    assert!(view.apply_pending());
    assert_eq!(view.lit(), &[true; 3]);
    let c1 = view.candles().get(1).unwrap();
    assert!(view.scene().get(c1.flame).unwrap().visible);
    assert!(view.smoke().is_empty());
}

#[test]
fn auto_rotate_toggle_never_rebuilds() {
    let mut view = CakeView::new(SceneInputs {
        candle_count: 2,
        auto_rotate: false,
        ..Default::default()
    });
    view.mount();
    let mut rec = Recorder::default();
    view.frame(&mut rec).unwrap();
    view.set_auto_rotate(true);
    assert_eq!(view.state(), ViewState::Built);
    view.frame(&mut rec).unwrap();
    assert_eq!(view.rebuilds(), 0);
    assert!(rec.azimuths[1] != rec.azimuths[0]);
}

#[test]
fn unmount_releases_everything_and_stops_frames() {
    let mut view = mounted(4);
    view.unmount();
    assert_eq!(view.state(), ViewState::TornDown);
    assert!(view.scene().is_empty());
    let mut rec = Recorder::default();
    view.frame(&mut rec).unwrap();
    assert_eq!(rec.frames, 0);
    view.unmount();
}

#[test]
fn constrained_device_caps_point_lights() {
    let mut view = CakeView::new(SceneInputs {
        candle_count: 20,
        device_constrained: true,
        ..Default::default()
    });
    view.mount();
    let mut rec = Recorder::default();
    view.frame(&mut rec).unwrap();
    assert_eq!(rec.max_lights, 8);
    assert!(view.driver().is_degraded());
}

#[test]
#[should_panic(expected = "not unbuilt")]
fn mounting_twice_panics() {
    let mut view = mounted(1);
    view.mount();
}
