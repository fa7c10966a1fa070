// Frame driver: flicker, smoke lifetime, degraded mode and presentation.

use cake_core::animation::*;
use cake_core::builder::*;
use cake_core::constants::*;
use cake_core::quality::RenderQualityProfile;
use cake_core::scene::SceneGraph;
use cake_core::smoke::SmokeField;
use cake_core::theme::{theme, ThemeId};
use glam::Vec3;

fn scene_with(count: usize) -> (SceneGraph, CandleArena) {
    let profile = RenderQualityProfile::full();
    let mut scene = SceneGraph::new();
    let cake = build_cake(&mut scene, theme(ThemeId::Modern), &profile);
    let candles = build_candles(&mut scene, count, cake.surface(), &profile);
    (scene, candles)
}

#[test]
fn lit_flames_follow_the_flicker_curve() {
    let (mut scene, candles) = scene_with(3);
    let mut smoke = SmokeField::default();
    let mut driver = AnimationDriver::new(false);
    let lit = [true, false, true];
    driver.tick(&mut scene, &candles, &lit, &mut smoke);
    let t = driver.time();
    assert!((t - TIME_STEP).abs() < 1e-6);

    let s2 = scene.get(candles.get(2).unwrap().flame).unwrap().scale;
    let y = 1.0 + (t * FLICKER_Y_FREQ + 2.0).sin() * FLICKER_Y_AMP;
    let xz = 1.0 + (t * FLICKER_X_FREQ + 2.0).cos() * FLICKER_X_AMP;
    assert!((s2 - Vec3::new(xz, y, xz)).abs().max_element() < 1e-6);

    // unlit flame keeps its scale
    assert_eq!(scene.get(candles.get(1).unwrap().flame).unwrap().scale, Vec3::ONE);
}

#[test]
fn smoke_fades_monotonically_and_is_removed() {
    let mut scene = SceneGraph::new();
    let mut smoke = SmokeField::default();
    let node = smoke.spawn(&mut scene, Vec3::new(0.0, 4.0, 0.0));
    let mut last = SMOKE_START_OPACITY;
    let mut last_y = 4.0;
    let mut ticks = 0;
    while !smoke.is_empty() {
        smoke.step(&mut scene);
        ticks += 1;
        if let Some(puff) = smoke.puffs().first() {
            assert!(puff.opacity < last);
            last = puff.opacity;
            let n = scene.get(node).unwrap();
            assert!(n.position.y > last_y);
            last_y = n.position.y;
        }
        assert!(ticks < 1000, "smoke never cleared");
    }
    assert!(!scene.contains(node));
    assert!(ticks > 100);
}

#[test]
fn degraded_driver_animates_every_other_tick() {
    let (mut scene, candles) = scene_with(1);
    let mut smoke = SmokeField::default();
    let mut driver = AnimationDriver::new(true);
    let animated: Vec<bool> = (0..6)
        .map(|_| driver.tick(&mut scene, &candles, &[true], &mut smoke))
        .collect();
    assert_eq!(animated, vec![true, false, true, false, true, false]);
    assert!((driver.time() - 6.0 * TIME_STEP).abs() < 1e-5);
}

#[test]
fn camera_rotates_only_when_enabled() {
    let (mut scene, candles) = scene_with(1);
    let mut smoke = SmokeField::default();
    let mut driver = AnimationDriver::new(false);
    driver.camera.auto_rotate = false;
    let a0 = driver.camera.azimuth;
    driver.tick(&mut scene, &candles, &[true], &mut smoke);
    assert_eq!(driver.camera.azimuth, a0);
    driver.camera.auto_rotate = true;
    driver.tick(&mut scene, &candles, &[true], &mut smoke);
    assert!(driver.camera.azimuth != a0);
}
