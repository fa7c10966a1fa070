// Candle-state synchronizer behaviour.

use cake_core::builder::*;
use cake_core::constants::*;
use cake_core::quality::RenderQualityProfile;
use cake_core::scene::SceneGraph;
use cake_core::smoke::SmokeField;
use cake_core::sync::{apply_lit_state, SyncMode};
use cake_core::theme::{theme, ThemeId};

struct Fixture {
    scene: SceneGraph,
    candles: CandleArena,
    smoke: SmokeField,
}

fn fixture(count: usize) -> Fixture {
    let profile = RenderQualityProfile::full();
    let mut scene = SceneGraph::new();
    let cake = build_cake(&mut scene, theme(ThemeId::Elegant), &profile);
    let candles = build_candles(&mut scene, count, cake.surface(), &profile);
    Fixture {
        scene,
        candles,
        smoke: SmokeField::default(),
    }
}

impl Fixture {
    fn apply(&mut self, lit: &[bool], mode: SyncMode) -> cake_core::sync::SyncReport {
        apply_lit_state(&mut self.scene, &self.candles, lit, &mut self.smoke, mode)
    }
    fn visible(&self, id: cake_core::NodeId) -> bool {
        self.scene.get(id).unwrap().visible
    }
}

#[test]
fn blowing_one_candle_out_touches_only_that_candle() {
    let mut f = fixture(3);
    assert!(!f.apply(&[true, true, true], SyncMode::Transition).changed());
    let before_flames: Vec<_> = [0, 2]
        .iter()
        .map(|&i| f.scene.get(f.candles.get(i).unwrap().flame).unwrap().clone())
        .collect();

    let report = f.apply(&[true, false, true], SyncMode::Transition);
    assert_eq!(report.extinguished, 1);
    assert_eq!(report.smoke_spawned, 1);

    let c1 = f.candles.get(1).unwrap().clone();
    for id in c1.flame_group() {
        assert!(!f.visible(id));
    }
    assert!(f.visible(c1.wick));
    assert_eq!(f.scene.get(c1.light).unwrap().light_intensity(), Some(0.0));
    assert!(f.scene.contains(c1.light), "light stays in the scene");

    assert_eq!(f.smoke.len(), 1);
    let puff = f.scene.get(f.smoke.puffs()[0].node).unwrap();
    assert_eq!(puff.position, f.scene.get(c1.wick).unwrap().position);

    for (k, &i) in [0usize, 2].iter().enumerate() {
        assert_eq!(f.scene.get(f.candles.get(i).unwrap().flame).unwrap(), &before_flames[k]);
    }
}

#[test]
fn reapplying_the_same_state_is_a_no_op() {
    let mut f = fixture(3);
    f.apply(&[true, false, true], SyncMode::Transition);
    let report = f.apply(&[true, false, true], SyncMode::Transition);
    assert!(!report.changed());
    assert_eq!(report.smoke_spawned, 0);
    assert_eq!(f.smoke.len(), 1);
}

#[test]
fn relighting_restores_flames_and_light() {
    let mut f = fixture(2);
    f.apply(&[false, false], SyncMode::Transition);
    let report = f.apply(&[true, false], SyncMode::Transition);
    assert_eq!(report.relit, 1);
    let c0 = f.candles.get(0).unwrap().clone();
    assert!(f.visible(c0.flame) && f.visible(c0.inner_flame) && f.visible(c0.glow));
    assert!(!f.visible(c0.wick));
    assert_eq!(
        f.scene.get(c0.light).unwrap().light_intensity(),
        Some(CANDLE_LIGHT_INTENSITY)
    );
}

#[test]
fn settle_mode_spawns_no_smoke() {
    let mut f = fixture(4);
    let report = f.apply(&[false; 4], SyncMode::Settle);
    assert_eq!(report.extinguished, 4);
    assert_eq!(report.smoke_spawned, 0);
    assert!(f.smoke.is_empty());
}

#[test]
#[should_panic(expected = "must match")]
fn length_mismatch_panics() {
    let mut f = fixture(3);
    f.apply(&[true, true], SyncMode::Transition);
}
