// Build / teardown behaviour of the scene builder.

use cake_core::builder::*;
use cake_core::constants::*;
use cake_core::quality::RenderQualityProfile;
use cake_core::scene::{AssemblyTag, SceneGraph};
use cake_core::theme::{theme, ThemeId};

fn build(scene: &mut SceneGraph, count: usize) -> (CakeAssembly, CandleArena) {
    let profile = RenderQualityProfile::full();
    let cake = build_cake(scene, theme(ThemeId::Classic), &profile);
    let candles = build_candles(scene, count, cake.surface(), &profile);
    (cake, candles)
}

#[test]
fn build_teardown_build_is_stable() {
    let mut scene = SceneGraph::new();
    let (mut cake, mut candles) = build(&mut scene, 5);
    let once = scene.len();
    let removed = teardown(&mut scene, &mut cake, &mut candles);
    assert_eq!(removed, once);
    assert!(scene.is_empty());
    assert!(cake.is_empty() && candles.is_empty());

    let (cake, candles) = build(&mut scene, 5);
    assert_eq!(candles.len(), 5);
    assert_eq!(candles.flames().count(), 5);
    assert_eq!(scene.len(), once);
    assert_eq!(scene.count_tagged(AssemblyTag::Candle), 5 * 7);
    assert!(!cake.is_empty());
}

#[test]
fn teardown_on_empty_collections_is_safe() {
    let mut scene = SceneGraph::new();
    let mut cake = CakeAssembly::default();
    let mut candles = CandleArena::default();
    assert_eq!(teardown(&mut scene, &mut cake, &mut candles), 0);
}

#[test]
fn teardown_leaves_environment_alone() {
    let mut scene = SceneGraph::new();
    let env = build_environment(&mut scene, &RenderQualityProfile::full());
    let (mut cake, mut candles) = build(&mut scene, 3);
    teardown(&mut scene, &mut cake, &mut candles);
    assert_eq!(scene.len(), env.len());
    assert!(env.iter().all(|id| scene.contains(*id)));
}

#[test]
fn candles_start_lit_with_hidden_wicks() {
    let mut scene = SceneGraph::new();
    let (_, candles) = build(&mut scene, 4);
    for c in candles.iter() {
        for id in c.flame_group() {
            assert!(scene.get(id).unwrap().visible);
        }
        assert!(!scene.get(c.wick).unwrap().visible);
        let light = scene.get(c.light).unwrap();
        assert_eq!(light.light_intensity(), Some(CANDLE_LIGHT_INTENSITY));
    }
    assert_eq!(scene.active_point_lights().count(), 4);
}

#[test]
fn candle_parts_stack_above_the_surface() {
    let mut scene = SceneGraph::new();
    let (cake, candles) = build(&mut scene, 1);
    let top = cake.surface().top_y();
    let c = candles.get(0).unwrap();
    let y = |id| scene.get(id).unwrap().position.y - top;
    assert!((y(c.stick) - CANDLE_HEIGHT / 2.0).abs() < 1e-5);
    assert!((y(c.band) - BAND_OFFSET_Y).abs() < 1e-5);
    assert!((y(c.wick) - WICK_OFFSET_Y).abs() < 1e-5);
    assert!((y(c.flame) - FLAME_OFFSET_Y).abs() < 1e-5);
}

#[test]
fn sparkles_are_identical_across_rebuilds() {
    let positions = |scene: &SceneGraph| {
        let mut v: Vec<[f32; 3]> = scene
            .iter()
            .map(|(_, n)| n.position.to_array())
            .collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    };
    let mut a = SceneGraph::new();
    let mut b = SceneGraph::new();
    build(&mut a, 2);
    build(&mut b, 2);
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn constrained_environment_skips_secondary_lights_and_shadow() {
    let mut full = SceneGraph::new();
    let mut lean = SceneGraph::new();
    let a = build_environment(&mut full, &RenderQualityProfile::full());
    let b = build_environment(&mut lean, &RenderQualityProfile::constrained());
    assert_eq!(a.len(), 6);
    assert_eq!(b.len(), 3);
}
