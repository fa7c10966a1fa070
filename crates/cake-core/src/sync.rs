//! Applies a lit/unlit array to the candle visuals without rebuilding.

use crate::builder::CandleArena;
use crate::constants::CANDLE_LIGHT_INTENSITY;
use crate::scene::{NodeId, SceneGraph};
use crate::smoke::SmokeField;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// Live change: a candle going out leaves a smoke puff.
    Transition,
    /// Restoring state after a rebuild: no smoke.
    Settle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub extinguished: usize,
    pub relit: usize,
    pub smoke_spawned: usize,
}

impl SyncReport {
    #[inline]
    pub fn changed(&self) -> bool {
        self.extinguished + self.relit > 0
    }
}

fn set_visible(scene: &mut SceneGraph, id: NodeId, visible: bool) -> bool {
    match scene.get_mut(id) {
        Some(node) if node.visible != visible => {
            node.visible = visible;
            true
        }
        _ => false,
    }
}

/// Panics when `lit` and `candles` differ in length.
pub fn apply_lit_state(
    scene: &mut SceneGraph,
    candles: &CandleArena,
    lit: &[bool],
    smoke: &mut SmokeField,
    mode: SyncMode,
) -> SyncReport {
    assert_eq!(
        lit.len(),
        candles.len(),
        "lit state length must match the candle count"
    );
    let mut report = SyncReport::default();
    for (candle, &is_lit) in candles.iter().zip(lit) {
        for id in candle.flame_group() {
            set_visible(scene, id, is_lit);
        }
        if set_visible(scene, candle.wick, !is_lit) {
            if is_lit {
                report.relit += 1;
            } else {
                report.extinguished += 1;
                if mode == SyncMode::Transition {
                    if let Some(at) = scene.get(candle.wick).map(|n| n.position) {
                        smoke.spawn(scene, at);
                        report.smoke_spawned += 1;
                    }
                }
            }
        }
        if let Some(light) = scene.get_mut(candle.light) {
            light.set_light_intensity(if is_lit { CANDLE_LIGHT_INTENSITY } else { 0.0 });
        }
    }
    if report.changed() {
        log::debug!(
            "[sync] {} out, {} relit, {} smoke",
            report.extinguished,
            report.relit,
            report.smoke_spawned
        );
    }
    report
}
