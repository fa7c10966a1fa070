//! Per-frame update of flames, smoke and camera, followed by presentation.

use crate::builder::CandleArena;
use crate::camera::OrbitCamera;
use crate::constants::*;
use crate::scene::SceneGraph;
use crate::smoke::SmokeField;
use glam::Vec3;

/// Everything a front-end needs to draw one frame.
pub struct FrameInput<'a> {
    pub scene: &'a SceneGraph,
    pub camera: &'a OrbitCamera,
    /// Linear clear/fog color.
    pub background: Vec3,
    /// Upper bound on candle point lights to upload.
    pub max_point_lights: usize,
}

/// Seam through which the driver renders. Implemented by the GPU front-ends
/// and by test recorders.
pub trait FramePresenter {
    type Error;
    fn present(&mut self, frame: &FrameInput<'_>) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub struct AnimationDriver {
    time: f32,
    ticks: u64,
    degraded: bool,
    pub camera: OrbitCamera,
}

impl AnimationDriver {
    pub fn new(degraded: bool) -> Self {
        Self {
            time: 0.0,
            ticks: 0,
            degraded,
            camera: OrbitCamera::default(),
        }
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Advance one tick. Returns whether flames and smoke were animated (always
    /// true unless degraded, where only every other tick animates).
    pub fn tick(
        &mut self,
        scene: &mut SceneGraph,
        candles: &CandleArena,
        lit: &[bool],
        smoke: &mut SmokeField,
    ) -> bool {
        self.time += TIME_STEP;
        self.ticks += 1;
        let animate = !self.degraded || self.ticks % 2 == 1;
        if animate {
            flicker(scene, candles, lit, self.time);
            smoke.step(scene);
        }
        self.camera.tick();
        animate
    }
}

/// Scale every lit flame by the flicker curve at time `t`.
pub fn flicker(scene: &mut SceneGraph, candles: &CandleArena, lit: &[bool], t: f32) {
    for (i, flame) in candles.flames().enumerate() {
        if !lit.get(i).copied().unwrap_or(false) {
            continue;
        }
        if let Some(node) = scene.get_mut(flame) {
            let phase = i as f32;
            let y = 1.0 + (t * FLICKER_Y_FREQ + phase).sin() * FLICKER_Y_AMP;
            let xz = 1.0 + (t * FLICKER_X_FREQ + phase).cos() * FLICKER_X_AMP;
            node.scale = Vec3::new(xz, y, xz);
        }
    }
}
