//! `CakeView` owns the scene graph and drives build, rebuild, sync and
//! teardown as an explicit state machine:
//!
//! ```text
//! Unbuilt --mount--> Built --count/theme change--> RebuildPending
//!                    |  ^                               |
//!                    |  +----next frame / apply_pending-+
//!                    +--unmount--> TornDown
//! ```

use crate::animation::{AnimationDriver, FrameInput, FramePresenter};
use crate::builder::{self, CakeAssembly, CandleArena};
use crate::camera::OrbitCamera;
use crate::quality::RenderQualityProfile;
use crate::scene::{NodeId, SceneGraph};
use crate::smoke::SmokeField;
use crate::sync::{apply_lit_state, SyncMode, SyncReport};
use crate::theme::{theme, ThemeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    Unbuilt,
    Built,
    RebuildPending,
    TornDown,
}

/// Host-controlled inputs of the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneInputs {
    pub candle_count: usize,
    pub theme: ThemeId,
    pub auto_rotate: bool,
    pub device_constrained: bool,
}

impl Default for SceneInputs {
    fn default() -> Self {
        Self {
            candle_count: 1,
            theme: ThemeId::default(),
            auto_rotate: true,
            device_constrained: false,
        }
    }
}

pub struct CakeView {
    state: ViewState,
    inputs: SceneInputs,
    profile: RenderQualityProfile,
    scene: SceneGraph,
    environment: Vec<NodeId>,
    cake: CakeAssembly,
    candles: CandleArena,
    smoke: SmokeField,
    driver: AnimationDriver,
    lit: Vec<bool>,
    rebuilds: u32,
}

impl CakeView {
    pub fn new(inputs: SceneInputs) -> Self {
        assert!(inputs.candle_count >= 1, "candle count must be at least 1");
        let profile = RenderQualityProfile::resolve(inputs.device_constrained);
        let mut driver = AnimationDriver::new(profile.degraded_animation);
        driver.camera.auto_rotate = inputs.auto_rotate;
        Self {
            state: ViewState::Unbuilt,
            inputs,
            profile,
            scene: SceneGraph::new(),
            environment: Vec::new(),
            cake: CakeAssembly::default(),
            candles: CandleArena::default(),
            smoke: SmokeField::new(profile.small_segments(8)),
            driver,
            lit: vec![true; inputs.candle_count],
            rebuilds: 0,
        }
    }

    /// Build environment, cake and candles. Panics unless the view is unbuilt.
    pub fn mount(&mut self) {
        assert_eq!(self.state, ViewState::Unbuilt, "mount on a view that is not unbuilt");
        self.environment = builder::build_environment(&mut self.scene, &self.profile);
        self.build_assembly();
        self.state = ViewState::Built;
        log::info!(
            "[view] mounted: {} candles, theme {}, {} nodes",
            self.inputs.candle_count,
            self.inputs.theme,
            self.scene.len()
        );
    }

    pub fn set_candle_count(&mut self, count: usize) {
        assert!(count >= 1, "candle count must be at least 1");
        if count != self.inputs.candle_count {
            self.inputs.candle_count = count;
            // Any count change relights, even one that later returns to the old count.
            self.lit = vec![true; count];
            self.mark_dirty();
        }
    }

    pub fn set_theme(&mut self, id: ThemeId) {
        if id != self.inputs.theme {
            self.inputs.theme = id;
            self.mark_dirty();
        }
    }

    /// Passed straight to the camera; never rebuilds.
    pub fn set_auto_rotate(&mut self, on: bool) {
        self.inputs.auto_rotate = on;
        self.driver.camera.auto_rotate = on;
    }

    fn mark_dirty(&mut self) {
        match self.state {
            ViewState::Built => self.state = ViewState::RebuildPending,
            ViewState::Unbuilt | ViewState::RebuildPending => {}
            ViewState::TornDown => log::warn!("[view] input change after unmount ignored"),
        }
    }

    /// Perform a pending rebuild now. Returns whether one happened.
    pub fn apply_pending(&mut self) -> bool {
        if self.state != ViewState::RebuildPending {
            return false;
        }
        builder::teardown(&mut self.scene, &mut self.cake, &mut self.candles);
        self.smoke.clear(&mut self.scene);
        self.build_assembly();
        self.rebuilds += 1;
        self.state = ViewState::Built;
        log::info!(
            "[view] rebuilt: {} candles, theme {}",
            self.inputs.candle_count,
            self.inputs.theme
        );
        true
    }

    fn build_assembly(&mut self) {
        let count = self.inputs.candle_count;
        self.cake = builder::build_cake(&mut self.scene, theme(self.inputs.theme), &self.profile);
        self.candles =
            builder::build_candles(&mut self.scene, count, self.cake.surface(), &self.profile);
        if self.lit.len() != count {
            self.lit = vec![true; count];
        }
        apply_lit_state(
            &mut self.scene,
            &self.candles,
            &self.lit,
            &mut self.smoke,
            SyncMode::Settle,
        );
    }

    /// Apply a new lit array. A pending rebuild runs first (settling the
    /// previous state) so the arena and the array agree in length. Panics on a
    /// length mismatch.
    pub fn sync_lit(&mut self, lit: &[bool]) -> SyncReport {
        assert_eq!(
            lit.len(),
            self.inputs.candle_count,
            "lit state length must match the candle count"
        );
        self.apply_pending();
        self.lit.clear();
        self.lit.extend_from_slice(lit);
        match self.state {
            ViewState::Built => apply_lit_state(
                &mut self.scene,
                &self.candles,
                &self.lit,
                &mut self.smoke,
                SyncMode::Transition,
            ),
            _ => SyncReport::default(),
        }
    }

    /// Tick and present one frame. Does nothing unless mounted.
    pub fn frame<P: FramePresenter>(&mut self, presenter: &mut P) -> Result<(), P::Error> {
        self.apply_pending();
        if self.state != ViewState::Built {
            return Ok(());
        }
        self.driver
            .tick(&mut self.scene, &self.candles, &self.lit, &mut self.smoke);
        presenter.present(&FrameInput {
            scene: &self.scene,
            camera: &self.driver.camera,
            background: theme(self.inputs.theme).background_linear(),
            max_point_lights: self.profile.light_count,
        })
    }

    /// Release every node. Idempotent.
    pub fn unmount(&mut self) {
        if self.state == ViewState::TornDown {
            return;
        }
        builder::teardown(&mut self.scene, &mut self.cake, &mut self.candles);
        self.smoke.clear(&mut self.scene);
        for id in self.environment.drain(..) {
            self.scene.remove(id);
        }
        self.scene.clear();
        self.state = ViewState::TornDown;
        log::info!("[view] unmounted");
    }

    #[inline]
    pub fn state(&self) -> ViewState {
        self.state
    }
    #[inline]
    pub fn inputs(&self) -> &SceneInputs {
        &self.inputs
    }
    #[inline]
    pub fn profile(&self) -> &RenderQualityProfile {
        &self.profile
    }
    #[inline]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }
    #[inline]
    pub fn candles(&self) -> &CandleArena {
        &self.candles
    }
    #[inline]
    pub fn cake(&self) -> &CakeAssembly {
        &self.cake
    }
    #[inline]
    pub fn smoke(&self) -> &SmokeField {
        &self.smoke
    }
    #[inline]
    pub fn lit(&self) -> &[bool] {
        &self.lit
    }
    #[inline]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }
    /// Number of rebuilds applied since mount.
    #[inline]
    pub fn rebuilds(&self) -> u32 {
        self.rebuilds
    }
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.driver.camera
    }
}
