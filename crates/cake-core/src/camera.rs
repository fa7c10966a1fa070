use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Simple perspective camera description.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Orbit controller around the cake. Angles are spherical coordinates with the
/// polar angle measured from +Y.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    pub auto_rotate: bool,
}

/// Radians per tick for a given auto-rotate speed (2π per 60 s at speed 1, 60 Hz).
#[inline]
pub fn auto_rotate_step(speed: f32) -> f32 {
    speed * TAU / 3600.0
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let target = Vec3::from(CAMERA_TARGET);
        let offset = Vec3::from(CAMERA_START) - target;
        let distance = offset.length();
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).acos(),
            distance,
            auto_rotate: true,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    /// Advance auto-rotation by one tick when enabled.
    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.azimuth = (self.azimuth + auto_rotate_step(AUTO_ROTATE_SPEED)) % TAU;
        }
    }

    /// Drag rotation in radians. The polar angle never dips below the horizon.
    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth = (self.azimuth + d_azimuth) % TAU;
        self.polar = (self.polar + d_polar).clamp(0.01, FRAC_PI_2);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_reproduces_start_position() {
        let eye = OrbitCamera::default().eye();
        assert!((eye - Vec3::from(CAMERA_START)).length() < 1e-4);
    }

    #[test]
    fn zoom_and_polar_are_clamped() {
        let mut c = OrbitCamera::default();
        c.zoom(100.0);
        assert_eq!(c.distance, CAMERA_MAX_DISTANCE);
        c.zoom(0.01);
        assert_eq!(c.distance, CAMERA_MIN_DISTANCE);
        c.orbit(0.0, 10.0);
        assert!(c.polar <= FRAC_PI_2);
        assert!(c.eye().y >= c.target.y - 1e-4);
    }

    #[test]
    fn tick_is_a_no_op_when_disabled() {
        let mut c = OrbitCamera {
            auto_rotate: false,
            ..Default::default()
        };
        let before = c.azimuth;
        c.tick();
        assert_eq!(c.azimuth, before);
    }
}
