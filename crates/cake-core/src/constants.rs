// Shared design constants used by the builder, the animation driver and both
// front-ends. Distances are world units; the cake stands on y = 0.

// Tiers (radius, height); each tier sits on the previous one's frosting
pub const BOTTOM_TIER_RADIUS: f32 = 2.5;
pub const BOTTOM_TIER_HEIGHT: f32 = 1.2;
pub const MIDDLE_TIER_RADIUS: f32 = 1.9;
pub const MIDDLE_TIER_HEIGHT: f32 = 1.0;
pub const TOP_TIER_RADIUS: f32 = 1.4;
pub const TOP_TIER_HEIGHT: f32 = 0.9;
pub const TIER_GAP: f32 = 0.15; // frosting thickness between tiers
pub const TIER_FLARE: [f32; 3] = [0.1, 0.08, 0.06]; // bottom radius widening per tier
pub const FROSTING_OVERHANG: f32 = 0.05;
pub const TOP_FROSTING_HEIGHT: f32 = 0.2;

// Decorations at full density
pub const PEARL_COUNT: usize = 24;
pub const PEARL_RADIUS: f32 = 0.08;
pub const ROSE_COUNT: usize = 16;
pub const ROSE_PETALS: usize = 5;
pub const ROSE_RADIUS: f32 = 0.1;
pub const PETAL_RADIUS: f32 = 0.06;
pub const PETAL_OFFSET: f32 = 0.08;
pub const RIBBON_OFFSET: f32 = 0.12;
pub const RIBBON_HEIGHT: f32 = 0.2;
pub const SWIRL_GROUPS: usize = 8;
pub const SWIRL_STEPS: usize = 5;
pub const SPARKLE_COUNT: usize = 32;
pub const SPARKLE_RADIUS: f32 = 0.03;
pub const SPARKLE_SEED: u64 = 0x00C4_4E5B;

// Candle geometry, relative to the top surface height
pub const CANDLE_RADIUS: f32 = 0.08;
pub const CANDLE_HEIGHT: f32 = 0.9;
pub const BAND_RADIUS: f32 = 0.09;
pub const BAND_HEIGHT: f32 = 0.1;
pub const BAND_OFFSET_Y: f32 = 0.25;
pub const WICK_RADIUS: f32 = 0.02;
pub const WICK_HEIGHT: f32 = 0.2;
pub const WICK_OFFSET_Y: f32 = 1.0;
pub const FLAME_RADIUS: f32 = 0.15;
pub const FLAME_HEIGHT: f32 = 0.5;
pub const FLAME_OFFSET_Y: f32 = 1.2;
pub const INNER_FLAME_RADIUS: f32 = 0.1;
pub const INNER_FLAME_HEIGHT: f32 = 0.35;
pub const INNER_FLAME_OFFSET_Y: f32 = 1.15;
pub const GLOW_RADIUS: f32 = 0.2;
pub const CANDLE_SEGMENTS: u32 = 16;
pub const FLAME_SEGMENTS: u32 = 8;

// Candle lights
pub const CANDLE_LIGHT_INTENSITY: f32 = 2.0;
pub const CANDLE_LIGHT_RANGE: f32 = 6.0;
pub const MAX_CANDLES: usize = 50;

// Palettes (sRGB hex)
pub const CANDLE_COLORS: [u32; 6] = [0xFFB6C1, 0xADD8E6, 0x98FB98, 0xFFDAB9, 0xDDA0DD, 0xF0E68C];
pub const FROSTING_COLOR: u32 = 0xFFFBF5;
pub const PEARL_COLOR: u32 = 0xFFF8E7;
pub const SWIRL_COLOR: u32 = 0xFFFFFF;
pub const BAND_COLOR: u32 = 0xFFD700;
pub const WICK_COLOR: u32 = 0x1A1A1A;
pub const FLAME_COLOR: u32 = 0xFF6B00;
pub const INNER_FLAME_COLOR: u32 = 0xFFFF00;
pub const GLOW_COLOR: u32 = 0xFFAA00;
pub const SMOKE_COLOR: u32 = 0x888888;
pub const GROUND_COLOR: u32 = 0xFFFFFF;

// Animation
pub const TIME_STEP: f32 = 0.01; // nominal accumulator step per tick
pub const FLICKER_Y_FREQ: f32 = 10.0;
pub const FLICKER_Y_AMP: f32 = 0.2;
pub const FLICKER_X_FREQ: f32 = 8.0;
pub const FLICKER_X_AMP: f32 = 0.1;

// Smoke puffs
pub const SMOKE_RADIUS: f32 = 0.15;
pub const SMOKE_START_OPACITY: f32 = 0.6;
pub const SMOKE_RISE_PER_TICK: f32 = 0.02;
pub const SMOKE_GROWTH_PER_TICK: f32 = 1.02;
pub const SMOKE_FADE_PER_TICK: f32 = 0.98;
pub const SMOKE_MIN_OPACITY: f32 = 0.01;

// Camera
pub const CAMERA_FOVY_DEG: f32 = 50.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START: [f32; 3] = [0.0, 3.5, 9.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 1.5, 0.0];
pub const CAMERA_MIN_DISTANCE: f32 = 5.0;
pub const CAMERA_MAX_DISTANCE: f32 = 15.0;
pub const AUTO_ROTATE_SPEED: f32 = 0.8; // one turn per 60 s at speed 1.0 and 60 Hz

// Environment
pub const GROUND_RADIUS: f32 = 15.0;
pub const GROUND_Y: f32 = -0.5;
pub const FOG_NEAR: f32 = 10.0;
pub const FOG_FAR: f32 = 50.0;

// Blow detection
pub const BLOW_THRESHOLD: f32 = 1.5;
pub const BLOW_PROBABILITY: f64 = 0.3;
pub const STRENGTH_DIVISOR: f32 = 30.0;
pub const STRENGTH_MAX: f32 = 3.0;
pub const RMS_TO_BYTE_LEVEL: f32 = 255.0 * 4.0; // maps PCM RMS onto the analyser's byte scale
pub const STRENGTH_SMOOTHING: f32 = 0.5; // new = (1-α)*old + α*raw
pub const SAMPLER_INTERVAL_MS: i32 = 50;
pub const ANALYSER_FFT_SIZE: u32 = 256;

pub const WISH_MESSAGES: [&str; 5] = [
    "Make a wish! ✨",
    "Your wish awaits... 🌟",
    "Wishes do come true 💫",
    "Dream big today! 🎈",
    "A year of magic begins 🎊",
];
