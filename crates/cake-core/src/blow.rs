//! Turning microphone loudness into a blow strength and deciding which candles
//! go out.

use crate::constants::*;
use crate::lit::LitState;
use rand::Rng;

/// Strength from analyser byte frequency data: `min(mean / 30, 3)`.
pub fn strength_from_bins(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|b| *b as u32).sum();
    let mean = sum as f32 / bins.len() as f32;
    (mean / STRENGTH_DIVISOR).min(STRENGTH_MAX)
}

/// Strength from raw PCM samples in `-1..=1`, mapped onto the same scale as
/// [`strength_from_bins`].
pub fn strength_from_rms(rms: f32) -> f32 {
    (rms.max(0.0) * RMS_TO_BYTE_LEVEL / STRENGTH_DIVISOR).min(STRENGTH_MAX)
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Short UI hint for the current strength.
pub fn strength_label(strength: f32) -> &'static str {
    if strength > BLOW_THRESHOLD {
        "Strong!"
    } else if strength > 0.8 {
        "Good"
    } else {
        "Blow harder"
    }
}

/// Width of the strength bar in percent.
#[inline]
pub fn strength_bar_percent(strength: f32) -> f32 {
    (strength * 33.0).clamp(0.0, 100.0)
}

/// Exponential smoothing of raw strength samples.
#[derive(Clone, Copy, Debug)]
pub struct LoudnessMeter {
    value: f32,
    alpha: f32,
}

impl LoudnessMeter {
    pub fn new(alpha: f32) -> Self {
        Self {
            value: 0.0,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn push(&mut self, raw: f32) -> f32 {
        self.value += (raw - self.value) * self.alpha;
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

impl Default for LoudnessMeter {
    fn default() -> Self {
        Self::new(STRENGTH_SMOOTHING)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlowPolicy {
    pub threshold: f32,
    /// Chance that each lit candle goes out on a strong sample.
    pub probability: f64,
}

impl Default for BlowPolicy {
    fn default() -> Self {
        Self {
            threshold: BLOW_THRESHOLD,
            probability: BLOW_PROBABILITY,
        }
    }
}

impl BlowPolicy {
    /// Extinguish candles for one sample. Returns the number that went out.
    pub fn apply<R: Rng + ?Sized>(&self, strength: f32, lit: &mut LitState, rng: &mut R) -> usize {
        if strength <= self.threshold {
            return 0;
        }
        let p = self.probability.clamp(0.0, 1.0);
        (0..lit.len())
            .filter(|&i| lit.as_slice()[i] && rng.gen_bool(p) && lit.extinguish(i))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn bins_saturate_at_max() {
        assert_eq!(strength_from_bins(&[255; 128]), STRENGTH_MAX);
        assert_eq!(strength_from_bins(&[60; 128]), 2.0);
        assert_eq!(strength_from_bins(&[]), 0.0);
    }

    #[test]
    fn quiet_samples_never_blow() {
        let mut lit = LitState::new(10);
        let mut rng = StdRng::seed_from_u64(1);
        let policy = BlowPolicy::default();
        for _ in 0..100 {
            assert_eq!(policy.apply(BLOW_THRESHOLD, &mut lit, &mut rng), 0);
        }
        assert_eq!(lit.lit_count(), 10);
    }

    #[test]
    fn certain_policy_blows_everything() {
        let mut lit = LitState::new(7);
        let mut rng = StdRng::seed_from_u64(1);
        let policy = BlowPolicy {
            probability: 1.0,
            ..Default::default()
        };
        assert_eq!(policy.apply(3.0, &mut lit, &mut rng), 7);
        assert!(lit.all_out());
    }
}
