/// Per-candle lit flags, index-aligned with the candle arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LitState {
    lit: Vec<bool>,
}

impl LitState {
    /// All candles lit. Panics when `count` is zero.
    pub fn new(count: usize) -> Self {
        assert!(count >= 1, "candle count must be at least 1");
        Self {
            lit: vec![true; count],
        }
    }

    /// Relight everything, resizing to `count`.
    pub fn reset(&mut self, count: usize) {
        assert!(count >= 1, "candle count must be at least 1");
        self.lit.clear();
        self.lit.resize(count, true);
    }

    /// Returns true if the candle was lit before the call.
    pub fn extinguish(&mut self, index: usize) -> bool {
        match self.lit.get_mut(index) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lit.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }
    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|l| **l).count()
    }
    pub fn blown_count(&self) -> usize {
        self.len() - self.lit_count()
    }
    pub fn all_out(&self) -> bool {
        !self.lit.iter().any(|l| *l)
    }
    /// Percentage of candles blown out, rounded.
    pub fn progress_percent(&self) -> u32 {
        ((self.blown_count() as f32 / self.len() as f32) * 100.0).round() as u32
    }
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.lit
    }
}

impl From<Vec<bool>> for LitState {
    fn from(lit: Vec<bool>) -> Self {
        assert!(!lit.is_empty(), "candle count must be at least 1");
        Self { lit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_relights_and_resizes() {
        let mut s = LitState::new(3);
        assert!(s.extinguish(1));
        assert!(!s.extinguish(1));
        assert_eq!(s.lit_count(), 2);
        s.reset(5);
        assert_eq!(s.as_slice(), &[true; 5]);
    }

    #[test]
    fn progress_counts_blown_candles() {
        let mut s = LitState::new(4);
        s.extinguish(0);
        assert_eq!(s.progress_percent(), 25);
        for i in 1..4 {
            s.extinguish(i);
        }
        assert!(s.all_out());
    }
}
