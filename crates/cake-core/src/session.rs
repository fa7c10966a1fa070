use crate::blow::{BlowPolicy, LoudnessMeter};
use crate::constants::{STRENGTH_MAX, WISH_MESSAGES};
use crate::lit::LitState;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Some candles went out; others are still lit.
    Extinguished { count: usize, remaining: usize },
    /// Every candle is out. Emitted once per round.
    AllOut { wish: &'static str },
}

/// One receiver round: lit flags, blow policy and the celebration latch.
pub struct BlowSession {
    lit: LitState,
    policy: BlowPolicy,
    meter: LoudnessMeter,
    rng: StdRng,
    listening: bool,
    celebrated: bool,
}

impl BlowSession {
    pub fn new(candle_count: usize) -> Self {
        Self::with_rng(candle_count, StdRng::from_entropy())
    }

    pub fn with_seed(candle_count: usize, seed: u64) -> Self {
        Self::with_rng(candle_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(candle_count: usize, rng: StdRng) -> Self {
        Self {
            lit: LitState::new(candle_count),
            policy: BlowPolicy::default(),
            meter: LoudnessMeter::default(),
            rng,
            listening: false,
            celebrated: false,
        }
    }

    pub fn with_policy(mut self, policy: BlowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn start_listening(&mut self) {
        if !self.celebrated {
            self.listening = true;
            self.meter.reset();
        }
    }

    pub fn stop_listening(&mut self) {
        self.listening = false;
        self.meter.reset();
    }

    #[inline]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Feed one raw sampler reading. Ignored unless listening.
    pub fn on_strength(&mut self, raw: f32) -> Option<SessionEvent> {
        if !self.listening {
            return None;
        }
        let smoothed = self.meter.push(raw);
        self.blow(smoothed)
    }

    /// Simulated full-strength blow (button or key), independent of the mic.
    pub fn blow_once(&mut self) -> Option<SessionEvent> {
        self.blow(STRENGTH_MAX)
    }

    fn blow(&mut self, strength: f32) -> Option<SessionEvent> {
        if self.celebrated {
            return None;
        }
        let count = self.policy.apply(strength, &mut self.lit, &mut self.rng);
        if count == 0 {
            return None;
        }
        if self.lit.all_out() {
            self.celebrated = true;
            self.listening = false;
            let wish = WISH_MESSAGES[self.rng.gen_range(0..WISH_MESSAGES.len())];
            log::info!("[session] all candles out");
            return Some(SessionEvent::AllOut { wish });
        }
        Some(SessionEvent::Extinguished {
            count,
            remaining: self.lit.lit_count(),
        })
    }

    /// Relight every candle and start a new round.
    pub fn reset(&mut self) {
        let n = self.lit.len();
        self.lit.reset(n);
        self.celebrated = false;
        self.meter.reset();
    }

    /// New candle count; relights everything.
    pub fn set_candle_count(&mut self, count: usize) {
        self.lit.reset(count);
        self.celebrated = false;
        self.meter.reset();
    }

    #[inline]
    pub fn lit(&self) -> &LitState {
        &self.lit
    }
    #[inline]
    pub fn celebrated(&self) -> bool {
        self.celebrated
    }
    #[inline]
    pub fn strength(&self) -> f32 {
        self.meter.value()
    }
}
