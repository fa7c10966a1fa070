// Pure key mapping; kept free of web-sys so host tests can include it.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Editing the cake and generating a link.
    Creator,
    /// Opened from a share link; blowing out candles.
    Receiver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    BlowOnce,
    ResetRound,
    ToggleMic,
    ToggleAutoRotate,
    NextTheme,
    MoreCandles,
    FewerCandles,
}

impl KeyAction {
    /// Whether the browser's default handling (page scroll) should be suppressed.
    #[inline]
    pub fn prevents_default(self) -> bool {
        matches!(
            self,
            KeyAction::BlowOnce | KeyAction::MoreCandles | KeyAction::FewerCandles
        )
    }
}

/// Receiver keys blow and relight; creator keys edit the cake. Auto-rotate
/// works in both modes.
pub fn key_action(key: &str, mode: Mode) -> Option<KeyAction> {
    match (key, mode) {
        (" ", Mode::Receiver) => Some(KeyAction::BlowOnce),
        ("r" | "R", Mode::Receiver) => Some(KeyAction::ResetRound),
        ("m" | "M", Mode::Receiver) => Some(KeyAction::ToggleMic),
        ("a" | "A", _) => Some(KeyAction::ToggleAutoRotate),
        ("t" | "T", Mode::Creator) => Some(KeyAction::NextTheme),
        ("ArrowUp" | "+" | "=", Mode::Creator) => Some(KeyAction::MoreCandles),
        ("ArrowDown" | "-" | "_", Mode::Creator) => Some(KeyAction::FewerCandles),
        _ => None,
    }
}

/// Candle count after a step, kept within `1..=max`.
#[inline]
pub fn stepped_count(current: usize, up: bool, max: usize) -> usize {
    if up {
        (current + 1).min(max)
    } else {
        current.saturating_sub(1).max(1)
    }
}
