use thiserror::Error;

/// Recoverable failures surfaced by the core.
///
/// Contract violations (zero candles, lit-state length mismatch, building in
/// the wrong lifecycle state) are not represented here; they panic.
#[derive(Debug, Error)]
pub enum CakeError {
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
    #[error("share token is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("share token is not a valid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("share link has no `config` parameter")]
    MissingConfig,
    #[error("share link is not a valid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, CakeError>;
