//! Share-link payload: JSON, base64 encoded into the `config` query parameter.

use crate::constants::MAX_CANDLES;
use crate::error::{CakeError, Result};
use crate::theme::ThemeId;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use url::{form_urlencoded, Url};

pub const QUERY_KEY: &str = "config";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareConfig {
    pub candles: usize,
    /// Kept as a string so an unknown theme is reported by name.
    pub theme: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub message: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            candles: 5,
            theme: ThemeId::default().as_str().to_string(),
            recipient_name: String::new(),
            sender_name: String::new(),
            message: String::new(),
        }
    }
}

impl ShareConfig {
    pub fn new(candles: usize, theme: ThemeId) -> Self {
        Self {
            candles: clamp_candles(candles),
            theme: theme.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn theme_id(&self) -> Result<ThemeId> {
        self.theme.parse()
    }

    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a token. Accepts URL-safe (unpadded) and standard base64, the
    /// latter with `+` possibly turned into spaces by form decoding.
    pub fn decode(token: &str) -> Result<Self> {
        let token = token.trim();
        let bytes = match URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')) {
            Ok(b) => b,
            Err(_) => STANDARD.decode(token.replace(' ', "+"))?,
        };
        let mut config: ShareConfig = serde_json::from_slice(&bytes)?;
        let theme = config.theme_id()?;
        config.theme = theme.as_str().to_string();
        config.candles = clamp_candles(config.candles);
        Ok(config)
    }

    /// Find and decode the `config` parameter in a `?a=b&config=...` string.
    /// Percent escapes and `+` are form-decoded first.
    pub fn from_query(search: &str) -> Result<Self> {
        let search = search.strip_prefix('?').unwrap_or(search);
        Self::from_pairs(form_urlencoded::parse(search.as_bytes()))
    }

    /// Decode the `config` parameter of a full link.
    pub fn from_url(link: &str) -> Result<Self> {
        let link = Url::parse(link)?;
        Self::from_pairs(link.query_pairs())
    }

    fn from_pairs<'a>(
        mut pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    ) -> Result<Self> {
        pairs
            .find(|(k, _)| k == QUERY_KEY)
            .ok_or(CakeError::MissingConfig)
            .and_then(|(_, v)| Self::decode(&v))
    }

    /// Receiver link for this config: `path` resolved against `origin`, with
    /// the token appended as the `config` parameter.
    pub fn share_url(&self, origin: &str, path: &str) -> Result<String> {
        let mut link = Url::parse(origin)?.join(path)?;
        link.query_pairs_mut().append_pair(QUERY_KEY, &self.encode()?);
        Ok(link.into())
    }
}

#[inline]
pub fn clamp_candles(n: usize) -> usize {
    n.clamp(1, MAX_CANDLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_camel_case() {
        let mut c = ShareConfig::new(3, ThemeId::Modern);
        c.recipient_name = "Ada".into();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"recipientName\":\"Ada\""));
        assert!(json.contains("\"senderName\""));
    }
}
