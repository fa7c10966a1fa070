// cli.rs - command-line configuration
use cake_core::ShareConfig;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "cake-native")]
#[command(about = "3D birthday cake greeting", long_about = None)]
pub struct Cli {
    /// Number of candles (clamped to 1..=50)
    #[arg(long, short = 'n', default_value_t = 5)]
    pub candles: usize,

    /// elegant, classic, modern or luxury
    #[arg(long, short = 't', default_value = "elegant")]
    pub theme: String,

    /// Share-link token (the `config` query value); overrides candles and theme
    #[arg(long)]
    pub config: Option<String>,

    /// Render with the reduced quality profile
    #[arg(long)]
    pub constrained: bool,

    #[arg(long = "no-auto-rotate")]
    pub no_auto_rotate: bool,

    /// Listen to the default input device and blow with your breath
    #[arg(long)]
    pub mic: bool,

    /// Print the share token for this cake and exit
    #[arg(long = "print-token")]
    pub print_token: bool,
}

impl Cli {
    pub fn share_config(&self) -> anyhow::Result<ShareConfig> {
        match &self.config {
            Some(token) => Ok(ShareConfig::decode(token)?),
            None => Ok(ShareConfig::new(self.candles, self.theme.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cake_core::ThemeId;

    #[test]
    fn defaults_describe_five_elegant_candles() {
        let cli = Cli::parse_from(["cake-native"]);
        let config = cli.share_config().unwrap();
        assert_eq!(config.candles, 5);
        assert_eq!(config.theme_id().unwrap(), ThemeId::Elegant);
        assert!(!cli.mic && !cli.constrained && !cli.no_auto_rotate);
    }

    #[test]
    fn candle_flag_is_clamped() {
        let cli = Cli::parse_from(["cake-native", "-n", "500", "-t", "luxury"]);
        let config = cli.share_config().unwrap();
        assert_eq!(config.candles, 50);
        assert_eq!(config.theme_id().unwrap(), ThemeId::Luxury);
    }

    #[test]
    fn token_overrides_flags() {
        let token = ShareConfig::new(12, ThemeId::Modern).encode().unwrap();
        let cli = Cli::parse_from(["cake-native", "-n", "3", "--config", token.as_str()]);
        let config = cli.share_config().unwrap();
        assert_eq!(config.candles, 12);
        assert_eq!(config.theme_id().unwrap(), ThemeId::Modern);
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let cli = Cli::parse_from(["cake-native", "--theme", "neon"]);
        assert!(cli.share_config().is_err());
    }
}
