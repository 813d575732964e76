use std::collections::BTreeMap;
use std::env;
use std::fmt;

use url::Url;

use super::{ErrorKind, Result};

/// Port the bot listens on when the platform does not set `PORT`
pub const DEFAULT_PORT: u16 = 10000;

/// Route Telegram posts updates to
pub const WEBHOOK_ROUTE: &str = "/webhook";

/// Runtime configuration of the deployed bot
///
/// Derived from the environment the platform injects:
/// - `BOT_TOKEN`, falling back to `TELEGRAM_BOT_TOKEN`
/// - `WEBHOOK_URL` (optional, public base url of the service)
/// - `PORT` (defaults to 10000)
/// - `DEBUG` (`true` in any case enables it)
#[derive(Clone, Debug, PartialEq)]
pub struct BotConfig {
    /// Telegram bot token, `<id>:<secret>`
    pub token: String,
    /// Public base url of the service
    pub webhook_url: Option<Url>,
    /// Port to listen on
    pub port: u16,
    /// Debug mode
    pub debug: bool,
}

impl BotConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<BotConfig> {
        let vars: BTreeMap<String, String> = env::vars().collect();
        BotConfig::from_vars(&vars)
    }

    /// Build the configuration from an environment map
    pub fn from_vars(vars: &BTreeMap<String, String>) -> Result<BotConfig> {
        let token = ["BOT_TOKEN", "TELEGRAM_BOT_TOKEN"].iter()
            .filter_map(|k| vars.get(*k))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .ok_or(ErrorKind::MissingBotToken)?
            .to_string();
        verify_token(&token)?;

        let webhook_url = match vars.get("WEBHOOK_URL").map(|s| s.trim()) {
            Some(s) if !s.is_empty() => {
                let url = Url::parse(s)?;
                if url.scheme() != "https" {
                    warn!("Webhook URL should use https - got {}", url);
                }
                Some(url)
            }
            _ => None,
        };

        let port = match vars.get("PORT") {
            Some(p) => p.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };
        let debug = vars.get("DEBUG").map_or(false, |d| d.trim().eq_ignore_ascii_case("true"));

        let conf = BotConfig { token, webhook_url, port, debug };
        info!("Configuration validated: {}", conf);
        Ok(conf)
    }

    /// Full url Telegram should deliver updates to
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.webhook_url.as_ref().map(|u| {
            format!("{}{}", u.as_str().trim_end_matches('/'), WEBHOOK_ROUTE)
        })
    }
}

/// Tokens look like `123456:ABC-DEF`
fn verify_token(token: &str) -> Result<()> {
    let parts: Vec<_> = token.split(':').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        bail!(ErrorKind::InvalidBotToken);
    }
    Ok(())
}

// NB: never print the token
impl fmt::Display for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let url = self.webhook_url.as_ref().map(|u| u.as_str()).unwrap_or("");
        write!(f, "Config(webhook_url={}, port={}, debug={})", url, self.port, self.debug)
    }
}
