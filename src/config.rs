use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

use crate::consts::defaults;

/// How Telegram updates reach the bot.
#[derive(Clone, Debug)]
pub enum Delivery {
    /// Long polling; the HTTP surface only answers health probes.
    Polling,
    /// Telegram pushes updates to this externally reachable URL.
    Webhook { url: Url },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub state_file: PathBuf,
    pub delivery: Delivery,
}

impl Config {
    /// Reads everything except the bot token, which `Bot::from_env` owns.
    /// A malformed `WEBHOOK_URL` is a startup fault, not a fallback.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults::PORT);

        let state_file = std::env::var("STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(defaults::STATE_FILE));

        let delivery = match std::env::var("WEBHOOK_URL") {
            Ok(raw) => {
                let url = Url::parse(raw.trim())
                    .expect("WEBHOOK_URL must be a valid absolute URL");
                Delivery::Webhook { url }
            }
            Err(_) => Delivery::Polling,
        };

        Self { port, state_file, delivery }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_uses_configured_port() {
        let cfg = Config {
            port: 9999,
            state_file: PathBuf::from("x.json"),
            delivery: Delivery::Polling,
        };
        assert_eq!(cfg.listen_addr().port(), 9999);
    }
}
