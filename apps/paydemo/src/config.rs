use anyhow::Context;

/// Payment demo settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub default_currency: String,
    /// Rate-limit by X-Forwarded-For instead of the peer address.
    pub trust_forwarded_for: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().context("PORT must be a number")?,
            Err(_) => 9088,
        };
        let default_currency =
            std::env::var("DEFAULT_CURRENCY").unwrap_or_else(|_| "BGN".into());
        let trust_forwarded_for = match std::env::var("TRUST_FORWARDED_FOR") {
            Ok(v) => v.parse().context("TRUST_FORWARDED_FOR must be true or false")?,
            Err(_) => false,
        };

        Ok(Self {
            host,
            port,
            default_currency,
            trust_forwarded_for,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
