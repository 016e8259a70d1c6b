use anyhow::Context;
use chrono::NaiveTime;
use std::path::PathBuf;

use crate::slots::DailyWindow;

/// Bot settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub bot_username: String,
    pub pay_base_url: String,
    pub data_file: PathBuf,
    pub currency: String,
    pub window: DailyWindow,
    pub days_ahead: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bot_token = std::env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        let bot_username = std::env::var("BOT_USERNAME").unwrap_or_else(|_| "your_bot".into());
        let pay_base_url = std::env::var("PUBLIC_PAY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:9088".into());
        let data_file = std::env::var("DATA_FILE").unwrap_or_else(|_| "data.json".into());
        let currency = std::env::var("CURRENCY").unwrap_or_else(|_| "BGN".into());

        let defaults = DailyWindow::default();
        let window = DailyWindow {
            open: time_var("OPEN_TIME", defaults.open)?,
            close: time_var("CLOSE_TIME", defaults.close)?,
        };
        if window.open >= window.close {
            tracing::warn!("OPEN_TIME is not before CLOSE_TIME — no slots will be offered");
        }

        let days_ahead = match std::env::var("DAYS_AHEAD") {
            Ok(v) => v.parse().context("DAYS_AHEAD must be a number")?,
            Err(_) => 7,
        };

        Ok(Self {
            bot_token,
            bot_username,
            pay_base_url,
            data_file: data_file.into(),
            currency,
            window,
            days_ahead,
        })
    }
}

fn time_var(name: &str, default: NaiveTime) -> anyhow::Result<NaiveTime> {
    match std::env::var(name) {
        Ok(v) => NaiveTime::parse_from_str(&v, "%H:%M")
            .with_context(|| format!("{} must be HH:MM, got {:?}", name, v)),
        Err(_) => Ok(default),
    }
}
