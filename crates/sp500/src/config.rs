use anyhow::{Context, Result};
use sp500_core::schema::{constituents::CONSTITUENTS_URL, prices::CHART_URL};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "sp500/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/Vostanis/sp500)"
);
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment (and `.env`).
///
/// | variable             | default                    |
/// |----------------------|----------------------------|
/// | `USER_AGENT`         | [`DEFAULT_USER_AGENT`]     |
/// | `SP500_TABLE_URL`    | Wikipedia constituents     |
/// | `SP500_CHART_URL`    | Yahoo Finance chart API    |
/// | `SP500_TIMEOUT_SECS` | [`DEFAULT_TIMEOUT_SECS`]   |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub user_agent: String,
    pub table_url: String,
    pub chart_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout = match lookup("SP500_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SP500_TIMEOUT_SECS is not a number of seconds: {secs}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            table_url: lookup("SP500_TABLE_URL").unwrap_or_else(|| CONSTITUENTS_URL.to_string()),
            chart_url: lookup("SP500_CHART_URL").unwrap_or_else(|| CHART_URL.to_string()),
            timeout: Duration::from_secs(timeout),
        })
    }
}
