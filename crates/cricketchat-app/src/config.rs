use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

/// Resolved client configuration passed to setup code
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub history_limit: usize,
    pub timeout: Duration,
    pub anonymous: bool,
    pub transcript: bool,
}

impl ClientConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => cricketchat_logging::get_cricketchat_dir()?,
        };
        Self::new(cli, data_dir)
    }

    fn new(cli: &Cli, data_dir: PathBuf) -> Result<Self> {
        if cli.history_limit == 0 {
            bail!("--history-limit must be at least 1");
        }
        if cli.timeout_secs == 0 {
            bail!("--timeout-secs must be at least 1");
        }

        Ok(Self {
            api_url: normalize_api_url(&cli.api_url)?,
            data_dir,
            history_limit: cli.history_limit,
            timeout: Duration::from_secs(cli.timeout_secs),
            anonymous: cli.anonymous,
            transcript: cli.transcript,
        })
    }

    /// Directory backing the key-value store
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

/// Trim whitespace and trailing slashes; the URL must be http(s)
pub fn normalize_api_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("API URL must start with http:// or https://, got '{}'", url);
    }
    Ok(url.to_string())
}
