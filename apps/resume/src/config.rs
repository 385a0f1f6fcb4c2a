use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_DATA_PATH: &str = "data/resume.json";
pub const DEFAULT_OUTPUT_PATH: &str = "output/resume.pdf";
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration loaded from environment variables (and `.env`).
/// Every value has a default; CLI flags override what is read here.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub render_timeout: Duration,
    pub debug: bool,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            debug: false,
            rust_log: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let render_timeout = match get("RENDER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .context("RENDER_TIMEOUT_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    bail!("RENDER_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => defaults.render_timeout,
        };

        let debug = match get("DEBUG") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("DEBUG must be a boolean flag, got '{raw}'"))?,
            None => defaults.debug,
        };

        Ok(Config {
            data_path: get("RESUME_DATA").map(PathBuf::from).unwrap_or(defaults.data_path),
            output_path: get("RESUME_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            render_timeout,
            debug,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => bail!("unrecognised flag value"),
    }
}
