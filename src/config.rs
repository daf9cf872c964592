//! # config: Environment configuration and recipe loading
//!
//! Everything here is read once at startup. A malformed value or an invalid
//! recipe aborts the process instead of surfacing on the first request.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::info;

use crate::cache::DEFAULT_TTL;
use crate::engine::fetcher::FetchPolicy;
use crate::models::Recipe;

pub const DEFAULT_SCRAPER_URL: &str = "https://discada-scraper-1.onrender.com/price";

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API listens on.
    pub bind_addr: SocketAddr,
    /// Scraper `/price` endpoint.
    pub scraper_url: String,
    /// Skip TLS certificate validation towards the scraper.
    pub accept_invalid_certs: bool,
    pub cache_ttl: Duration,
    pub fetch: FetchPolicy,
    /// JSON recipe file; `None` uses [`Recipe::reference`].
    pub recipe_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            scraper_url: DEFAULT_SCRAPER_URL.to_string(),
            accept_invalid_certs: false,
            cache_ttl: DEFAULT_TTL,
            fetch: FetchPolicy::default(),
            recipe_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = match (var("BIND_ADDR"), var("PORT")) {
            (Some(addr), _) => addr.parse::<SocketAddr>().context("BIND_ADDR must be host:port")?,
            (None, Some(port)) => {
                let port: u16 = port.parse().context("PORT must be a number")?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => defaults.bind_addr,
        };

        let max_attempts: u32 = parse_or(&var, "FETCH_ATTEMPTS", defaults.fetch.max_attempts)?;
        if max_attempts == 0 {
            bail!("FETCH_ATTEMPTS must be at least 1");
        }

        let attempt_timeout: u64 =
            parse_or(&var, "FETCH_TIMEOUT_SECS", defaults.fetch.attempt_timeout.as_secs())?;
        if attempt_timeout == 0 {
            bail!("FETCH_TIMEOUT_SECS must be at least 1");
        }

        let deadline = var("FETCH_DEADLINE_SECS")
            .map(|v| v.parse::<u64>().context("FETCH_DEADLINE_SECS must be a number"))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            bind_addr,
            scraper_url: var("SCRAPER_URL").unwrap_or(defaults.scraper_url),
            accept_invalid_certs: var("SCRAPER_ACCEPT_INVALID_CERTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            cache_ttl: Duration::from_secs(parse_or(&var, "CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?),
            fetch: FetchPolicy {
                max_attempts,
                base_delay: Duration::from_millis(parse_or(
                    &var,
                    "FETCH_BACKOFF_MS",
                    defaults.fetch.base_delay.as_millis() as u64,
                )?),
                attempt_timeout: Duration::from_secs(attempt_timeout),
                deadline,
            },
            recipe_path: var("RECIPE_PATH").map(PathBuf::from),
        })
    }

    /// Load and validate the recipe this config points at.
    pub fn load_recipe(&self) -> anyhow::Result<Recipe> {
        let recipe = match &self.recipe_path {
            Some(path) => read_recipe(path)?,
            None => Recipe::reference(),
        };

        recipe.validate().context("Invalid recipe")?;

        info!(
            ingredients = recipe.ingredients.len(),
            reference_total_grams = recipe.reference_total_grams,
            source = %self.recipe_path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "built-in".into()),
            "Recipe loaded"
        );
        Ok(recipe)
    }
}

fn read_recipe(path: &Path) -> anyhow::Result<Recipe> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse recipe file {}", path.display()))
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}
