//! # source
//!
//! The **price source** seam: anything that can turn a product identifier
//! into a [`PriceQuote`]. The production implementation is
//! [`scraper::ScraperClient`]; tests substitute `MockPriceSource`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PriceQuote;

pub mod scraper;

pub use scraper::ScraperClient;

/// Why a single lookup failed. The fetcher retries every variant the same way.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("price source unreachable: {0}")]
    Transport(reqwest::Error),

    #[error("price source returned HTTP {0}")]
    Status(u16),

    #[error("could not decode price source response: {0}")]
    Decode(String),

    #[error("no usable price in response for {0}")]
    NoPrice(String),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Look up the current price for `source_key`.
    ///
    /// A successful quote carries at least one positive price and a currency.
    async fn lookup(&self, source_key: &str) -> Result<PriceQuote, SourceError>;
}
