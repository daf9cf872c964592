//! # models::quote
//!
//! Defines [`PriceQuote`], the structured result of one price lookup.

use serde::{Deserialize, Serialize};

/// A price reported by the price source for a single product page.
///
/// The source cannot always tell whether the visible price is per kilogram or
/// per piece, so both fields are optional. The calculation engine decides
/// which one to trust from the ingredient's kind, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Product URL the quote was fetched for (also the cache key).
    pub source_key: String,

    pub product_name: Option<String>,

    /// Price per kilogram, for produce and meat sold by weight.
    pub price_per_kg: Option<f64>,

    /// Price per piece / pack / six-pack / can.
    pub unit_price: Option<f64>,

    /// ISO currency code, e.g. `"MXN"`. May be empty.
    pub currency: String,

    /// Unit the page displayed the price in (`"kg"`, `"paquete"`, ...).
    /// Informational only.
    pub raw_unit: Option<String>,
}

impl PriceQuote {
    /// `true` when at least one of the two price fields carries a usable value.
    pub fn has_price(&self) -> bool {
        let positive = |p: Option<f64>| p.is_some_and(|v| v > 0.0);
        positive(self.price_per_kg) || positive(self.unit_price)
    }
}
