//! # models::calculation
//!
//! Output types of the calculation engine. Field names on the wire are kept
//! compatible with the JSON the frontend already consumes (`personas`,
//! `gramos_por_persona`, `items`, ...).

use serde::Serialize;

/// Currency reported when no line carries one.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// One row of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientLine {
    pub name: String,

    #[serde(rename = "url")]
    pub source_key: String,

    /// Mass the recipe calls for (0 for beverages).
    pub grams_needed: f64,

    /// Display quantity: onions or cans needed.
    pub units_needed: u64,

    /// What actually goes in the cart: packs, six-packs or cans.
    pub purchased_units: u64,

    /// Exactly one of `price_per_kg` / `unit_price` is non-zero once the
    /// engine has resolved the ingredient's pricing basis.
    pub price_per_kg: f64,
    pub unit_price: f64,

    /// Line cost, already rounded to cents.
    pub cost: f64,

    pub currency: String,
}

/// Complete answer for one (servings, grams per serving) request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    #[serde(rename = "personas")]
    pub servings: u32,

    #[serde(rename = "gramos_por_persona")]
    pub grams_per_serving: u32,

    pub total_grams: f64,

    /// Lines in recipe declaration order.
    #[serde(rename = "items")]
    pub lines: Vec<IngredientLine>,

    pub total_cost: f64,

    pub currency: String,
}
