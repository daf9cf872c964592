//! # engine::calculator
//!
//! **Proportional Calculation Engine**: pure functions from
//! (order, recipe, quotes) to a [`CalculationResult`]. No I/O, no locks.
//!
//! ## Rules per ingredient kind
//!
//! ```text
//! BulkByWeight   grams = ratio × total        cost = grams/1000 × $/kg
//! PackagedUnit   grams = ratio × total        packs = ⌈round(grams)/pack⌉   cost = packs × $/pack
//! WholeProduce   grams = ratio × total        units = ⌈round(grams)/unit⌉   cost = units×unit/1000 × $/kg
//! BeveragePack   cans  = ⌈scale × base⌉       packs = ⌈cans/per_pack⌉ (≥1 if cans>0)   cost = packs × $/pack
//! BeverageCan    cans  = ⌈scale × base⌉ (≥1 if scale>0)                  cost = cans × $/can
//!
//! scale = total / reference_total_grams
//! ```
//!
//! Every line cost is rounded to cents when computed; the total is the
//! rounded sum of the rounded lines.

use tracing::warn;

use super::pricing::{resolve_price, PriceBasis};
use crate::error::AppError;
use crate::models::{
    CalculationResult, Ingredient, IngredientKind, IngredientLine, PriceQuote, Recipe,
    DEFAULT_CURRENCY,
};

// ─── Order ────────────────────────────────────────────────────────────────────

/// A validated request: both numbers strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub servings: u32,
    pub grams_per_serving: u32,
}

impl Order {
    pub fn new(servings: i64, grams_per_serving: i64) -> Result<Self, AppError> {
        if servings <= 0 || grams_per_serving <= 0 {
            return Err(AppError::Validation(
                "servings and grams per serving must be > 0".into(),
            ));
        }

        let too_large = |field: &str| AppError::Validation(format!("{field} is too large"));
        Ok(Self {
            servings: u32::try_from(servings).map_err(|_| too_large("servings"))?,
            grams_per_serving: u32::try_from(grams_per_serving)
                .map_err(|_| too_large("grams per serving"))?,
        })
    }

    /// `servings × grams_per_serving`, computed exactly in integers.
    pub fn total_grams(&self) -> f64 {
        (u64::from(self.servings) * u64::from(self.grams_per_serving)) as f64
    }
}

// ─── Numeric helpers ──────────────────────────────────────────────────────────

/// Round to cents, half away from zero.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Ceiling division; anything ≤ 0 needs nothing.
pub fn ceil_div(n: i64, d: u64) -> u64 {
    if n <= 0 || d == 0 {
        return 0;
    }
    let n = n as u64;
    n.div_ceil(d)
}

/// Whole pieces/packs of `unit_grams` needed to cover `grams`, after rounding
/// the requirement to whole grams.
pub fn whole_units(grams: f64, unit_grams: u32) -> u64 {
    ceil_div(grams.round() as i64, u64::from(unit_grams))
}

/// `(cans, packs)` for beverages sold in multi-can packs.
pub fn beverage_pack_units(scale: f64, base_units: f64, units_per_pack: u32) -> (u64, u64) {
    let cans = (scale * base_units).ceil() as u64;
    if cans == 0 {
        return (0, 0);
    }
    let packs = cans.div_ceil(u64::from(units_per_pack.max(1))).max(1);
    (cans, packs)
}

/// Cans for beverages sold one at a time; never 0 while anything is cooked.
pub fn beverage_can_units(scale: f64, base_units: f64) -> u64 {
    let cans = (scale * base_units).ceil() as u64;
    if cans == 0 && scale > 0.0 {
        1
    } else {
        cans
    }
}

// ─── Line pricing ─────────────────────────────────────────────────────────────

/// Apply the ingredient's rule to one fetched quote.
pub fn price_line(
    ingredient: &Ingredient,
    quote: &PriceQuote,
    total_grams: f64,
    reference_total_grams: f64,
) -> IngredientLine {
    let price = resolve_price(PriceBasis::for_kind(&ingredient.kind), quote);

    let mut line = IngredientLine {
        name: ingredient.name.clone(),
        source_key: ingredient.source_key.clone(),
        grams_needed: 0.0,
        units_needed: 0,
        purchased_units: 0,
        price_per_kg: price.price_per_kg,
        unit_price: price.unit_price,
        cost: 0.0,
        currency: quote.currency.clone(),
    };

    let scale = total_grams / reference_total_grams;

    match ingredient.kind {
        IngredientKind::BulkByWeight { ratio } => {
            let grams = ratio * total_grams;
            line.grams_needed = grams;
            line.cost = round2(grams / 1000.0 * price.price_per_kg);
        }
        IngredientKind::PackagedUnit { ratio, pack_grams } => {
            let grams = ratio * total_grams;
            let packs = whole_units(grams, pack_grams);
            line.grams_needed = grams;
            line.purchased_units = packs;
            line.cost = round2(packs as f64 * price.unit_price);
        }
        IngredientKind::WholeProduce { ratio, unit_grams } => {
            let grams = ratio * total_grams;
            let units = whole_units(grams, unit_grams);
            line.grams_needed = grams;
            line.units_needed = units;
            // Priced on the weight actually bought, not the weight required.
            let bought_grams = (units * u64::from(unit_grams)) as f64;
            line.cost = round2(bought_grams / 1000.0 * price.price_per_kg);
        }
        IngredientKind::BeveragePack { base_units, units_per_pack } => {
            let (cans, packs) = beverage_pack_units(scale, base_units, units_per_pack);
            line.units_needed = cans;
            line.purchased_units = packs;
            line.cost = round2(packs as f64 * price.unit_price);
        }
        IngredientKind::BeverageCan { base_units } => {
            let cans = beverage_can_units(scale, base_units);
            line.units_needed = cans;
            line.purchased_units = cans;
            line.cost = round2(cans as f64 * price.unit_price);
        }
    }

    line
}

/// Last non-empty line currency wins; [`DEFAULT_CURRENCY`] if none.
/// Mixed currencies are logged but not rejected.
pub fn aggregate_currency(lines: &[IngredientLine]) -> String {
    let mut currency = DEFAULT_CURRENCY.to_string();
    let mut seen: Option<&str> = None;

    for line in lines.iter().filter(|l| !l.currency.is_empty()) {
        if let Some(prev) = seen {
            if prev != line.currency {
                warn!(
                    ingredient = %line.name,
                    currency = %line.currency,
                    previous = prev,
                    "Mixed currencies across ingredients, total uses the last one"
                );
            }
        }
        seen = Some(&line.currency);
        currency = line.currency.clone();
    }

    currency
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Build the full result. `quotes[i]` must belong to `recipe.ingredients[i]`.
pub fn assemble(order: Order, recipe: &Recipe, quotes: &[PriceQuote]) -> CalculationResult {
    debug_assert_eq!(recipe.ingredients.len(), quotes.len());

    let total_grams = order.total_grams();

    let lines: Vec<IngredientLine> = recipe
        .ingredients
        .iter()
        .zip(quotes)
        .map(|(ingredient, quote)| {
            price_line(ingredient, quote, total_grams, recipe.reference_total_grams)
        })
        .collect();

    let total_cost = round2(lines.iter().map(|l| l.cost).sum());
    let currency = aggregate_currency(&lines);

    CalculationResult {
        servings: order.servings,
        grams_per_serving: order.grams_per_serving,
        total_grams: round2(total_grams),
        lines,
        total_cost,
        currency,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
