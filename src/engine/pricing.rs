//! # engine::pricing
//!
//! Price-field resolution policy.
//!
//! The scraper reports whatever price the page shows and guesses whether it is
//! per kilogram or per piece; it guesses wrong often enough that the engine
//! never trusts the field name alone. Each ingredient kind declares a
//! [`PriceBasis`], and [`resolve_price`] turns a raw quote into exactly one
//! populated price field:
//!
//! | Basis        | Uses          | If that is missing        | Zeroes        |
//! |--------------|---------------|---------------------------|---------------|
//! | `PerKg`      | `price_per_kg`| falls back to `unit_price`| `unit_price`  |
//! | `PerUnit`    | `unit_price`  | falls back to `price_per_kg`| `price_per_kg`|
//! | `UnitOnly`   | `unit_price`  | no fallback               | `price_per_kg`|

use crate::models::{IngredientKind, PriceQuote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBasis {
    /// Bought by weight: bulk meat, onion.
    PerKg,
    /// Bought by pack: sausages, chorizo.
    PerUnit,
    /// Beverages: only a per-unit price is meaningful.
    UnitOnly,
}

impl PriceBasis {
    pub fn for_kind(kind: &IngredientKind) -> Self {
        match kind {
            IngredientKind::BulkByWeight { .. } | IngredientKind::WholeProduce { .. } => {
                PriceBasis::PerKg
            }
            IngredientKind::PackagedUnit { .. } => PriceBasis::PerUnit,
            IngredientKind::BeveragePack { .. } | IngredientKind::BeverageCan { .. } => {
                PriceBasis::UnitOnly
            }
        }
    }
}

/// The two price columns shown for a line; at most one is non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    pub price_per_kg: f64,
    pub unit_price: f64,
}

pub fn resolve_price(basis: PriceBasis, quote: &PriceQuote) -> ResolvedPrice {
    let per_kg = quote.price_per_kg.unwrap_or(0.0);
    let per_unit = quote.unit_price.unwrap_or(0.0);

    match basis {
        PriceBasis::PerKg => ResolvedPrice {
            price_per_kg: if per_kg <= 0.0 && per_unit > 0.0 { per_unit } else { per_kg },
            unit_price: 0.0,
        },
        PriceBasis::PerUnit => ResolvedPrice {
            price_per_kg: 0.0,
            unit_price: if per_unit <= 0.0 && per_kg > 0.0 { per_kg } else { per_unit },
        },
        PriceBasis::UnitOnly => ResolvedPrice {
            price_per_kg: 0.0,
            unit_price: per_unit,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::quote;

    const KEY: &str = "https://example.test/p";

    #[test]
    fn test_per_kg_uses_per_kg_and_zeroes_unit() {
        let resolved = resolve_price(PriceBasis::PerKg, &quote(KEY, Some(189.0), Some(45.0)));
        assert_eq!(resolved, ResolvedPrice { price_per_kg: 189.0, unit_price: 0.0 });
    }

    #[test]
    fn test_per_kg_falls_back_to_unit_price() {
        let resolved = resolve_price(PriceBasis::PerKg, &quote(KEY, None, Some(159.0)));
        assert_eq!(resolved, ResolvedPrice { price_per_kg: 159.0, unit_price: 0.0 });
    }

    #[test]
    fn test_per_unit_falls_back_to_per_kg() {
        let resolved = resolve_price(PriceBasis::PerUnit, &quote(KEY, Some(89.5), None));
        assert_eq!(resolved, ResolvedPrice { price_per_kg: 0.0, unit_price: 89.5 });
    }

    #[test]
    fn test_zero_price_counts_as_missing() {
        let resolved = resolve_price(PriceBasis::PerUnit, &quote(KEY, Some(18.9), Some(0.0)));
        assert_eq!(resolved.unit_price, 18.9);
    }

    #[test]
    fn test_unit_only_never_substitutes() {
        let resolved = resolve_price(PriceBasis::UnitOnly, &quote(KEY, Some(110.0), None));
        assert_eq!(resolved, ResolvedPrice { price_per_kg: 0.0, unit_price: 0.0 });
    }

    #[test]
    fn test_basis_per_kind() {
        assert_eq!(
            PriceBasis::for_kind(&IngredientKind::WholeProduce { ratio: 0.175, unit_grams: 150 }),
            PriceBasis::PerKg
        );
        assert_eq!(
            PriceBasis::for_kind(&IngredientKind::PackagedUnit { ratio: 0.1, pack_grams: 100 }),
            PriceBasis::PerUnit
        );
        assert_eq!(
            PriceBasis::for_kind(&IngredientKind::BeverageCan { base_units: 1.0 }),
            PriceBasis::UnitOnly
        );
    }
}
