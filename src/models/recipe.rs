//! # models::recipe
//!
//! Defines the static recipe: which [`Ingredient`]s a discada needs, how each
//! one is purchased, and the proportions used to scale it.
//!
//! The recipe is loaded once at startup (built-in or from `RECIPE_PATH`),
//! validated with [`Recipe::validate`], then shared read-only behind an `Arc`.
//! Nothing in the request path ever mutates it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed drift when checking that protein ratios add up to exactly 1.0.
pub const PROTEIN_RATIO_TOLERANCE: f64 = 1e-9;

/// Total mass (grams) of the reference batch the beverage counts are tied to.
pub const REFERENCE_TOTAL_GRAMS: f64 = 2937.5;

// ─── IngredientKind ───────────────────────────────────────────────────────────

/// How an ingredient is sold, and therefore how its quantity and cost scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngredientKind {
    /// Sold by weight; `ratio` is its share of the total protein mass.
    BulkByWeight { ratio: f64 },

    /// Sold in fixed-size packs of `pack_grams`; the need is rounded up to
    /// whole packs.
    PackagedUnit { ratio: f64, pack_grams: u32 },

    /// Priced by weight but bought as whole pieces of roughly `unit_grams`
    /// each (onion). `ratio` is a share of the *total* mass and is not part
    /// of the protein group.
    WholeProduce { ratio: f64, unit_grams: u32 },

    /// Cans sold in multi-can packs (six-pack of beer).
    BeveragePack { base_units: f64, units_per_pack: u32 },

    /// Cans sold individually.
    BeverageCan { base_units: f64 },
}

impl IngredientKind {
    /// Share of the protein group, for the kinds that belong to it.
    pub fn protein_ratio(&self) -> Option<f64> {
        match self {
            IngredientKind::BulkByWeight { ratio }
            | IngredientKind::PackagedUnit { ratio, .. } => Some(*ratio),
            _ => None,
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            IngredientKind::BulkByWeight { .. } => "bulk",
            IngredientKind::PackagedUnit { .. } => "packaged",
            IngredientKind::WholeProduce { .. } => "produce",
            IngredientKind::BeveragePack { .. } => "beverage-pack",
            IngredientKind::BeverageCan { .. } => "beverage-can",
        }
    }
}

// ─── Ingredient ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name, unique within the recipe.
    pub name: String,

    /// Product page URL; doubles as the cache key for its price.
    #[serde(rename = "url")]
    pub source_key: String,

    #[serde(flatten)]
    pub kind: IngredientKind,
}

impl Ingredient {
    pub fn new(name: &str, source_key: &str, kind: IngredientKind) -> Self {
        Self {
            name: name.to_string(),
            source_key: source_key.to_string(),
            kind,
        }
    }
}

// ─── Recipe ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum RecipeError {
    #[error("recipe has no ingredients")]
    Empty,

    #[error("duplicate ingredient name: {0}")]
    DuplicateName(String),

    #[error("reference batch mass must be positive, got {0}")]
    ReferenceMass(f64),

    #[error("{name}: {field} must be positive")]
    NonPositive { name: String, field: &'static str },

    #[error("{name}: ratio {ratio} is outside (0, 1]")]
    RatioOutOfRange { name: String, ratio: f64 },

    #[error("protein ratios sum to {0}, expected 1.0")]
    ProteinRatioSum(f64),
}

/// The full, immutable recipe: ingredients in output order plus the
/// reference batch size used to scale beverages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default = "default_reference_total_grams")]
    pub reference_total_grams: f64,
    pub ingredients: Vec<Ingredient>,
}

fn default_reference_total_grams() -> f64 {
    REFERENCE_TOTAL_GRAMS
}

impl Recipe {
    /// The discada norteña as sold by Alsuper: three bulk proteins, two
    /// packaged ones, onion, beer and V8 juice.
    pub fn reference() -> Self {
        use IngredientKind::*;

        Self {
            reference_total_grams: REFERENCE_TOTAL_GRAMS,
            ingredients: vec![
                Ingredient::new(
                    "Pulpa de res picada",
                    "https://alsuper.com/producto/pulpa-de-res-picada-357825",
                    BulkByWeight { ratio: 0.55 },
                ),
                Ingredient::new(
                    "Tocino picado",
                    "https://alsuper.com/producto/tocineta-413218",
                    BulkByWeight { ratio: 0.075 },
                ),
                Ingredient::new(
                    "Jamon en cuadros",
                    "https://alsuper.com/producto/jamon-de-pierna-horneado-428669",
                    BulkByWeight { ratio: 0.175 },
                ),
                Ingredient::new(
                    "Salchicha p/Asar",
                    "https://alsuper.com/producto/salchicha-para-asar-238828",
                    PackagedUnit { ratio: 0.125, pack_grams: 800 },
                ),
                Ingredient::new(
                    "Chorizo",
                    "https://alsuper.com/producto/chorizo-319544",
                    PackagedUnit { ratio: 0.075, pack_grams: 100 },
                ),
                Ingredient::new(
                    "Cebolla blanca",
                    "https://alsuper.com/producto/cebolla-blanca-924",
                    WholeProduce { ratio: 0.175, unit_grams: 150 },
                ),
                Ingredient::new(
                    "Cerveza",
                    "https://alsuper.com/producto/cerveza-six-pack-lata-323328",
                    BeveragePack { base_units: 3.125, units_per_pack: 6 },
                ),
                Ingredient::new(
                    "Jugo de verduras V8",
                    "https://alsuper.com/producto/nectar-mixto-de-450697",
                    BeverageCan { base_units: 1.0 },
                ),
            ],
        }
    }

    /// Sum of the protein-group ratios (bulk + packaged).
    pub fn protein_ratio_sum(&self) -> f64 {
        self.ingredients
            .iter()
            .filter_map(|i| i.kind.protein_ratio())
            .sum()
    }

    /// Check every startup invariant. Called once at load time so a bad
    /// recipe fails the process instead of the first request.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.ingredients.is_empty() {
            return Err(RecipeError::Empty);
        }
        if !(self.reference_total_grams > 0.0) {
            return Err(RecipeError::ReferenceMass(self.reference_total_grams));
        }

        let mut seen = HashSet::new();
        for ingredient in &self.ingredients {
            if !seen.insert(ingredient.name.as_str()) {
                return Err(RecipeError::DuplicateName(ingredient.name.clone()));
            }
            check_kind(&ingredient.name, &ingredient.kind)?;
        }

        let sum = self.protein_ratio_sum();
        if (sum - 1.0).abs() > PROTEIN_RATIO_TOLERANCE {
            return Err(RecipeError::ProteinRatioSum(sum));
        }

        Ok(())
    }
}

fn check_kind(name: &str, kind: &IngredientKind) -> Result<(), RecipeError> {
    let non_positive = |field| RecipeError::NonPositive {
        name: name.to_string(),
        field,
    };
    let check_ratio = |ratio: f64| {
        if ratio > 0.0 && ratio <= 1.0 {
            Ok(())
        } else {
            Err(RecipeError::RatioOutOfRange {
                name: name.to_string(),
                ratio,
            })
        }
    };

    match *kind {
        IngredientKind::BulkByWeight { ratio } => check_ratio(ratio),
        IngredientKind::PackagedUnit { ratio, pack_grams } => {
            check_ratio(ratio)?;
            if pack_grams == 0 {
                return Err(non_positive("pack_grams"));
            }
            Ok(())
        }
        IngredientKind::WholeProduce { ratio, unit_grams } => {
            check_ratio(ratio)?;
            if unit_grams == 0 {
                return Err(non_positive("unit_grams"));
            }
            Ok(())
        }
        IngredientKind::BeveragePack { base_units, units_per_pack } => {
            if !(base_units > 0.0) {
                return Err(non_positive("base_units"));
            }
            if units_per_pack == 0 {
                return Err(non_positive("units_per_pack"));
            }
            Ok(())
        }
        IngredientKind::BeverageCan { base_units } => {
            if !(base_units > 0.0) {
                return Err(non_positive("base_units"));
            }
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
