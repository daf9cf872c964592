//! Domain models shared across the calculator.

pub mod calculation;
pub mod quote;
pub mod recipe;

pub use calculation::{CalculationResult, IngredientLine, DEFAULT_CURRENCY};
pub use quote::PriceQuote;
pub use recipe::{Ingredient, IngredientKind, Recipe};
