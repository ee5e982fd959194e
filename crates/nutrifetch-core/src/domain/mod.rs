//! # Domain Models
//!
//! Canonical domain types for nutrifetch.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FoodName`] | Validated free-text food query |
//! | [`NutritionRecord`] | Canonical four-nutrient record returned by every provider |
//!
//! Both types enforce their invariants at construction time, so adapters can
//! only hand the resolver records whose nutrient fields are finite,
//! non-negative and rounded to two decimals.

mod food_name;
mod record;

pub use food_name::FoodName;
pub use record::{round2, NutritionRecord};
