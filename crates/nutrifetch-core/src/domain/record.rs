use serde::{Deserialize, Serialize};

use crate::{ProviderId, ValidationError};

/// Canonical nutrition record, per 100 g, regardless of originating provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub source: ProviderId,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NutritionRecord {
    /// Builds a record, rounding every nutrient to two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a blank name, or for a nutrient that is
    /// negative or not finite once rounded.
    pub fn new(
        source: ProviderId,
        name: impl Into<String>,
        calories_per_100g: f64,
        protein: f64,
        carbs: f64,
        fats: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyRecordName);
        }

        Ok(Self {
            source,
            name,
            calories_per_100g: validate_nutrient("calories_per_100g", calories_per_100g)?,
            protein: validate_nutrient("protein", protein)?,
            carbs: validate_nutrient("carbs", carbs)?,
            fats: validate_nutrient("fats", fats)?,
        })
    }
}

/// Rounds to two decimal places; `-0.0` collapses to `0.0`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn validate_nutrient(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    // Scaling by 100 overflows for values near f64::MAX.
    let rounded = round2(value);
    if !rounded.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if rounded < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_all_nutrients_to_two_decimals() {
        let record =
            NutritionRecord::new(ProviderId::Usda, "Oats", 389.456, 16.894, 66.2649, 6.9)
                .expect("record should build");

        assert_eq!(record.calories_per_100g, 389.46);
        assert_eq!(record.protein, 16.89);
        assert_eq!(record.carbs, 66.26);
        assert_eq!(record.fats, 6.9);
    }

    #[test]
    fn rejects_negative_nutrients() {
        let err = NutritionRecord::new(ProviderId::Usda, "Oats", 100.0, -1.0, 0.0, 0.0)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::NegativeValue { field: "protein" });
    }

    #[test]
    fn rejects_non_finite_nutrients() {
        let err = NutritionRecord::new(ProviderId::Usda, "Oats", f64::NAN, 0.0, 0.0, 0.0)
            .expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::NonFiniteValue {
                field: "calories_per_100g"
            }
        );
    }

    #[test]
    fn rejects_values_that_overflow_when_rounded() {
        let err = NutritionRecord::new(ProviderId::Usda, "Oats", 1e307, 0.0, 0.0, 0.0)
            .expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::NonFiniteValue {
                field: "calories_per_100g"
            }
        );
    }

    #[test]
    fn rejects_blank_names() {
        for name in ["", "   "] {
            let err = NutritionRecord::new(ProviderId::CalorieNinjas, name, 52.0, 0.3, 14.0, 0.2)
                .expect_err("must fail");
            assert_eq!(err, ValidationError::EmptyRecordName);
        }
    }

    #[test]
    fn tiny_negative_noise_rounds_to_zero() {
        let record = NutritionRecord::new(ProviderId::OpenFoodFacts, "Water", -0.001, 0.0, 0.0, 0.0)
            .expect("rounds to zero");
        assert_eq!(record.calories_per_100g, 0.0);
        assert!(record.calories_per_100g.is_sign_positive());
    }

    #[test]
    fn serializes_source_as_lowercase_id() {
        let record = NutritionRecord::new(ProviderId::CalorieNinjas, "Apple", 52.0, 0.3, 14.0, 0.2)
            .expect("record should build");
        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value["source"], "calorieninjas");
        assert_eq!(value["calories_per_100g"], 52.0);
    }
}
