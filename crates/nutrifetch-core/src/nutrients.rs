//! Nutrient lookup over provider nutrient lists.
//!
//! Providers report nutrients inconsistently across food types, so a missing
//! nutrient is not an error: [`extract_nutrient`] degrades to `0.0`.

use serde::Deserialize;

/// Kilocalories per kilojoule.
pub const KCAL_PER_KJ: f64 = 0.239006;

pub const ENERGY: &str = "Energy";
pub const PROTEIN: &str = "Protein";
pub const CARBOHYDRATE: &str = "Carbohydrate, by difference";
pub const TOTAL_FAT: &str = "Total lipid (fat)";

pub const UNIT_KCAL: &str = "KCAL";
pub const UNIT_KJ: &str = "KJ";
pub const UNIT_GRAM: &str = "G";

/// One `{name, value, unit}` nutrient row.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientEntry {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

impl NutrientEntry {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }
}

/// Returns the value of the first row named `nutrient_name` whose unit is
/// compatible with `unit`.
///
/// Without a requested unit the first matching row wins. A `KJ` row
/// satisfies a `KCAL` request after conversion. Rows with any other unit are
/// skipped and scanning continues.
pub fn extract_nutrient(entries: &[NutrientEntry], nutrient_name: &str, unit: Option<&str>) -> f64 {
    let requested = unit.map(str::to_ascii_uppercase);

    for entry in entries.iter().filter(|entry| entry.name == nutrient_name) {
        let entry_unit = entry.unit.to_ascii_uppercase();
        match requested.as_deref() {
            None => return entry.value,
            Some(requested) if requested == entry_unit => return entry.value,
            Some(UNIT_KCAL) if entry_unit == UNIT_KJ => return entry.value * KCAL_PER_KJ,
            Some(_) => {}
        }
    }

    0.0
}

/// USDA nutrient row in either the flat search shape or the nested detail shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawFoodNutrient {
    #[serde(rename = "nutrientName", default)]
    nutrient_name: Option<String>,
    #[serde(rename = "unitName", default)]
    unit_name: Option<String>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    nutrient: Option<RawNutrientInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawNutrientInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "unitName", default)]
    unit_name: Option<String>,
}

impl RawFoodNutrient {
    fn into_entry(self) -> Option<NutrientEntry> {
        let RawFoodNutrient {
            nutrient_name,
            unit_name,
            value,
            amount,
            nutrient,
        } = self;
        let info = nutrient.unwrap_or_default();

        let name = nutrient_name.or(info.name)?;
        let unit = unit_name.or(info.unit_name).unwrap_or_default();
        let value = value.or(amount).unwrap_or(0.0);

        Some(NutrientEntry { name, value, unit })
    }
}

pub(crate) fn collect_entries(raw: Vec<RawFoodNutrient>) -> Vec<NutrientEntry> {
    raw.into_iter().filter_map(RawFoodNutrient::into_entry).collect()
}
