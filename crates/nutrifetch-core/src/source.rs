use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical provider identifiers, declared in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    CalorieNinjas,
    Usda,
    OpenFoodFacts,
}

impl ProviderId {
    pub const ALL: [Self; 3] = [Self::CalorieNinjas, Self::Usda, Self::OpenFoodFacts];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalorieNinjas => "calorieninjas",
            Self::Usda => "usda",
            Self::OpenFoodFacts => "openfoodfacts",
        }
    }

    /// Human-readable provider label.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CalorieNinjas => "CalorieNinjas",
            Self::Usda => "USDA FoodData Central",
            Self::OpenFoodFacts => "Open Food Facts",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calorieninjas" => Ok(Self::CalorieNinjas),
            "usda" => Ok(Self::Usda),
            "openfoodfacts" => Ok(Self::OpenFoodFacts),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
