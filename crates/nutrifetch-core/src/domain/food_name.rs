use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::matching::normalize;
use crate::ValidationError;

/// Free-text food query as typed by the caller, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FoodName(String);

impl FoodName {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyFoodName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Comparison form of the query used when scoring candidates.
    pub fn normalized(&self) -> String {
        normalize(&self.0)
    }
}

impl Display for FoodName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FoodName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for FoodName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FoodName> for String {
    fn from(value: FoodName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_but_keeps_original_casing() {
        let name = FoodName::parse("  Greek Yogurt ").expect("name should parse");
        assert_eq!(name.as_str(), "Greek Yogurt");
        assert_eq!(name.normalized(), "greek yogurt");
    }

    #[test]
    fn rejects_blank_input() {
        let err = FoodName::parse(" \t\n").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyFoodName);
    }
}
