//! Fixed expense categories and payment methods.
//!
//! The store is schemaless-by-convention on the wire, so both lists are
//! enforced here as closed enums at the repository boundary.

use serde::{Deserialize, Serialize};

use crate::StoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FoodDining,
    Transportation,
    HealthFitness,
    Entertainment,
    Utilities,
    Shopping,
    Travel,
    Education,
    Other,
}

impl Category {
    /// All categories, in the order the add-expense form offers them.
    pub const ALL: [Category; 9] = [
        Self::FoodDining,
        Self::Transportation,
        Self::HealthFitness,
        Self::Entertainment,
        Self::Utilities,
        Self::Shopping,
        Self::Travel,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FoodDining => "food_dining",
            Self::Transportation => "transportation",
            Self::HealthFitness => "health_fitness",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Shopping => "shopping",
            Self::Travel => "travel",
            Self::Education => "education",
            Self::Other => "other",
        }
    }

    /// Human-readable label, as shown by the form dropdown.
    pub fn label(self) -> &'static str {
        match self {
            Self::FoodDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::HealthFitness => "Health & Fitness",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Shopping => "Shopping",
            Self::Travel => "Travel",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = StoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "food_dining" => Ok(Self::FoodDining),
            "transportation" => Ok(Self::Transportation),
            "health_fitness" => Ok(Self::HealthFitness),
            "entertainment" => Ok(Self::Entertainment),
            "utilities" => Ok(Self::Utilities),
            "shopping" => Ok(Self::Shopping),
            "travel" => Ok(Self::Travel),
            "education" => Ok(Self::Education),
            "other" => Ok(Self::Other),
            other => Err(StoreError::Validation(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Other,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = StoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "other" => Ok(Self::Other),
            other => Err(StoreError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}
