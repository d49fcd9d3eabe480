use serde::{Deserialize, Serialize};

use crate::models::NutrientProfile;

/// A natural ingredient line in a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,

    /// Mass in kg.
    pub weight: f64,

    #[serde(default)]
    pub price_per_kg: Option<f64>,

    /// Excluded from automatic resizing and suggestion reconciliation.
    #[serde(default)]
    pub locked: bool,

    pub nutrients: NutrientProfile,
}

impl Component {
    pub fn new(name: impl Into<String>, weight: f64, nutrients: NutrientProfile) -> Self {
        Self {
            name: name.into(),
            weight,
            price_per_kg: None,
            locked: false,
            nutrients,
        }
    }

    /// Weight times price; unpriced (foraged) components cost nothing.
    pub fn cost(&self) -> f64 {
        self.weight * self.price_per_kg.unwrap_or(0.0)
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// The commercial (bulk) feed line of a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFeed {
    pub name: String,
    pub weight: f64,
    pub price_per_kg: f64,
    pub nutrients: NutrientProfile,

    /// Fraction of the total mix mass assigned when the mix was seeded.
    #[serde(default)]
    pub ratio: Option<f64>,

    /// Total target mass at seeding time.
    #[serde(default)]
    pub original_weight: Option<f64>,
}

impl BulkFeed {
    pub fn cost(&self) -> f64 {
        self.weight * self.price_per_kg
    }
}
