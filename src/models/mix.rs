use serde::{Deserialize, Serialize};

use crate::models::{BulkFeed, Component, NutrientProfile};

/// Ordered natural components plus at most one commercial feed.
///
/// Balanced when the weights sum to the total target mass. That equality is
/// restored by seeding, editing helpers and reconciliation, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mix {
    pub natural: Vec<Component>,

    #[serde(default)]
    pub bulk: Option<BulkFeed>,
}

impl Mix {
    pub fn new(natural: Vec<Component>, bulk: Option<BulkFeed>) -> Self {
        Self { natural, bulk }
    }

    /// Sum of natural component weights, locked ones included.
    pub fn natural_weight(&self) -> f64 {
        self.natural.iter().map(|c| c.weight).sum()
    }

    pub fn bulk_weight(&self) -> f64 {
        self.bulk.as_ref().map(|b| b.weight).unwrap_or(0.0)
    }

    pub fn total_weight(&self) -> f64 {
        self.natural_weight() + self.bulk_weight()
    }

    /// Every line of the mix as `(weight, profile)`.
    pub fn weighted_profiles(&self) -> impl Iterator<Item = (f64, &NutrientProfile)> {
        self.natural
            .iter()
            .map(|c| (c.weight, &c.nutrients))
            .chain(self.bulk.iter().map(|b| (b.weight, &b.nutrients)))
    }

    /// Find a natural component by name (case-insensitive).
    pub fn component(&self, name: &str) -> Option<&Component> {
        let key = name.to_lowercase();
        self.natural.iter().find(|c| c.key() == key)
    }

    pub fn component_mut(&mut self, name: &str) -> Option<&mut Component> {
        let key = name.to_lowercase();
        self.natural.iter_mut().find(|c| c.key() == key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    pub fn natural_cost(&self) -> f64 {
        self.natural.iter().map(Component::cost).sum()
    }

    pub fn bulk_cost(&self) -> f64 {
        self.bulk.as_ref().map(BulkFeed::cost).unwrap_or(0.0)
    }

    /// Set the bulk feed to whatever mass the natural components leave over.
    pub fn rebalance_bulk(&mut self, total_target_mass: f64) {
        let natural = self.natural_weight();
        if let Some(bulk) = self.bulk.as_mut() {
            bulk.weight = (total_target_mass - natural).max(0.0);
        }
    }
}
