use serde::{Deserialize, Serialize};

use crate::models::{FeedMode, NutrientProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedComponent {
    pub name: String,
    pub weight: f64,
    pub price_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableComponent {
    pub name: String,
    pub price_per_kg: f64,
    pub nutrients: NutrientProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFeedSpec {
    pub name: String,
    pub price_per_kg: f64,
    pub nutrients: NutrientProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    pub name: String,
    pub target_per_100: f64,
}

/// Payload sent to an external mix solver.
///
/// Locked components are listed with their fixed weights and kept out of
/// `available_components`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub animal: String,
    pub sub_species: String,
    pub total_target_mass: f64,
    pub locked_components: Vec<LockedComponent>,
    pub available_components: Vec<AvailableComponent>,
    pub bulk_feed: BulkFeedSpec,
    pub targets: Vec<TargetSpec>,
    pub feeding_mode: FeedMode,
}
