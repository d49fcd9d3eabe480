use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FeedError, Result};
use crate::formulation::constants::{DEFAULT_FEED_PER_ANIMAL, sanitize};
use crate::models::{BulkFeed, Component, NutrientProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub name: String,
    pub sub_species: Vec<String>,

    /// Recommended grams of feed per animal per day, keyed by sub-species.
    #[serde(default)]
    pub recommended_feed: BTreeMap<String, f64>,
}

impl Animal {
    /// Canonical spelling of a sub-species as listed in the catalog.
    pub fn sub_species_named(&self, sub_species: &str) -> Option<&str> {
        self.sub_species
            .iter()
            .find(|s| s.eq_ignore_ascii_case(sub_species))
            .map(String::as_str)
    }

    /// Recommended feed in grams, falling back to the default when absent.
    pub fn recommended_feed(&self, sub_species: &str) -> f64 {
        self.recommended_feed
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(sub_species))
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_FEED_PER_ANIMAL)
    }
}

/// A natural ingredient available for mixing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub nutrients: NutrientProfile,

    #[serde(default)]
    pub price_per_kg: Option<f64>,
}

impl Ingredient {
    pub fn to_component(&self, weight: f64) -> Component {
        Component {
            name: self.name.clone(),
            weight,
            price_per_kg: self.price_per_kg,
            locked: false,
            nutrients: self.nutrients.clone(),
        }
    }
}

/// A pre-formulated commercial feed product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialFeed {
    pub name: String,

    /// Animals this feed is sold for.
    pub animal: Vec<String>,

    #[serde(default)]
    pub sub_species: Option<Vec<String>>,

    pub nutrients: NutrientProfile,
    pub price_per_kg: f64,
}

impl CommercialFeed {
    pub fn is_for_animal(&self, animal: &str) -> bool {
        self.animal.iter().any(|a| a.eq_ignore_ascii_case(animal))
    }

    pub fn is_for_sub_species(&self, sub_species: &str) -> bool {
        self.sub_species
            .as_ref()
            .is_some_and(|subs| subs.iter().any(|s| s.eq_ignore_ascii_case(sub_species)))
    }

    pub fn to_bulk(&self, weight: f64) -> BulkFeed {
        BulkFeed {
            name: self.name.clone(),
            weight,
            price_per_kg: self.price_per_kg,
            nutrients: self.nutrients.clone(),
            ratio: None,
            original_weight: None,
        }
    }
}

/// Target density of one nutrient per 100 g of the final mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalTarget {
    pub name: String,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Common,
    Specialty,
    Pharmacy,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Availability::Common => "common",
            Availability::Specialty => "specialty",
            Availability::Pharmacy => "pharmacy",
        };
        f.write_str(label)
    }
}

/// A mineral or vitamin supplement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplement {
    pub name: String,

    /// Nutrient content per 100 g, keyed by nutrient display name.
    pub nutrients: BTreeMap<String, f64>,

    /// Recommended grams per kg of total feed.
    pub dosage_per_kg: f64,

    pub price_per_kg: f64,
    pub availability: Availability,

    #[serde(default)]
    pub description: String,
}

impl Supplement {
    /// Whether the supplement carries a non-zero amount of the nutrient.
    pub fn supplies(&self, nutrient: &str) -> bool {
        self.nutrients.get(nutrient).is_some_and(|v| *v > 0.0)
    }
}

/// Read-only reference data the engine formulates against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub animals: Vec<Animal>,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,

    #[serde(default)]
    pub commercial_feeds: Vec<CommercialFeed>,

    /// Targets keyed by animal, then sub-species.
    #[serde(default)]
    pub targets: BTreeMap<String, BTreeMap<String, Vec<NutritionalTarget>>>,

    #[serde(default)]
    pub supplements: Vec<Supplement>,
}

impl Catalog {
    /// Get an animal by name (case-insensitive).
    pub fn animal(&self, name: &str) -> Result<&Animal> {
        self.animals
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FeedError::AnimalNotFound(name.to_string()))
    }

    /// Get a natural ingredient by name (case-insensitive).
    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn commercial_feed(&self, name: &str) -> Option<&CommercialFeed> {
        self.commercial_feeds
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Commercial feeds sold for an animal.
    pub fn feeds_for(&self, animal: &str) -> Vec<&CommercialFeed> {
        self.commercial_feeds
            .iter()
            .filter(|f| f.is_for_animal(animal))
            .collect()
    }

    /// Default commercial feed: a sub-species specific product first, then any
    /// product for the animal.
    pub fn suitable_feed(&self, animal: &str, sub_species: &str) -> Option<&CommercialFeed> {
        self.commercial_feeds
            .iter()
            .find(|f| f.is_for_animal(animal) && f.is_for_sub_species(sub_species))
            .or_else(|| self.commercial_feeds.iter().find(|f| f.is_for_animal(animal)))
    }

    /// Per-100 g targets for an animal and sub-species; empty when none are listed.
    pub fn targets_for(&self, animal: &str, sub_species: &str) -> &[NutritionalTarget] {
        self.targets
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(animal))
            .and_then(|(_, subs)| {
                subs.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(sub_species))
                    .map(|(_, targets)| targets.as_slice())
            })
            .unwrap_or(&[])
    }

    /// Drop duplicate entries by lowercase name, keeping the last occurrence.
    pub fn deduplicated(mut self) -> Self {
        self.animals = dedup_by_name(self.animals, |a| &a.name);
        self.ingredients = dedup_by_name(self.ingredients, |i| &i.name);
        self.commercial_feeds = dedup_by_name(self.commercial_feeds, |f| &f.name);
        self.supplements = dedup_by_name(self.supplements, |s| &s.name);
        self
    }

    /// Clamp negative or non-finite densities, prices and dosages to zero.
    pub fn sanitized(mut self) -> Self {
        for ingredient in &mut self.ingredients {
            let clamped = ingredient.nutrients.clamp_invalid();
            if clamped > 0 {
                warn!(ingredient = %ingredient.name, clamped, "clamped invalid nutrient densities");
            }
            ingredient.price_per_kg = ingredient.price_per_kg.map(sanitize);
        }

        for feed in &mut self.commercial_feeds {
            let clamped = feed.nutrients.clamp_invalid();
            if clamped > 0 {
                warn!(feed = %feed.name, clamped, "clamped invalid nutrient densities");
            }
            feed.price_per_kg = sanitize(feed.price_per_kg);
        }

        for supplement in &mut self.supplements {
            let mut clamped = 0;
            for value in supplement.nutrients.values_mut() {
                let fixed = sanitize(*value);
                if fixed != *value {
                    *value = fixed;
                    clamped += 1;
                }
            }
            if clamped > 0 {
                warn!(supplement = %supplement.name, clamped, "clamped invalid nutrient densities");
            }
            supplement.dosage_per_kg = sanitize(supplement.dosage_per_kg);
            supplement.price_per_kg = sanitize(supplement.price_per_kg);
        }

        self
    }
}

/// Last occurrence wins, first-seen order is kept.
fn dedup_by_name<T>(items: Vec<T>, name: impl Fn(&T) -> &String) -> Vec<T> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let key = name(&item).to_lowercase();
        match index.get(&key) {
            Some(&pos) => out[pos] = item,
            None => {
                index.insert(key, out.len());
                out.push(item);
            }
        }
    }
    out
}
