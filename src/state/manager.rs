use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{FeedError, Result};
use crate::formulation::constants::sanitize;
use crate::formulation::{FormulationReport, SuggestionResponse, evaluate, reconcile, seed_mix};
use crate::models::{Catalog, FeedMode, FeedingParameters, Mix, NutritionalTarget};
use crate::suggest::{
    AvailableComponent, BulkFeedSpec, LockedComponent, SuggestionOutcome, SuggestionRequest,
    SuggestionTicket, TargetSpec,
};

/// Owns the mix, feeding parameters and base targets for one animal selection.
///
/// Derived values (blend, resolved targets, gaps) are never stored; `report`
/// recomputes them from the current inputs.
pub struct FormulationSession {
    catalog: Arc<Catalog>,
    animal: String,
    sub_species: String,
    params: FeedingParameters,
    base_targets: Vec<NutritionalTarget>,
    mix: Mix,
}

impl FormulationSession {
    /// Start a session for an animal and sub-species with default herd parameters.
    pub fn new(catalog: Arc<Catalog>, animal: &str, sub_species: &str) -> Result<Self> {
        Self::with_params(catalog, animal, sub_species, FeedingParameters::default())
    }

    /// Start a session keeping the given herd parameters. The feed per animal
    /// is replaced by the catalog recommendation.
    pub fn with_params(
        catalog: Arc<Catalog>,
        animal: &str,
        sub_species: &str,
        params: FeedingParameters,
    ) -> Result<Self> {
        let mut session = Self {
            catalog,
            animal: String::new(),
            sub_species: String::new(),
            params,
            base_targets: Vec::new(),
            mix: Mix::default(),
        };
        session.select(animal, sub_species)?;
        Ok(session)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn animal(&self) -> &str {
        &self.animal
    }

    pub fn sub_species(&self) -> &str {
        &self.sub_species
    }

    pub fn params(&self) -> &FeedingParameters {
        &self.params
    }

    pub fn mix(&self) -> &Mix {
        &self.mix
    }

    pub fn base_targets(&self) -> &[NutritionalTarget] {
        &self.base_targets
    }

    pub fn total_target_mass(&self) -> f64 {
        self.params.total_target_mass()
    }

    /// Switch animal, taking its first sub-species.
    pub fn select_animal(&mut self, animal: &str) -> Result<()> {
        let first = self
            .catalog
            .animal(animal)?
            .sub_species
            .first()
            .cloned()
            .ok_or_else(|| FeedError::SubSpeciesNotFound {
                animal: animal.to_string(),
                sub_species: String::new(),
            })?;
        self.select(animal, &first)
    }

    pub fn select_sub_species(&mut self, sub_species: &str) -> Result<()> {
        let animal = self.animal.clone();
        self.select(&animal, sub_species)
    }

    fn select(&mut self, animal: &str, sub_species: &str) -> Result<()> {
        let entry = self.catalog.animal(animal)?;
        let sub = entry
            .sub_species_named(sub_species)
            .ok_or_else(|| FeedError::SubSpeciesNotFound {
                animal: entry.name.clone(),
                sub_species: sub_species.to_string(),
            })?
            .to_string();

        self.params.feed_per_animal = entry.recommended_feed(&sub);
        self.animal = entry.name.clone();
        self.sub_species = sub;
        self.base_targets = self
            .catalog
            .targets_for(&self.animal, &self.sub_species)
            .to_vec();

        info!(
            animal = %self.animal,
            sub_species = %self.sub_species,
            feed_per_animal = self.params.feed_per_animal,
            "selected animal"
        );
        self.reseed();
        Ok(())
    }

    /// Replace the mix with a freshly seeded one for the current selection
    /// and total target mass.
    pub fn reseed(&mut self) {
        let total = self.total_target_mass();
        self.mix = match self.catalog.suitable_feed(&self.animal, &self.sub_species) {
            Some(feed) => seed_mix(&self.catalog, &self.base_targets, feed, total),
            None => {
                warn!(animal = %self.animal, sub_species = %self.sub_species, "no commercial feed for selection");
                Mix::default()
            }
        };
    }

    /// Changes total mass, so the mix is reseeded.
    pub fn set_animal_count(&mut self, count: u32) {
        self.params.animal_count = count;
        self.reseed();
    }

    /// Changes total mass, so the mix is reseeded.
    pub fn set_daily_scaling(&mut self, scaling: f64) {
        self.params.daily_scaling = sanitize(scaling);
        self.reseed();
    }

    /// Changes total mass; natural weights are kept and the commercial feed
    /// absorbs the difference.
    pub fn set_feed_per_animal(&mut self, grams: f64) {
        self.params.feed_per_animal = sanitize(grams);
        let total = self.total_target_mass();
        self.mix.rebalance_bulk(total);
    }

    pub fn set_mode(&mut self, mode: FeedMode) {
        self.params.mode = mode;
    }

    pub fn set_feedings_per_day(&mut self, feedings: u32) {
        self.params.feedings_per_day = feedings;
    }

    /// Add a catalog ingredient at zero weight.
    ///
    /// Returns `false` when it is already in the mix.
    pub fn add_ingredient(&mut self, name: &str) -> Result<bool> {
        if self.mix.contains(name) {
            return Ok(false);
        }
        let ingredient = self
            .catalog
            .ingredient(name)
            .ok_or_else(|| FeedError::IngredientNotFound(name.to_string()))?;
        self.mix.natural.push(ingredient.to_component(0.0));
        debug!(ingredient = %ingredient.name, "added ingredient");
        Ok(true)
    }

    /// Remove an ingredient; its weight goes back to the commercial feed.
    pub fn remove_ingredient(&mut self, name: &str) -> Result<()> {
        let key = name.to_lowercase();
        let index = self
            .mix
            .natural
            .iter()
            .position(|c| c.key() == key)
            .ok_or_else(|| FeedError::IngredientNotFound(name.to_string()))?;

        let removed = self.mix.natural.remove(index);
        if let Some(bulk) = self.mix.bulk.as_mut() {
            bulk.weight += removed.weight;
        }
        Ok(())
    }

    /// Set an ingredient's weight and let the commercial feed absorb the difference.
    pub fn set_ingredient_weight(&mut self, name: &str, weight: f64) -> Result<()> {
        let component = self
            .mix
            .component_mut(name)
            .ok_or_else(|| FeedError::IngredientNotFound(name.to_string()))?;
        component.weight = sanitize(weight);

        let total = self.total_target_mass();
        self.mix.rebalance_bulk(total);
        Ok(())
    }

    pub fn set_ingredient_price(&mut self, name: &str, price: f64) -> Result<()> {
        let component = self
            .mix
            .component_mut(name)
            .ok_or_else(|| FeedError::IngredientNotFound(name.to_string()))?;
        component.price_per_kg = Some(sanitize(price));
        Ok(())
    }

    /// Flip the lock on an ingredient, returning the new state.
    pub fn toggle_lock(&mut self, name: &str) -> Result<bool> {
        let component = self
            .mix
            .component_mut(name)
            .ok_or_else(|| FeedError::IngredientNotFound(name.to_string()))?;
        component.locked = !component.locked;
        Ok(component.locked)
    }

    pub fn set_bulk_price(&mut self, price: f64) -> Result<()> {
        let bulk = self.mix.bulk.as_mut().ok_or(FeedError::NoBulkFeed)?;
        bulk.price_per_kg = sanitize(price);
        Ok(())
    }

    /// Swap the commercial feed product, keeping its current weight.
    pub fn change_bulk_feed(&mut self, name: &str) -> Result<()> {
        let feed = self
            .catalog
            .commercial_feed(name)
            .ok_or_else(|| FeedError::FeedNotFound(name.to_string()))?;
        let current = self.mix.bulk.as_ref().ok_or(FeedError::NoBulkFeed)?;

        let mut next = feed.to_bulk(current.weight);
        next.original_weight = current.original_weight;
        self.mix.bulk = Some(next);
        Ok(())
    }

    /// All commercial feed, no natural ingredients.
    pub fn reset_mix(&mut self) {
        let total = self.total_target_mass();
        if let Some(bulk) = self.mix.bulk.as_mut() {
            bulk.weight = total;
        }
        self.mix.natural.clear();
    }

    /// Replace the whole mix, e.g. with a loaded snapshot.
    pub fn replace_mix(&mut self, mix: Mix) {
        self.mix = mix;
    }

    pub fn report(&self) -> FormulationReport {
        evaluate(
            &self.mix,
            &self.params,
            &self.base_targets,
            &self.catalog.supplements,
        )
    }

    /// Request payload for an external mix solver.
    pub fn suggestion_request(&self) -> Result<SuggestionRequest> {
        let bulk = self.mix.bulk.as_ref().ok_or(FeedError::NoBulkFeed)?;
        if self.mix.natural.is_empty() {
            return Err(FeedError::InvalidInput(
                "add at least one natural ingredient before requesting a suggestion".to_string(),
            ));
        }

        let locked_components = self
            .mix
            .natural
            .iter()
            .filter(|c| c.locked)
            .map(|c| LockedComponent {
                name: c.name.clone(),
                weight: c.weight,
                price_per_kg: c.price_per_kg.unwrap_or(0.0),
            })
            .collect();

        let available_components = self
            .mix
            .natural
            .iter()
            .filter(|c| !c.locked)
            .map(|c| AvailableComponent {
                name: c.name.clone(),
                price_per_kg: c.price_per_kg.unwrap_or(0.0),
                nutrients: c.nutrients.clone(),
            })
            .collect();

        Ok(SuggestionRequest {
            animal: self.animal.clone(),
            sub_species: self.sub_species.clone(),
            total_target_mass: self.total_target_mass(),
            locked_components,
            available_components,
            bulk_feed: BulkFeedSpec {
                name: bulk.name.clone(),
                price_per_kg: bulk.price_per_kg,
                nutrients: bulk.nutrients.clone(),
            },
            targets: self
                .base_targets
                .iter()
                .map(|t| TargetSpec {
                    name: t.name.clone(),
                    target_per_100: t.target,
                })
                .collect(),
            feeding_mode: self.params.mode,
        })
    }

    /// Apply a validated suggestion if its ticket is still the latest.
    ///
    /// The mix is replaced in one step; on error or supersession it is unchanged.
    pub fn apply_suggestion(
        &mut self,
        ticket: &SuggestionTicket,
        response: &SuggestionResponse,
    ) -> Result<SuggestionOutcome<()>> {
        if !ticket.is_current() {
            warn!(generation = ticket.generation(), "not applying superseded suggestion");
            return Ok(SuggestionOutcome::Superseded);
        }
        self.mix = reconcile(&self.mix, response, self.total_target_mass())?;
        Ok(SuggestionOutcome::Ready(()))
    }
}
