use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::formulation::constants::{
    DEFAULT_ANIMAL_COUNT, DEFAULT_DAILY_SCALING, DEFAULT_FEED_PER_ANIMAL, MASS_CONVERSION,
};

/// How the mix is prepared before feeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum FeedMode {
    #[default]
    Direct,
    Fermentation,
}

/// Herd-level feeding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingParameters {
    pub animal_count: u32,

    /// Grams of feed per animal per day.
    pub feed_per_animal: f64,

    pub daily_scaling: f64,
    pub mode: FeedMode,
    pub feedings_per_day: u32,
}

impl Default for FeedingParameters {
    fn default() -> Self {
        Self {
            animal_count: DEFAULT_ANIMAL_COUNT,
            feed_per_animal: DEFAULT_FEED_PER_ANIMAL,
            daily_scaling: DEFAULT_DAILY_SCALING,
            mode: FeedMode::Direct,
            feedings_per_day: 1,
        }
    }
}

impl FeedingParameters {
    /// Total mix mass in kg: `count * grams per animal * scaling / 1000`.
    pub fn total_target_mass(&self) -> f64 {
        self.animal_count as f64 * self.feed_per_animal * self.daily_scaling / MASS_CONVERSION
    }

    /// Mass of a single feeding in kg.
    pub fn mass_per_feeding(&self) -> f64 {
        if self.feedings_per_day == 0 {
            return 0.0;
        }
        self.total_target_mass() / self.feedings_per_day as f64
    }
}
