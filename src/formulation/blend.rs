use serde::Serialize;
use tracing::debug;

use crate::formulation::constants::{DENSITY_BASIS, sanitize};
use crate::models::{FeedingParameters, Mix, NutrientProfile, unit_of};

/// Weight-fraction average of every line's nutrient densities, per 100 mass-units.
///
/// An empty or zero-weight mix yields an all-zero profile. Zero-weight lines
/// contribute nothing.
pub fn blend_profile(mix: &Mix) -> NutrientProfile {
    let total_weight: f64 = mix.weighted_profiles().map(|(w, _)| sanitize(w)).sum();

    let mut blended = NutrientProfile::default();
    for (_, profile) in mix.weighted_profiles() {
        for name in profile.trace.keys() {
            blended.trace.entry(name.clone()).or_insert(0.0);
        }
    }

    if total_weight == 0.0 {
        return blended;
    }

    for (weight, profile) in mix.weighted_profiles() {
        let weight = sanitize(weight);
        if weight == 0.0 {
            continue;
        }
        let share = weight / total_weight;
        for (name, value) in profile.entries() {
            *blended.slot_mut(&name) += value * share;
        }
    }

    debug!(total_weight, energy = blended.energy, protein = blended.protein, "blended mix");
    blended
}

/// Per-animal daily amount of a per-100 density.
pub fn per_animal(per_100: f64, feed_per_animal: f64) -> f64 {
    per_100 * (feed_per_animal / DENSITY_BASIS)
}

/// Amount per 1000 mass-units (per kg) of a per-100 density.
pub fn per_1000(per_100: f64) -> f64 {
    per_100 * 10.0
}

/// Daily herd total of a per-100 density.
pub fn per_day(per_100: f64, total_target_mass: f64) -> f64 {
    per_1000(per_100) * total_target_mass
}

/// One nutrient of the blended mix.
///
/// Only the per-100 density is stored; the other projections are derived from
/// it and the current parameters on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendRow {
    pub name: String,
    pub unit: String,
    pub per_100: f64,
}

impl BlendRow {
    pub fn per_animal(&self, params: &FeedingParameters) -> f64 {
        per_animal(self.per_100, params.feed_per_animal)
    }

    pub fn per_1000(&self) -> f64 {
        per_1000(self.per_100)
    }

    pub fn per_day(&self, params: &FeedingParameters) -> f64 {
        per_day(self.per_100, params.total_target_mass())
    }
}

/// Tabulate a blended profile for presentation.
pub fn blend_rows(profile: &NutrientProfile) -> Vec<BlendRow> {
    profile
        .entries()
        .into_iter()
        .map(|(name, per_100)| BlendRow {
            unit: unit_of(&name).to_string(),
            name,
            per_100,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BulkFeed, Component};

    fn profile(energy: f64, protein: f64) -> NutrientProfile {
        NutrientProfile {
            energy,
            protein,
            ..Default::default()
        }
    }

    fn bulk(weight: f64, nutrients: NutrientProfile) -> BulkFeed {
        BulkFeed {
            name: "Pellets".to_string(),
            weight,
            price_per_kg: 40.0,
            nutrients,
            ratio: None,
            original_weight: None,
        }
    }

    #[test]
    fn test_empty_mix_is_all_zero() {
        let blended = blend_profile(&Mix::default());
        assert!(blended.entries().iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_zero_weight_mix_is_all_zero() {
        let mix = Mix::new(
            vec![Component::new("Corn Meal", 0.0, profile(350.0, 9.0))],
            Some(bulk(0.0, profile(320.0, 20.0))),
        );
        let blended = blend_profile(&mix);
        assert_eq!(blended.energy, 0.0);
        assert_eq!(blended.protein, 0.0);
    }

    #[test]
    fn test_weighted_average() {
        // 1 kg at 100 kcal + 3 kg at 300 kcal -> 250 kcal
        let mix = Mix::new(
            vec![Component::new("A", 1.0, profile(100.0, 4.0))],
            Some(bulk(3.0, profile(300.0, 20.0))),
        );
        let blended = blend_profile(&mix);
        assert!((blended.energy - 250.0).abs() < 1e-9);
        assert!((blended.protein - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_trace_minerals_blend_with_missing_as_zero() {
        let mut rich = profile(0.0, 0.0);
        rich.trace.insert("Iron (mg)".to_string(), 10.0);
        let mix = Mix::new(
            vec![
                Component::new("Rich", 1.0, rich),
                Component::new("Plain", 1.0, profile(0.0, 0.0)),
            ],
            None,
        );
        let blended = blend_profile(&mix);
        assert_eq!(blended.get("Iron (mg)"), Some(5.0));
    }

    #[test]
    fn test_projections() {
        let params = FeedingParameters {
            animal_count: 20,
            feed_per_animal: 150.0,
            ..Default::default()
        };
        let row = BlendRow {
            name: "Energy (kcal)".to_string(),
            unit: "kcal".to_string(),
            per_100: 280.0,
        };
        assert!((row.per_animal(&params) - 420.0).abs() < 1e-9);
        assert!((row.per_1000() - 2800.0).abs() < 1e-9);
        assert!((row.per_day(&params) - 8400.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_rows_carry_units() {
        let rows = blend_rows(&profile(280.0, 16.0));
        assert_eq!(rows[0].unit, "kcal");
        assert_eq!(rows[1].unit, "g");
    }
}
