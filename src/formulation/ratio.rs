use serde::Serialize;
use tracing::{info, warn};

use crate::formulation::constants::*;
use crate::models::nutrient::{ENERGY, PROTEIN};
use crate::models::{Catalog, CommercialFeed, Mix, NutrientProfile, NutritionalTarget};

/// Proposed split of the total mass between commercial feed and fillers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommercialSeed {
    /// Clamped commercial-feed fraction of the total mass.
    pub ratio: f64,

    /// Commercial feed mass in kg, rounded to 2 decimals.
    pub bulk_weight: f64,

    /// Natural filler ingredients and their masses.
    pub fillers: Vec<(String, f64)>,
}

/// One-dimensional mixing ratio: the bulk share that hits `target` when the
/// rest of the mix has the filler density.
fn mixing_ratio(target: f64, bulk: f64, filler: f64) -> Option<f64> {
    let denominator = bulk - filler;
    if denominator.abs() < DEGENERATE_EPSILON {
        return None;
    }
    Some((target - filler) / denominator)
}

fn target_density(targets: &[NutritionalTarget], name: &str, fallback: f64) -> f64 {
    targets
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.target)
        .unwrap_or(fallback)
}

/// Commercial-feed fraction satisfying the stricter of the energy and protein
/// constraints, clamped to `[RATIO_FLOOR, RATIO_CEILING]`.
///
/// A bulk density equal to the filler baseline falls back to 100% bulk feed.
pub fn solve_ratio(target_energy: f64, target_protein: f64, bulk: &NutrientProfile) -> f64 {
    let energy = mixing_ratio(target_energy, bulk.energy, FILLER_ENERGY);
    let protein = mixing_ratio(target_protein, bulk.protein, FILLER_PROTEIN);

    let ratio = match (energy, protein) {
        (Some(e), Some(p)) if e.is_finite() && p.is_finite() => e.min(p),
        _ => {
            warn!(
                bulk_energy = bulk.energy,
                bulk_protein = bulk.protein,
                "degenerate commercial feed density, using 100% bulk feed"
            );
            RATIO_CEILING
        }
    };

    ratio.clamp(RATIO_FLOOR, RATIO_CEILING)
}

/// Size the commercial feed and the two fixed fillers for a total mass.
pub fn plan_commercial_seed(
    targets: &[NutritionalTarget],
    bulk: &NutrientProfile,
    total_target_mass: f64,
) -> CommercialSeed {
    let target_energy = target_density(targets, ENERGY, FALLBACK_TARGET_ENERGY);
    let target_protein = target_density(targets, PROTEIN, FALLBACK_TARGET_PROTEIN);

    let ratio = solve_ratio(target_energy, target_protein, bulk);
    let bulk_weight = round_to(total_target_mass * ratio, 2);

    let fillers = if ratio < NATURAL_FILL_THRESHOLD {
        let remainder = (total_target_mass - bulk_weight).max(0.0);
        vec![
            (PRIMARY_FILLER.to_string(), remainder * PRIMARY_FILLER_SHARE),
            (
                SECONDARY_FILLER.to_string(),
                remainder * (1.0 - PRIMARY_FILLER_SHARE),
            ),
        ]
    } else {
        Vec::new()
    };

    CommercialSeed {
        ratio,
        bulk_weight,
        fillers,
    }
}

/// Build the initial mix for a commercial feed.
///
/// Fillers missing from the catalog hand their share back to the commercial
/// feed so the mix still sums to the total mass.
pub fn seed_mix(
    catalog: &Catalog,
    targets: &[NutritionalTarget],
    feed: &CommercialFeed,
    total_target_mass: f64,
) -> Mix {
    let seed = plan_commercial_seed(targets, &feed.nutrients, total_target_mass);

    let mut bulk_weight = seed.bulk_weight;
    let mut natural = Vec::with_capacity(seed.fillers.len());
    for (name, weight) in &seed.fillers {
        match catalog.ingredient(name) {
            Some(ingredient) => natural.push(ingredient.to_component(*weight)),
            None => {
                warn!(filler = %name, "filler ingredient missing from catalog, giving its share to the commercial feed");
                bulk_weight += weight;
            }
        }
    }

    let mut bulk = feed.to_bulk(bulk_weight);
    bulk.ratio = Some(seed.ratio);
    bulk.original_weight = Some(total_target_mass);

    info!(
        feed = %feed.name,
        ratio = seed.ratio,
        bulk_weight,
        fillers = natural.len(),
        "seeded commercial mix"
    );

    Mix::new(natural, Some(bulk))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(energy: f64, protein: f64) -> NutrientProfile {
        NutrientProfile {
            energy,
            protein,
            ..Default::default()
        }
    }

    fn targets(energy: f64, protein: f64) -> Vec<NutritionalTarget> {
        vec![
            NutritionalTarget {
                name: ENERGY.to_string(),
                target: energy,
            },
            NutritionalTarget {
                name: PROTEIN.to_string(),
                target: protein,
            },
        ]
    }

    #[test]
    fn test_stricter_constraint_wins() {
        // energy: 240/280 = 0.857, protein: 15/19 = 0.789
        let ratio = solve_ratio(280.0, 16.0, &bulk(320.0, 20.0));
        assert!((ratio - 15.0 / 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_density_falls_back_to_full_bulk() {
        assert_eq!(solve_ratio(280.0, 16.0, &bulk(FILLER_ENERGY, 20.0)), 1.0);
        assert_eq!(solve_ratio(280.0, 16.0, &bulk(320.0, FILLER_PROTEIN)), 1.0);
    }

    #[test]
    fn test_ratio_clamped() {
        // Very dense feed: tiny ratio, clamped to the floor
        assert_eq!(solve_ratio(280.0, 16.0, &bulk(5000.0, 500.0)), RATIO_FLOOR);
        // Feed thinner than the target: ratio above 1, clamped to the ceiling
        assert_eq!(solve_ratio(280.0, 16.0, &bulk(200.0, 10.0)), RATIO_CEILING);
    }

    #[test]
    fn test_fallback_targets() {
        let with_targets = plan_commercial_seed(&targets(280.0, 16.0), &bulk(320.0, 20.0), 3.0);
        let without = plan_commercial_seed(&[], &bulk(320.0, 20.0), 3.0);
        assert_eq!(with_targets, without);
    }

    #[test]
    fn test_goat_doe_example() {
        let seed = plan_commercial_seed(&targets(280.0, 16.0), &bulk(320.0, 20.0), 3.0);
        assert!((seed.ratio - 0.789).abs() < 1e-3);
        assert_eq!(seed.bulk_weight, 2.37);
        assert_eq!(seed.fillers.len(), 2);
        assert_eq!(seed.fillers[0].0, PRIMARY_FILLER);
        assert!((seed.fillers[0].1 - 0.441).abs() < 1e-9);
        assert!((seed.fillers[1].1 - 0.189).abs() < 1e-9);
    }

    #[test]
    fn test_high_ratio_leaves_no_fillers() {
        let seed = plan_commercial_seed(&targets(280.0, 16.0), &bulk(290.0, 16.5), 3.0);
        assert!(seed.ratio >= NATURAL_FILL_THRESHOLD);
        assert!(seed.fillers.is_empty());
    }

    #[test]
    fn test_seed_mix_without_fillers_in_catalog_conserves_mass() {
        let feed = CommercialFeed {
            name: "Goat Grower".to_string(),
            animal: vec!["Goat".to_string()],
            sub_species: None,
            nutrients: bulk(320.0, 20.0),
            price_per_kg: 38.0,
        };
        let mix = seed_mix(&Catalog::default(), &targets(280.0, 16.0), &feed, 3.0);
        assert!(mix.natural.is_empty());
        assert!((mix.total_weight() - 3.0).abs() < 1e-9);
        assert_eq!(mix.bulk.as_ref().unwrap().original_weight, Some(3.0));
    }
}
