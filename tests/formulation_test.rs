use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use assert_float_eq::assert_float_absolute_eq;

use feed_formulator_rs::FeedError;
use feed_formulator_rs::formulation::{
    GapSeverity, NutrientStatus, SupplementPlan, classify, parse_suggestion,
};
use feed_formulator_rs::models::{Catalog, FeedingParameters};
use feed_formulator_rs::state::{FormulationSession, load_catalog, load_mix, save_mix};
use feed_formulator_rs::suggest::{SuggestionCoordinator, SuggestionOutcome};
use tempfile::NamedTempFile;

fn shipped_catalog() -> Arc<Catalog> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/catalog.json");
    Arc::new(load_catalog(path).unwrap())
}

fn goat_doe() -> FormulationSession {
    FormulationSession::new(shipped_catalog(), "Goat", "Doe").unwrap()
}

#[test]
fn test_goat_doe_seed() {
    let session = goat_doe();
    let mix = session.mix();

    // 100 animals x 150 g
    assert_float_absolute_eq!(session.total_target_mass(), 15.0, 1e-9);

    let bulk = mix.bulk.as_ref().unwrap();
    assert_eq!(bulk.name, "Goat Grower Pellets");
    // Protein is the binding constraint: (16 - 1) / (20 - 1)
    assert_float_absolute_eq!(bulk.ratio.unwrap(), 15.0 / 19.0, 1e-9);
    assert_float_absolute_eq!(bulk.weight, 11.84, 1e-9);

    let rice = mix.component("Rice Bran").unwrap();
    let corn = mix.component("Corn Meal").unwrap();
    assert_float_absolute_eq!(rice.weight, 2.212, 1e-9);
    assert_float_absolute_eq!(corn.weight, 0.948, 1e-9);
    assert!(!rice.locked && !corn.locked);

    assert_float_absolute_eq!(mix.total_weight(), 15.0, 1e-9);
}

#[test]
fn test_buck_uses_recommended_feed() {
    let session = FormulationSession::new(shipped_catalog(), "goat", "buck").unwrap();
    assert_eq!(session.animal(), "Goat");
    assert_eq!(session.sub_species(), "Buck");
    assert_float_absolute_eq!(session.params().feed_per_animal, 200.0, 1e-9);
    assert_float_absolute_eq!(session.total_target_mass(), 20.0, 1e-9);
    // No Buck-specific product, so the first goat feed is used.
    assert_eq!(
        session.mix().bulk.as_ref().unwrap().name,
        "Goat Grower Pellets"
    );
    assert_float_absolute_eq!(session.mix().total_weight(), 20.0, 1e-9);
}

#[test]
fn test_unknown_selection() {
    let err = FormulationSession::new(shipped_catalog(), "Yak", "Bull").err().unwrap();
    assert!(matches!(err, FeedError::AnimalNotFound(_)));

    let err = FormulationSession::new(shipped_catalog(), "Goat", "Wether").err().unwrap();
    assert!(matches!(err, FeedError::SubSpeciesNotFound { .. }));
}

#[test]
fn test_herd_parameters_reseed() {
    let params = FeedingParameters {
        animal_count: 20,
        ..Default::default()
    };
    let mut session =
        FormulationSession::with_params(shipped_catalog(), "Goat", "Doe", params).unwrap();
    assert_float_absolute_eq!(session.total_target_mass(), 3.0, 1e-9);
    assert_float_absolute_eq!(session.mix().total_weight(), 3.0, 1e-9);

    session.set_daily_scaling(2.0);
    assert_float_absolute_eq!(session.total_target_mass(), 6.0, 1e-9);
    assert_float_absolute_eq!(session.mix().total_weight(), 6.0, 1e-9);
}

#[test]
fn test_band_edges() {
    let goal = 100.0;
    let (min, max) = (goal * 0.95, goal * 1.15);

    assert_eq!(classify(min, min, max), NutrientStatus::Met);
    assert_eq!(classify(max, min, max), NutrientStatus::Met);
    assert_eq!(classify(min - 0.01, min, max), NutrientStatus::Low);
    assert_eq!(classify(max + 0.01, min, max), NutrientStatus::High);
    assert_eq!(classify(0.0, min, max), NutrientStatus::NotAvailable);
}

#[test]
fn test_weight_edit_conserves_mass() {
    let mut session = goat_doe();
    session.set_ingredient_weight("corn meal", 2.0).unwrap();

    let mix = session.mix();
    assert_float_absolute_eq!(mix.total_weight(), 15.0, 1e-9);
    assert_float_absolute_eq!(mix.bulk_weight(), 15.0 - 2.212 - 2.0, 1e-9);

    // Natural mass above the target pins the bulk at zero.
    session.set_ingredient_weight("Rice Bran", 20.0).unwrap();
    assert_float_absolute_eq!(session.mix().bulk_weight(), 0.0, 1e-9);
}

#[test]
fn test_poor_mix_suggests_supplements() {
    let mut session = goat_doe();
    session.reset_mix();
    assert!(session.add_ingredient("Kangkong").unwrap());
    session.set_ingredient_weight("Kangkong", 14.0).unwrap();

    let report = session.report();
    assert!(!report.adequacy.all_met());
    assert!(report.adequacy.deficient.contains(&"Calcium (g)".to_string()));

    let SupplementPlan::Deficient { gaps, suggestions } = &report.supplements else {
        panic!("expected gaps");
    };

    // Worst shortfall first.
    assert_eq!(gaps[0].nutrient, "Energy (kcal)");
    assert!(gaps
        .windows(2)
        .all(|w| w[0].percentage_short >= w[1].percentage_short));

    let calcium = gaps.iter().find(|g| g.nutrient == "Calcium (g)").unwrap();
    assert_eq!(calcium.severity, GapSeverity::High);
    assert_float_absolute_eq!(calcium.target, 0.9, 1e-9);

    // Cheapest per animal first; zero-phosphorus sources only cover calcium.
    assert_eq!(suggestions[0].name, "Oyster Shell (Calcium)");
    assert_float_absolute_eq!(suggestions[0].amount_kg, 0.18, 1e-9);
    assert_float_absolute_eq!(suggestions[0].batch_cost, 3.6, 1e-9);
    assert_eq!(suggestions[0].targeted_nutrients, vec!["Calcium (g)".to_string()]);

    let bone = suggestions.iter().find(|s| s.name == "Bone Meal").unwrap();
    assert!(bone.targeted_nutrients.contains(&"Protein (g)".to_string()));
    assert!(bone.targeted_nutrients.contains(&"Phosphorus (g)".to_string()));

    assert!(!suggestions.iter().any(|s| s.name.starts_with("Rock Salt")));
}

#[test]
fn test_apply_suggestion_respects_locks() {
    let mut session = goat_doe();
    assert!(session.toggle_lock("Rice Bran").unwrap());

    let response =
        parse_suggestion(r#"{"ingredients": [{"name": "corn meal", "weight": 1.5}, {"name": "Rice Bran", "weight": 9.0}]}"#)
            .unwrap();

    let coordinator = SuggestionCoordinator::new(Duration::from_secs(1));
    let ticket = coordinator.issue();
    let outcome = session.apply_suggestion(&ticket, &response).unwrap();
    assert_eq!(outcome, SuggestionOutcome::Ready(()));

    let mix = session.mix();
    assert_float_absolute_eq!(mix.component("Corn Meal").unwrap().weight, 1.5, 1e-9);
    assert_float_absolute_eq!(mix.component("Rice Bran").unwrap().weight, 2.212, 1e-9);
    assert_float_absolute_eq!(mix.bulk_weight(), 15.0 - 1.5 - 2.212, 1e-9);
}

#[test]
fn test_stale_ticket_leaves_mix() {
    let mut session = goat_doe();
    let before = session.mix().clone();

    let response = parse_suggestion(r#"{"ingredients": [{"name": "Corn Meal", "weight": 5.0}]}"#)
        .unwrap();

    let coordinator = SuggestionCoordinator::new(Duration::from_secs(1));
    let stale = coordinator.issue();
    let _newer = coordinator.issue();

    let outcome = session.apply_suggestion(&stale, &response).unwrap();
    assert_eq!(outcome, SuggestionOutcome::Superseded);
    assert_eq!(session.mix(), &before);
}

#[test]
fn test_saved_mix_round_trips_into_session() {
    let mut session = goat_doe();
    session.add_ingredient("Ipil-Ipil Leaves").unwrap();
    session.set_ingredient_weight("Ipil-Ipil Leaves", 1.0).unwrap();
    session.toggle_lock("Ipil-Ipil Leaves").unwrap();

    let file = NamedTempFile::new().unwrap();
    save_mix(file.path(), session.mix()).unwrap();

    let mut restored = goat_doe();
    restored.replace_mix(load_mix(file.path()).unwrap());
    assert_eq!(restored.mix(), session.mix());
    assert!(restored.mix().component("Ipil-Ipil Leaves").unwrap().locked);
    // Foraged ingredients carry no price.
    assert_eq!(
        restored.mix().component("Ipil-Ipil Leaves").unwrap().price_per_kg,
        None
    );
}

#[test]
fn test_costs_against_all_commercial() {
    let session = goat_doe();
    let report = session.report();
    let costs = &report.costs;

    assert_float_absolute_eq!(costs.commercial_cost, 11.84 * 38.0, 1e-9);
    assert_float_absolute_eq!(costs.natural_cost, 2.212 * 18.0 + 0.948 * 24.0, 1e-9);
    assert_float_absolute_eq!(costs.potential_cost, 15.0 * 38.0, 1e-9);
    assert_float_absolute_eq!(
        costs.savings,
        costs.potential_cost - costs.total_cost,
        1e-9
    );
}

#[test]
fn test_feed_override_then_reseed_balances() {
    let params = FeedingParameters {
        animal_count: 20,
        ..Default::default()
    };
    let mut session =
        FormulationSession::with_params(shipped_catalog(), "Goat", "Doe", params).unwrap();
    session.set_feed_per_animal(300.0);
    session.reseed();

    let report = session.report();
    assert_float_absolute_eq!(report.total_target_mass, 6.0, 1e-9);
    assert_float_absolute_eq!(report.mix.total_weight(), 6.0, 1e-9);
    assert_float_absolute_eq!(session.suggestion_request().unwrap().total_target_mass, 6.0, 1e-9);
    // Supplement batches are sized for the overridden mass.
    for suggestion in report.supplements.suggestions() {
        assert!(suggestion.amount_kg > 0.0);
    }
    // Per-animal goals follow the override, not the catalog recommendation.
    let energy = report.targets.iter().find(|t| t.name == "Energy (kcal)").unwrap();
    assert_float_absolute_eq!(energy.base_goal, 840.0, 1e-9);
}
