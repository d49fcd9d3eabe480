use crate::formulation::{FormulationReport, NutrientStatus, SupplementPlan};
use crate::models::Catalog;

/// Number of supplement suggestions shown before summarising the rest.
const SUGGESTIONS_SHOWN: usize = 3;

fn status_marker(status: NutrientStatus) -> &'static str {
    match status {
        NutrientStatus::Met => "ok",
        NutrientStatus::Low => "v",
        NutrientStatus::High => "^",
        NutrientStatus::NotAvailable => "-",
    }
}

/// Display the full formulation report.
pub fn display_report(report: &FormulationReport) {
    let params = &report.params;

    println!();
    println!("=== Feed Mix ===");
    println!(
        "{} animals x {:.0} g x {:.2} = {:.3} kg/day ({:?}, {} feeding(s))",
        params.animal_count,
        params.feed_per_animal,
        params.daily_scaling,
        report.total_target_mass,
        params.mode,
        params.feedings_per_day
    );
    if params.feedings_per_day > 1 {
        println!("{:.3} kg per feeding", params.mass_per_feeding());
    }
    println!();

    let name_width = report
        .mix
        .natural
        .iter()
        .map(|c| c.name.len())
        .chain(report.mix.bulk.iter().map(|b| b.name.len()))
        .max()
        .unwrap_or(10);

    if let Some(bulk) = &report.mix.bulk {
        let ratio = bulk
            .ratio
            .map(|r| format!("  (seeded at {:.0}%)", r * 100.0))
            .unwrap_or_default();
        println!(
            "  {:<width$}  {:>8.3} kg  @ {:>7.2}/kg  [commercial]{}",
            bulk.name,
            bulk.weight,
            bulk.price_per_kg,
            ratio,
            width = name_width
        );
    } else {
        println!("  (no commercial feed for this animal)");
    }

    for component in &report.mix.natural {
        let price = component
            .price_per_kg
            .map(|p| format!("{:>7.2}/kg", p))
            .unwrap_or_else(|| "   foraged".to_string());
        let lock = if component.locked { "  [locked]" } else { "" };
        println!(
            "  {:<width$}  {:>8.3} kg  @ {}{}",
            component.name,
            component.weight,
            price,
            lock,
            width = name_width
        );
    }

    println!(
        "  Total: {:.3} kg of {:.3} kg target",
        report.mix.total_weight(),
        report.total_target_mass
    );

    println!();
    println!("--- Nutrient Blend ---");
    println!(
        "  {:<18} {:>10} {:>12} {:>12} {:>14}",
        "Nutrient", "per 100", "per animal", "per 1000", "per day"
    );
    for row in &report.blend {
        println!(
            "  {:<18} {:>10.2} {:>12.2} {:>12.2} {:>14.2}",
            row.name,
            row.per_100,
            row.per_animal(params),
            row.per_1000(),
            row.per_day(params)
        );
    }

    println!();
    println!("--- Targets (per animal per day) ---");
    if report.targets.is_empty() {
        println!("  No nutritional targets listed for this animal.");
    }
    for target in &report.targets {
        let level = target
            .gauge
            .map(|g| format!("{:>3}% {}", g.percentage, g.band))
            .unwrap_or_else(|| "  N/A".to_string());
        println!(
            "  {:<18} {:>10.2} {:<5} goal {:.2}-{:.2}  {} {}  [{}]",
            target.name,
            target.value,
            target.unit,
            target.goal_min,
            target.goal_max,
            target.status,
            status_marker(target.status),
            level
        );
    }
    if !report.targets.is_empty() && report.adequacy.all_met() {
        println!("  All targets met.");
    }

    println!();
    println!("--- Supplements ---");
    match &report.supplements {
        SupplementPlan::AllSatisfied => {
            println!("  No nutrient gaps. No supplements needed.");
        }
        SupplementPlan::Deficient { gaps, suggestions } => {
            for gap in gaps {
                println!(
                    "  {:<18} {:.1} / {:.1}  (-{:.0}%, {:?})",
                    gap.nutrient, gap.current, gap.target, gap.percentage_short, gap.severity
                );
            }
            if suggestions.is_empty() {
                println!("  No catalog supplement covers these gaps.");
            }
            for suggestion in suggestions.iter().take(SUGGESTIONS_SHOWN) {
                println!();
                println!("  {} [{}]", suggestion.name, suggestion.availability);
                if !suggestion.description.is_empty() {
                    println!("    {}", suggestion.description);
                }
                println!("    Targets: {}", suggestion.targeted_nutrients.join(", "));
                println!(
                    "    Dosage: {} g per kg of feed ({:.3} kg per batch)",
                    suggestion.dosage_per_kg, suggestion.amount_kg
                );
                println!(
                    "    Cost: {:.2} per batch, {:.3} per animal per day",
                    suggestion.batch_cost, suggestion.daily_cost_per_animal
                );
            }
            if suggestions.len() > SUGGESTIONS_SHOWN {
                println!();
                println!("  ... {} more", suggestions.len() - SUGGESTIONS_SHOWN);
            }
        }
    }

    let costs = &report.costs;
    println!();
    println!("--- Costs ---");
    println!("  Natural ingredients: {:.2}", costs.natural_cost);
    println!("  Commercial feed:     {:.2}", costs.commercial_cost);
    println!("  Total:               {:.2}", costs.total_cost);
    println!("  All-commercial:      {:.2}", costs.potential_cost);
    println!("  Savings:             {:.2}", costs.savings);
    println!();
}

/// Display what the catalog offers.
pub fn display_catalog(catalog: &Catalog) {
    println!();
    println!("=== Animals ({}) ===", catalog.animals.len());
    for animal in &catalog.animals {
        let feeds: Vec<&str> = catalog
            .feeds_for(&animal.name)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        println!("  {}: {}", animal.name, animal.sub_species.join(", "));
        if !feeds.is_empty() {
            println!("    feeds: {}", feeds.join(", "));
        }
    }

    println!();
    println!("=== Natural Ingredients ({}) ===", catalog.ingredients.len());
    for ingredient in &catalog.ingredients {
        let n = &ingredient.nutrients;
        println!(
            "  {} - {} kcal, P:{} F:{} Fi:{} Ca:{} Ph:{}",
            ingredient.name, n.energy, n.protein, n.fat, n.fiber, n.calcium, n.phosphorus
        );
    }

    println!();
    println!("=== Commercial Feeds ({}) ===", catalog.commercial_feeds.len());
    for feed in &catalog.commercial_feeds {
        println!(
            "  {} ({}) - {} kcal, P:{} @ {:.2}/kg",
            feed.name,
            feed.animal.join(", "),
            feed.nutrients.energy,
            feed.nutrients.protein,
            feed.price_per_kg
        );
    }

    println!();
    println!("=== Supplements ({}) ===", catalog.supplements.len());
    for supplement in &catalog.supplements {
        println!(
            "  {} [{}] - {} g/kg @ {:.2}/kg",
            supplement.name, supplement.availability, supplement.dosage_per_kg, supplement.price_per_kg
        );
    }
    println!();
}
