use serde::Serialize;
use tracing::debug;

use crate::formulation::constants::{HIGH_SEVERITY_PCT, MASS_CONVERSION, MEDIUM_SEVERITY_PCT};
use crate::formulation::targets::ResolvedTarget;
use crate::models::{Availability, Supplement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Low,
    Medium,
    High,
}

impl GapSeverity {
    pub fn from_percentage_short(pct: f64) -> Self {
        if pct > HIGH_SEVERITY_PCT {
            GapSeverity::High
        } else if pct > MEDIUM_SEVERITY_PCT {
            GapSeverity::Medium
        } else {
            GapSeverity::Low
        }
    }
}

/// Shortfall of one nutrient below its per-animal goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientGap {
    pub nutrient: String,
    pub current: f64,
    pub target: f64,
    pub deficit: f64,
    pub percentage_short: f64,
    pub severity: GapSeverity,
}

/// A supplement closing one or more gaps, with costs for the current herd.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplementSuggestion {
    pub name: String,
    pub description: String,
    pub availability: Availability,
    pub dosage_per_kg: f64,
    pub targeted_nutrients: Vec<String>,

    /// Supplement mass for the whole batch, in kg.
    pub amount_kg: f64,

    pub batch_cost: f64,
    pub daily_cost_per_animal: f64,
}

/// Outcome of gap analysis. `AllSatisfied` is distinct from an empty ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SupplementPlan {
    AllSatisfied,
    Deficient {
        gaps: Vec<NutrientGap>,
        suggestions: Vec<SupplementSuggestion>,
    },
}

impl SupplementPlan {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, SupplementPlan::AllSatisfied)
    }

    pub fn gaps(&self) -> &[NutrientGap] {
        match self {
            SupplementPlan::AllSatisfied => &[],
            SupplementPlan::Deficient { gaps, .. } => gaps,
        }
    }

    pub fn suggestions(&self) -> &[SupplementSuggestion] {
        match self {
            SupplementPlan::AllSatisfied => &[],
            SupplementPlan::Deficient { suggestions, .. } => suggestions,
        }
    }
}

/// Nutrients strictly below their base goal, worst shortfall first.
pub fn analyze_gaps(targets: &[ResolvedTarget]) -> Vec<NutrientGap> {
    let mut gaps: Vec<NutrientGap> = targets
        .iter()
        .filter(|t| t.base_goal > 0.0 && t.value < t.base_goal)
        .map(|t| {
            let deficit = t.base_goal - t.value;
            let percentage_short = deficit / t.base_goal * 100.0;
            NutrientGap {
                nutrient: t.name.clone(),
                current: t.value,
                target: t.base_goal,
                deficit,
                percentage_short,
                severity: GapSeverity::from_percentage_short(percentage_short),
            }
        })
        .collect();

    gaps.sort_by(|a, b| {
        b.percentage_short
            .partial_cmp(&a.percentage_short)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    gaps
}

/// Rank every supplement that addresses at least one gap, cheapest per animal first.
///
/// A supplement matching several gaps appears once and lists each nutrient.
pub fn recommend_supplements(
    gaps: &[NutrientGap],
    supplements: &[Supplement],
    total_target_mass: f64,
    feed_per_animal: f64,
) -> Vec<SupplementSuggestion> {
    let mut suggestions: Vec<SupplementSuggestion> = Vec::new();

    for gap in gaps {
        for supplement in supplements.iter().filter(|s| s.supplies(&gap.nutrient)) {
            if let Some(existing) = suggestions.iter_mut().find(|s| s.name == supplement.name) {
                if !existing.targeted_nutrients.contains(&gap.nutrient) {
                    existing.targeted_nutrients.push(gap.nutrient.clone());
                }
                continue;
            }

            let amount_kg = (supplement.dosage_per_kg / MASS_CONVERSION) * total_target_mass;
            let batch_cost = amount_kg * supplement.price_per_kg;
            let daily_cost_per_animal = if total_target_mass > 0.0 {
                (batch_cost * feed_per_animal / MASS_CONVERSION) / total_target_mass
            } else {
                0.0
            };

            suggestions.push(SupplementSuggestion {
                name: supplement.name.clone(),
                description: supplement.description.clone(),
                availability: supplement.availability,
                dosage_per_kg: supplement.dosage_per_kg,
                targeted_nutrients: vec![gap.nutrient.clone()],
                amount_kg,
                batch_cost,
                daily_cost_per_animal,
            });
        }
    }

    suggestions.sort_by(|a, b| {
        a.daily_cost_per_animal
            .partial_cmp(&b.daily_cost_per_animal)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions
}

/// Gap analysis followed by supplement ranking.
pub fn plan_supplements(
    targets: &[ResolvedTarget],
    supplements: &[Supplement],
    total_target_mass: f64,
    feed_per_animal: f64,
) -> SupplementPlan {
    let gaps = analyze_gaps(targets);
    if gaps.is_empty() {
        return SupplementPlan::AllSatisfied;
    }

    let suggestions = recommend_supplements(&gaps, supplements, total_target_mass, feed_per_animal);
    debug!(gaps = gaps.len(), suggestions = suggestions.len(), "planned supplements");
    SupplementPlan::Deficient { gaps, suggestions }
}
