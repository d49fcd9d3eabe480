use serde::Serialize;
use tracing::debug;

use crate::formulation::blend::{BlendRow, blend_profile, blend_rows};
use crate::formulation::supplements::{SupplementPlan, plan_supplements};
use crate::formulation::targets::{AdequacySummary, ResolvedTarget, resolve_targets};
use crate::models::{FeedingParameters, Mix, NutritionalTarget, Supplement};

/// Mix costs against the all-commercial baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub natural_cost: f64,
    pub commercial_cost: f64,
    pub total_cost: f64,

    /// Cost of feeding the whole target mass as commercial feed.
    pub potential_cost: f64,

    pub savings: f64,
}

impl CostSummary {
    pub fn from_mix(mix: &Mix, total_target_mass: f64) -> Self {
        let natural_cost = mix.natural_cost();
        let commercial_cost = mix.bulk_cost();
        let total_cost = natural_cost + commercial_cost;
        let potential_cost = mix
            .bulk
            .as_ref()
            .map(|b| total_target_mass * b.price_per_kg)
            .unwrap_or(0.0);

        Self {
            natural_cost,
            commercial_cost,
            total_cost,
            potential_cost,
            savings: potential_cost - total_cost,
        }
    }
}

/// Immutable snapshot of everything derived from the current inputs.
#[derive(Debug, Clone, Serialize)]
pub struct FormulationReport {
    pub mix: Mix,
    pub params: FeedingParameters,
    pub total_target_mass: f64,
    pub blend: Vec<BlendRow>,
    pub targets: Vec<ResolvedTarget>,
    pub adequacy: AdequacySummary,
    pub supplements: SupplementPlan,
    pub costs: CostSummary,
}

/// Run blend, target resolution, comparison and gap analysis from scratch.
pub fn evaluate(
    mix: &Mix,
    params: &FeedingParameters,
    targets: &[NutritionalTarget],
    supplements: &[Supplement],
) -> FormulationReport {
    let total_target_mass = params.total_target_mass();

    let blended = blend_profile(mix);
    let resolved = resolve_targets(targets, params.feed_per_animal, &blended);
    let adequacy = AdequacySummary::from_targets(&resolved);
    let plan = plan_supplements(
        &resolved,
        supplements,
        total_target_mass,
        params.feed_per_animal,
    );

    debug!(
        targets = resolved.len(),
        deficient = adequacy.deficient.len(),
        excessive = adequacy.excessive.len(),
        "evaluated formulation"
    );

    FormulationReport {
        mix: mix.clone(),
        params: params.clone(),
        total_target_mass,
        blend: blend_rows(&blended),
        targets: resolved,
        adequacy,
        supplements: plan,
        costs: CostSummary::from_mix(mix, total_target_mass),
    }
}
