pub mod blend;
pub mod constants;
pub mod pipeline;
pub mod ratio;
pub mod reconcile;
pub mod supplements;
pub mod targets;

pub use blend::{BlendRow, blend_profile, blend_rows};
pub use constants::*;
pub use pipeline::{CostSummary, FormulationReport, evaluate};
pub use ratio::{CommercialSeed, plan_commercial_seed, seed_mix, solve_ratio};
pub use reconcile::{SuggestedIngredient, SuggestionResponse, parse_suggestion, reconcile};
pub use supplements::{
    GapSeverity, NutrientGap, SupplementPlan, SupplementSuggestion, analyze_gaps,
    plan_supplements, recommend_supplements,
};
pub use targets::{
    AdequacySummary, Gauge, GaugeBand, NutrientStatus, ResolvedTarget, classify, gauge,
    resolve_targets,
};
