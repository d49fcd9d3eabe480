use std::fmt;

use serde::Serialize;

use crate::formulation::blend::per_animal;
use crate::formulation::constants::{
    DENSITY_BASIS, GAUGE_CAP_PCT, GAUGE_IDEAL_MAX_PCT, GAUGE_IDEAL_MIN_PCT, GAUGE_TOO_HIGH_PCT,
    GAUGE_TOO_LOW_PCT, GOAL_MAX_FACTOR, GOAL_MIN_FACTOR,
};
use crate::models::{NutrientProfile, NutritionalTarget, unit_of};

/// Adequacy of one nutrient against its goal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NutrientStatus {
    /// Value is exactly zero. Covers both "nothing computed yet" and a mix
    /// that truly lacks the nutrient.
    #[serde(rename = "N/A")]
    NotAvailable,
    Low,
    Met,
    High,
}

impl fmt::Display for NutrientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NutrientStatus::NotAvailable => "N/A",
            NutrientStatus::Low => "Low",
            NutrientStatus::Met => "Met",
            NutrientStatus::High => "High",
        };
        f.write_str(label)
    }
}

/// Classify a per-animal value against `[goal_min, goal_max]`. Both edges are `Met`.
pub fn classify(value: f64, goal_min: f64, goal_max: f64) -> NutrientStatus {
    if value == 0.0 {
        NutrientStatus::NotAvailable
    } else if value < goal_min {
        NutrientStatus::Low
    } else if value > goal_max {
        NutrientStatus::High
    } else {
        NutrientStatus::Met
    }
}

/// Where a gauge reading falls relative to the ideal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    TooLow,
    Low,
    Ideal,
    High,
    TooHigh,
}

impl GaugeBand {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage < GAUGE_TOO_LOW_PCT {
            GaugeBand::TooLow
        } else if percentage < GAUGE_IDEAL_MIN_PCT {
            GaugeBand::Low
        } else if percentage <= GAUGE_IDEAL_MAX_PCT {
            GaugeBand::Ideal
        } else if percentage < GAUGE_TOO_HIGH_PCT {
            GaugeBand::High
        } else {
            GaugeBand::TooHigh
        }
    }
}

impl fmt::Display for GaugeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GaugeBand::TooLow => "too low",
            GaugeBand::Low => "low",
            GaugeBand::Ideal => "ideal",
            GaugeBand::High => "high",
            GaugeBand::TooHigh => "too high",
        };
        f.write_str(label)
    }
}

/// Nutrition level as a whole percentage of the goal band midpoint, capped at 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gauge {
    pub percentage: u32,
    pub band: GaugeBand,
}

/// Gauge reading for a value against its band. `None` when the value or
/// either band edge is zero.
pub fn gauge(value: f64, goal_min: f64, goal_max: f64) -> Option<Gauge> {
    if value == 0.0 || goal_min == 0.0 || goal_max == 0.0 {
        return None;
    }
    let midpoint = (goal_min + goal_max) / 2.0;
    let raw = (value / midpoint * 100.0).round();
    if !raw.is_finite() {
        return None;
    }
    let percentage = raw.clamp(0.0, GAUGE_CAP_PCT) as u32;
    Some(Gauge {
        percentage,
        band: GaugeBand::from_percentage(percentage),
    })
}

/// A target nutrient resolved for one animal's daily ration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTarget {
    pub name: String,
    pub unit: String,

    /// Current per-animal amount supplied by the mix.
    pub value: f64,

    /// Per-animal goal before tolerance is applied.
    pub base_goal: f64,

    pub goal_min: f64,
    pub goal_max: f64,
    pub status: NutrientStatus,
    pub gauge: Option<Gauge>,
}

/// Turn per-100 g targets into per-animal goals and compare them with the blend.
///
/// A target whose nutrient the blend does not carry resolves to a value of 0.
pub fn resolve_targets(
    targets: &[NutritionalTarget],
    feed_per_animal: f64,
    blended: &NutrientProfile,
) -> Vec<ResolvedTarget> {
    targets
        .iter()
        .map(|target| {
            let base_goal = target.target * feed_per_animal / DENSITY_BASIS;
            let goal_min = base_goal * GOAL_MIN_FACTOR;
            let goal_max = base_goal * GOAL_MAX_FACTOR;
            let value = blended
                .get(&target.name)
                .map(|per_100| per_animal(per_100, feed_per_animal))
                .unwrap_or(0.0);

            ResolvedTarget {
                name: target.name.clone(),
                unit: unit_of(&target.name).to_string(),
                value,
                base_goal,
                goal_min,
                goal_max,
                status: classify(value, goal_min, goal_max),
                gauge: gauge(value, goal_min, goal_max),
            }
        })
        .collect()
}

/// Which targets fall outside their band.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdequacySummary {
    pub deficient: Vec<String>,
    pub excessive: Vec<String>,
}

impl AdequacySummary {
    pub fn from_targets(targets: &[ResolvedTarget]) -> Self {
        let names_with = |status: NutrientStatus| {
            targets
                .iter()
                .filter(|t| t.status == status)
                .map(|t| t.name.clone())
                .collect()
        };
        Self {
            deficient: names_with(NutrientStatus::Low),
            excessive: names_with(NutrientStatus::High),
        }
    }

    pub fn all_met(&self) -> bool {
        self.deficient.is_empty() && self.excessive.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, value: f64) -> NutritionalTarget {
        NutritionalTarget {
            name: name.to_string(),
            target: value,
        }
    }

    #[test]
    fn test_goal_band() {
        let blended = NutrientProfile {
            energy: 280.0,
            ..Default::default()
        };
        let resolved = resolve_targets(&[target("Energy (kcal)", 280.0)], 150.0, &blended);

        let energy = &resolved[0];
        assert_eq!(energy.unit, "kcal");
        assert!((energy.base_goal - 420.0).abs() < 1e-9);
        assert!((energy.goal_min - 399.0).abs() < 1e-9);
        assert!((energy.goal_max - 483.0).abs() < 1e-9);
        assert!((energy.value - 420.0).abs() < 1e-9);
        assert_eq!(energy.status, NutrientStatus::Met);
    }

    #[test]
    fn test_missing_nutrient_resolves_to_zero() {
        let resolved = resolve_targets(
            &[target("Selenium (mg)", 0.1)],
            150.0,
            &NutrientProfile::default(),
        );
        assert_eq!(resolved[0].value, 0.0);
        assert_eq!(resolved[0].status, NutrientStatus::NotAvailable);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(95.0, 95.0, 115.0), NutrientStatus::Met);
        assert_eq!(classify(115.0, 95.0, 115.0), NutrientStatus::Met);
        assert_eq!(classify(95.0 - 1e-9, 95.0, 115.0), NutrientStatus::Low);
        assert_eq!(classify(115.0 + 1e-9, 95.0, 115.0), NutrientStatus::High);
        assert_eq!(classify(0.0, 95.0, 115.0), NutrientStatus::NotAvailable);
    }

    #[test]
    fn test_gauge_percentage_of_midpoint() {
        // Band 399..483, midpoint 441.
        let reading = gauge(441.0, 399.0, 483.0).unwrap();
        assert_eq!(reading.percentage, 100);
        assert_eq!(reading.band, GaugeBand::Ideal);

        assert_eq!(gauge(220.5, 399.0, 483.0).unwrap().percentage, 50);
        assert_eq!(gauge(5000.0, 399.0, 483.0).unwrap().percentage, 200);
        assert_eq!(gauge(5000.0, 399.0, 483.0).unwrap().band, GaugeBand::TooHigh);
        assert!(gauge(0.0, 399.0, 483.0).is_none());
        assert!(gauge(10.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_gauge_band_edges() {
        assert_eq!(GaugeBand::from_percentage(69), GaugeBand::TooLow);
        assert_eq!(GaugeBand::from_percentage(70), GaugeBand::Low);
        assert_eq!(GaugeBand::from_percentage(92), GaugeBand::Low);
        assert_eq!(GaugeBand::from_percentage(94), GaugeBand::Low);
        assert_eq!(GaugeBand::from_percentage(95), GaugeBand::Ideal);
        assert_eq!(GaugeBand::from_percentage(105), GaugeBand::Ideal);
        assert_eq!(GaugeBand::from_percentage(106), GaugeBand::High);
        assert_eq!(GaugeBand::from_percentage(119), GaugeBand::High);
        assert_eq!(GaugeBand::from_percentage(120), GaugeBand::TooHigh);
        assert_eq!(GaugeBand::from_percentage(200), GaugeBand::TooHigh);
    }

    #[test]
    fn test_resolved_target_carries_gauge() {
        let blended = NutrientProfile {
            energy: 280.0,
            ..Default::default()
        };
        let resolved = resolve_targets(
            &[target("Energy (kcal)", 280.0), target("Protein (g)", 16.0)],
            150.0,
            &blended,
        );
        // 420 against midpoint 441
        assert_eq!(
            resolved[0].gauge,
            Some(Gauge {
                percentage: 95,
                band: GaugeBand::Ideal
            })
        );
        assert_eq!(resolved[1].gauge, None);
    }

    #[test]
    fn test_adequacy_summary() {
        let blended = NutrientProfile {
            energy: 100.0,
            protein: 30.0,
            calcium: 1.0,
            ..Default::default()
        };
        let targets = vec![
            target("Energy (kcal)", 280.0),
            target("Protein (g)", 16.0),
            target("Calcium (g)", 1.0),
        ];
        let summary = AdequacySummary::from_targets(&resolve_targets(&targets, 150.0, &blended));
        assert_eq!(summary.deficient, vec!["Energy (kcal)".to_string()]);
        assert_eq!(summary.excessive, vec!["Protein (g)".to_string()]);
        assert!(!summary.all_met());
    }
}
