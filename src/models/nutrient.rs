use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::formulation::constants::sanitize;

pub const ENERGY: &str = "Energy (kcal)";
pub const PROTEIN: &str = "Protein (g)";
pub const FAT: &str = "Fat (g)";
pub const FIBER: &str = "Crude Fiber (g)";
pub const CALCIUM: &str = "Calcium (g)";
pub const PHOSPHORUS: &str = "Phosphorus (g)";

/// Names of the macro nutrients every profile carries, in display order.
pub const CORE_NUTRIENTS: [&str; 6] = [ENERGY, PROTEIN, FAT, FIBER, CALCIUM, PHOSPHORUS];

/// Nutrient densities per 100 mass-units of a component.
///
/// Trace minerals are optional and keyed by their display name, e.g. `"Iron (mg)"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub calcium: f64,
    pub phosphorus: f64,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub trace: BTreeMap<String, f64>,
}

impl NutrientProfile {
    /// Look up a nutrient by its display name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            ENERGY => Some(self.energy),
            PROTEIN => Some(self.protein),
            FAT => Some(self.fat),
            FIBER => Some(self.fiber),
            CALCIUM => Some(self.calcium),
            PHOSPHORUS => Some(self.phosphorus),
            other => self.trace.get(other).copied(),
        }
    }

    /// Mutable slot for a nutrient, creating trace entries on demand.
    pub fn slot_mut(&mut self, name: &str) -> &mut f64 {
        match name {
            ENERGY => &mut self.energy,
            PROTEIN => &mut self.protein,
            FAT => &mut self.fat,
            FIBER => &mut self.fiber,
            CALCIUM => &mut self.calcium,
            PHOSPHORUS => &mut self.phosphorus,
            other => self.trace.entry(other.to_string()).or_insert(0.0),
        }
    }

    /// All nutrients as `(name, value)`, core nutrients first.
    pub fn entries(&self) -> Vec<(String, f64)> {
        CORE_NUTRIENTS
            .iter()
            .map(|name| (name.to_string(), self.get(name).unwrap_or(0.0)))
            .chain(self.trace.iter().map(|(k, v)| (k.clone(), *v)))
            .collect()
    }

    /// Non-negative, finite densities only.
    pub fn is_valid(&self) -> bool {
        self.entries()
            .iter()
            .all(|(_, v)| v.is_finite() && *v >= 0.0)
    }

    /// Clamp negative or non-finite densities to zero, returning how many changed.
    pub fn clamp_invalid(&mut self) -> usize {
        let mut clamped = 0;
        for (name, value) in self.entries() {
            let fixed = sanitize(value);
            if fixed != value {
                *self.slot_mut(&name) = fixed;
                clamped += 1;
            }
        }
        clamped
    }
}

/// Unit carried in the trailing parenthesised token of a nutrient name.
///
/// `"Energy (kcal)"` gives `"kcal"`; a name without parentheses gives `""`.
pub fn unit_of(name: &str) -> &str {
    let Some(inner) = name.trim_end().strip_suffix(')') else {
        return "";
    };
    match inner.rfind('(') {
        Some(open) => inner[open + 1..].trim(),
        None => "",
    }
}
