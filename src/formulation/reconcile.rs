use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FeedError, Result};
use crate::formulation::constants::DEGENERATE_EPSILON;
use crate::models::Mix;

/// One line of an externally produced mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestedIngredient {
    pub name: String,

    /// Mass in kg.
    pub weight: f64,
}

/// Candidate mix returned by a suggestion provider. Untrusted until validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionResponse {
    pub ingredients: Vec<SuggestedIngredient>,
}

impl SuggestionResponse {
    /// Reject empty names and negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        for item in &self.ingredients {
            if item.name.trim().is_empty() {
                return Err(FeedError::InvalidSuggestion(
                    "ingredient with an empty name".to_string(),
                ));
            }
            if !item.weight.is_finite() {
                return Err(FeedError::InvalidSuggestion(format!(
                    "non-finite weight for {}",
                    item.name
                )));
            }
            if item.weight < 0.0 {
                return Err(FeedError::InvalidSuggestion(format!(
                    "negative weight {} for {}",
                    item.weight, item.name
                )));
            }
        }
        Ok(())
    }

    /// Weight suggested for a name (case-insensitive). The first entry wins.
    pub fn weight_of(&self, name: &str) -> Option<f64> {
        self.ingredients
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
            .map(|i| i.weight)
    }
}

/// Parse and validate a raw provider body against the strict response schema.
pub fn parse_suggestion(body: &str) -> Result<SuggestionResponse> {
    let response: SuggestionResponse = serde_json::from_str(body.trim())
        .map_err(|e| FeedError::InvalidSuggestion(e.to_string()))?;
    response.validate()?;
    Ok(response)
}

/// Merge a validated suggestion into a copy of `mix`.
///
/// - Unlocked natural components take the suggested weight, or 0 if omitted.
/// - Locked components are returned untouched.
/// - The commercial feed takes its suggested weight, otherwise whatever mass
///   the natural components leave over.
///
/// The input mix is never modified; on error nothing is applied.
///
/// The result sums to `total_target_mass` only when the mix has a commercial
/// feed line to absorb the remainder.
pub fn reconcile(mix: &Mix, suggestion: &SuggestionResponse, total_target_mass: f64) -> Result<Mix> {
    suggestion.validate()?;

    let mut next = mix.clone();
    for component in next.natural.iter_mut().filter(|c| !c.locked) {
        component.weight = suggestion.weight_of(&component.name).unwrap_or(0.0);
    }

    let natural_weight = next.natural_weight();
    if let Some(bulk) = next.bulk.as_mut() {
        bulk.weight = match suggestion.weight_of(&bulk.name) {
            Some(weight) => weight,
            None => {
                debug!(feed = %bulk.name, "suggestion omitted commercial feed, conserving mass");
                (total_target_mass - natural_weight).max(0.0)
            }
        };
    }

    for item in &suggestion.ingredients {
        let known = next.contains(&item.name)
            || next.bulk.as_ref().is_some_and(|b| b.name.eq_ignore_ascii_case(&item.name));
        if !known {
            debug!(ingredient = %item.name, "ignoring suggested ingredient not in the mix");
        }
    }

    if next.bulk.is_none() && (next.total_weight() - total_target_mass).abs() > DEGENERATE_EPSILON {
        warn!(
            total_weight = next.total_weight(),
            total_target_mass, "no commercial feed to balance the suggested mix"
        );
    }

    info!(total_weight = next.total_weight(), "reconciled suggestion");
    Ok(next)
}
