use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::formulation::{SuggestionResponse, parse_suggestion};
use crate::models::{Catalog, Mix};

/// Load a catalog from a JSON file.
///
/// Deduplicates entries by lowercase name (last occurrence wins) and clamps
/// invalid densities, prices and dosages to zero.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let content = fs::read_to_string(path.as_ref())?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    let catalog = catalog.deduplicated().sanitized();
    debug!(
        path = %path.as_ref().display(),
        animals = catalog.animals.len(),
        ingredients = catalog.ingredients.len(),
        feeds = catalog.commercial_feeds.len(),
        supplements = catalog.supplements.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Save a mix snapshot to a JSON file.
pub fn save_mix<P: AsRef<Path>>(path: P, mix: &Mix) -> Result<()> {
    let json = serde_json::to_string_pretty(mix)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a mix snapshot from a JSON file.
pub fn load_mix<P: AsRef<Path>>(path: P) -> Result<Mix> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a saved provider response and validate it.
pub fn load_suggestion<P: AsRef<Path>>(path: P) -> Result<SuggestionResponse> {
    let content = fs::read_to_string(path)?;
    parse_suggestion(&content)
}
