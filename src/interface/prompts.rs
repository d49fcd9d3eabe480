use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{FeedError, Result};
use crate::formulation::constants::DEFAULT_ANIMAL_COUNT;
use crate::models::{Animal, Catalog, Ingredient};

/// Minimum Jaro-Winkler similarity for a fuzzy ingredient match.
const FUZZY_THRESHOLD: f64 = 0.7;

const MAX_MATCHES: usize = 5;

/// Prompt for the animal to formulate for.
pub fn prompt_animal(catalog: &Catalog) -> Result<&Animal> {
    if catalog.animals.is_empty() {
        return Err(FeedError::InvalidInput("catalog lists no animals".to_string()));
    }

    let names: Vec<&str> = catalog.animals.iter().map(|a| a.name.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Which animal are you feeding?")
        .items(&names)
        .default(0)
        .interact()?;

    Ok(&catalog.animals[selection])
}

/// Prompt for one of the animal's sub-species.
pub fn prompt_sub_species(animal: &Animal) -> Result<String> {
    if animal.sub_species.is_empty() {
        return Err(FeedError::SubSpeciesNotFound {
            animal: animal.name.clone(),
            sub_species: String::new(),
        });
    }

    let selection = Select::new()
        .with_prompt(format!("Which {} sub-species?", animal.name))
        .items(&animal.sub_species)
        .default(0)
        .interact()?;

    Ok(animal.sub_species[selection].clone())
}

/// Prompt for the number of animals in the herd.
pub fn prompt_animal_count() -> Result<u32> {
    let input: String = Input::new()
        .with_prompt("How many animals?")
        .default(DEFAULT_ANIMAL_COUNT.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidInput("Invalid number".to_string()))
}

/// Prompt for a component weight in kg.
pub fn prompt_weight(name: &str, current: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(format!("Weight of '{}' in kg", name))
        .default(format!("{:.3}", current))
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidInput("Invalid number".to_string()))
}

/// Catalog ingredients resembling `input`, best first. An exact name match
/// is returned alone.
pub fn match_ingredients<'a>(catalog: &'a Catalog, input: &str) -> Vec<&'a Ingredient> {
    if let Some(exact) = catalog.ingredient(input) {
        return vec![exact];
    }

    let needle = input.to_lowercase();
    let mut scored: Vec<(&Ingredient, f64)> = catalog
        .ingredients
        .iter()
        .map(|i| (i, jaro_winkler(&i.name.to_lowercase(), &needle)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(MAX_MATCHES).map(|(i, _)| i).collect()
}

/// Ask for ingredient names until an empty line, resolving each against the catalog.
pub fn prompt_ingredients(catalog: &Catalog) -> Result<Vec<String>> {
    let mut chosen: Vec<String> = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Ingredient to add (empty to finish)")
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();
        if input.is_empty() {
            return Ok(chosen);
        }

        let matches = match_ingredients(catalog, input);
        let picked = match matches.as_slice() {
            [] => {
                println!("'{}' is not in the catalog.", input);
                None
            }
            [only] if only.name.eq_ignore_ascii_case(input) => Some(*only),
            [only] => prompt_yes_no(&format!("Use '{}'?", only.name), true)?.then_some(*only),
            many => {
                let mut labels: Vec<&str> = many.iter().map(|i| i.name.as_str()).collect();
                labels.push("(skip)");
                let index = Select::new()
                    .with_prompt(format!("Closest matches for '{}'", input))
                    .items(&labels)
                    .default(0)
                    .interact()?;
                many.get(index).copied()
            }
        };

        if let Some(ingredient) = picked {
            if chosen.contains(&ingredient.name) {
                println!("{} is already chosen.", ingredient.name);
            } else {
                chosen.push(ingredient.name.clone());
            }
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect animal, sub-species and herd size.
pub fn collect_selection(catalog: &Catalog) -> Result<(String, String, u32)> {
    let animal = prompt_animal(catalog)?;
    let sub_species = prompt_sub_species(animal)?;
    let count = prompt_animal_count()?;
    Ok((animal.name.clone(), sub_species, count))
}
