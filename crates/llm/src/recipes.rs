//! Recipe query composition and structured-output parsing.
//!
//! The provider is asked for strict JSON matching the schema embedded in the
//! system prompt. Only the outer shape is validated here: a `recipes` key
//! holding an array of 2-3 entries. Individual recipe fields are passed
//! through untouched; the prompt advertises the full schema but enforcing it
//! per field is an accepted gap.

use std::fmt;

use serde_json::Value;

use crate::messages::RecipeRequest;

/// Number of recipes the provider must return.
const RECIPE_COUNT: std::ops::RangeInclusive<usize> = 2..=3;

/// Why a provider response failed the recipe contract.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ParseFailure {
    /// The response was not valid JSON at all.
    InvalidJson,
    /// The JSON had no `recipes` key.
    MissingRecipesKey,
    /// The `recipes` value was not an array.
    NotAnArray,
    /// The array held the wrong number of recipes.
    WrongCount(usize),
}

impl ParseFailure {
    /// Whether the raw provider text should be echoed back to the caller.
    pub(crate) fn includes_raw_response(&self) -> bool {
        matches!(self, ParseFailure::InvalidJson)
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::InvalidJson => f.write_str("Invalid JSON response from AI model"),
            ParseFailure::MissingRecipesKey => f.write_str("Response missing 'recipes' key"),
            ParseFailure::NotAnArray => f.write_str("'recipes' must be an array"),
            ParseFailure::WrongCount(_) => f.write_str("Must have 2-3 recipes"),
        }
    }
}

/// Parse and shape-check the provider's recipe response.
pub(crate) fn parse_recipes(raw: &str) -> Result<Vec<Value>, ParseFailure> {
    let data: Value = serde_json::from_str(raw).map_err(|_| ParseFailure::InvalidJson)?;

    let recipes = data.get("recipes").ok_or(ParseFailure::MissingRecipesKey)?;
    let recipes = recipes.as_array().ok_or(ParseFailure::NotAnArray)?;

    if !RECIPE_COUNT.contains(&recipes.len()) {
        return Err(ParseFailure::WrongCount(recipes.len()));
    }

    Ok(recipes.clone())
}

/// Build the user query sent to the provider, one labeled line per supplied
/// preference. Line order is fixed; the units line is always present.
pub(crate) fn build_query(request: &RecipeRequest) -> String {
    let mut query_parts = vec![format!("Ingredients: {}", request.ingredients.join(", "))];

    if let Some(dietary_preferences) = &request.dietary_preferences {
        query_parts.push(format!("Dietary preferences: {}", dietary_preferences.join(", ")));
    }

    if let Some(allergens) = &request.allergens {
        query_parts.push(format!("Allergens to avoid: {}", allergens.join(", ")));
    }

    if let Some(excluded_ingredients) = &request.excluded_ingredients {
        query_parts.push(format!("Excluded ingredients: {}", excluded_ingredients.join(", ")));
    }

    if let Some(cuisine) = &request.cuisine {
        query_parts.push(format!("Cuisine preference: {cuisine}"));
    }

    if let Some(time_limit) = request.time_limit {
        query_parts.push(format!("Time limit: {time_limit} minutes"));
    }

    if let Some(servings) = request.servings {
        query_parts.push(format!("Servings: {servings}"));
    }

    query_parts.push(format!("Units: {}", request.units.as_str()));

    query_parts.join("\n")
}
