//! Static model catalog.
//!
//! The catalog is populated at startup and never mutated; every model
//! identifier accepted by the validator must appear here.

use serde::Serialize;

/// A catalog entry describing one provider model.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ModelDescriptor {
    pub(crate) id: &'static str,
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) max_tokens: u32,
}

/// Models exposed through the `/models` endpoint.
pub(crate) const MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        description: "Fast and efficient for most tasks",
        max_tokens: 4096,
    },
    ModelDescriptor {
        id: "gpt-4o-mini",
        name: "GPT-4",
        description: "More capable but slower",
        max_tokens: 8192,
    },
];

/// Default model for chat completions when neither the request nor the
/// configuration names one.
pub(crate) const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default model for recipe generation. The structured JSON contract wants
/// the most capable catalog entry.
pub(crate) const DEFAULT_RECIPE_MODEL: &str = "gpt-4o-mini";

/// Whether the given identifier names a catalog model.
pub(crate) fn contains(model: &str) -> bool {
    MODELS.iter().any(|m| m.id == model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models_are_listed_in_the_catalog() {
        assert!(contains(DEFAULT_CHAT_MODEL));
        assert!(contains(DEFAULT_RECIPE_MODEL));
    }

    #[test]
    fn unknown_model_is_not_in_the_catalog() {
        assert!(!contains("gpt-imaginary"));
    }
}
