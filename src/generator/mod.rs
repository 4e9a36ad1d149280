//! AI Recipe Generation
//!
//! Turns a [`RecipeRequest`] into a [`Recipe`] by asking an external
//! text-generation endpoint for a JSON document.
//!
//! ## Flow
//!
//! 1. **Request** - validate the form input and render the prompt
//! 2. **Client** - POST to the messages endpoint, bounded by a timeout
//! 3. **Parse** - strip code fences, decode JSON, stamp id/cuisine/createdAt
//!
//! Network and status failures are `GenerationRequest` errors; anything that
//! is not a recipe-shaped JSON object is a `GenerationParse` error.

pub mod client;
pub mod parse;

use crate::error::{Error, Result};
use crate::models::Recipe;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::AnthropicGenerator;

/// Produces recipes from user input
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate(&self, request: &RecipeRequest) -> Result<Recipe>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Budget::Low => write!(f, "low"),
            Budget::Medium => write!(f, "medium"),
            Budget::High => write!(f, "high"),
        }
    }
}

/// Recipe generation form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub cuisine: String,
    pub ingredients: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default = "default_servings")]
    pub servings: u32,
    /// Maximum preparation time in minutes
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
    #[serde(default)]
    pub budget: Budget,
}

fn default_servings() -> u32 {
    4
}

fn default_max_minutes() -> u32 {
    30
}

impl RecipeRequest {
    pub fn new(cuisine: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            cuisine: cuisine.into(),
            ingredients: ingredients.into(),
            restrictions: Vec::new(),
            servings: default_servings(),
            max_minutes: default_max_minutes(),
            budget: Budget::default(),
        }
    }

    /// Cuisine and ingredients are required
    pub fn validate(&self) -> Result<()> {
        if self.cuisine.trim().is_empty() {
            return Err(Error::invalid_request("cuisine is required"));
        }
        if self.ingredients.trim().is_empty() {
            return Err(Error::invalid_request("ingredients are required"));
        }
        if self.servings == 0 {
            return Err(Error::invalid_request("servings must be at least 1"));
        }
        Ok(())
    }

    pub fn prompt(&self) -> String {
        let restrictions = if self.restrictions.is_empty() {
            "none".to_string()
        } else {
            self.restrictions.join(", ")
        };

        format!(
            "Generate a unique and creative {cuisine} recipe using these ingredients: {ingredients}.\n\
             Dietary restrictions: {restrictions}.\n\
             For {servings} servings, max prep time {minutes} minutes, {budget} budget.\n\
             \n\
             Respond ONLY with valid JSON in this exact format (no markdown, no backticks):\n\
             {{\n\
             \x20 \"title\": \"recipe name\",\n\
             \x20 \"description\": \"short description\",\n\
             \x20 \"difficulty\": \"Easy\" | \"Medium\" | \"Hard\",\n\
             \x20 \"prep_time\": number in minutes,\n\
             \x20 \"cook_time\": number in minutes,\n\
             \x20 \"servings\": number,\n\
             \x20 \"ingredients\": [\"ingredient 1\", \"ingredient 2\"],\n\
             \x20 \"steps\": [\"step 1\", \"step 2\"],\n\
             \x20 \"tips\": \"chef's tips\",\n\
             \x20 \"nutrition\": {{\"calories\": number, \"protein\": \"Xg\", \"carbs\": \"Xg\"}}\n\
             }}",
            cuisine = self.cuisine.trim(),
            ingredients = self.ingredients.trim(),
            restrictions = restrictions,
            servings = self.servings,
            minutes = self.max_minutes,
            budget = self.budget,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_cuisine_and_ingredients() {
        assert!(RecipeRequest::new("Italian", "tomato, basil").validate().is_ok());
        assert!(matches!(
            RecipeRequest::new("", "tomato").validate(),
            Err(Error::InvalidRequest { .. })
        ));
        assert!(matches!(
            RecipeRequest::new("Italian", "   ").validate(),
            Err(Error::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let mut request = RecipeRequest::new("Mexican", "black beans, lime");
        request.restrictions = vec!["Vegan".to_string(), "Gluten-Free".to_string()];
        request.budget = Budget::Low;

        let prompt = request.prompt();
        assert!(prompt.contains("creative Mexican recipe"));
        assert!(prompt.contains("black beans, lime"));
        assert!(prompt.contains("Dietary restrictions: Vegan, Gluten-Free."));
        assert!(prompt.contains("For 4 servings, max prep time 30 minutes, low budget."));
        assert!(prompt.contains("\"prep_time\""));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: RecipeRequest =
            serde_json::from_str(r#"{"cuisine": "French", "ingredients": "leeks"}"#).unwrap();
        assert_eq!(request.servings, 4);
        assert_eq!(request.max_minutes, 30);
        assert_eq!(request.budget, Budget::Medium);
        assert!(request.restrictions.is_empty());
    }
}
