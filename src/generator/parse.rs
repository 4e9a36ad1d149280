//! Decoding model output into a [`Recipe`]

use crate::error::{Error, Result};
use crate::models::Recipe;

/// Remove markdown code-fence markers (```` ```json ```` and ```` ``` ````)
/// anywhere in the text, then trim
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse model output as a recipe. The result has no id, cuisine or
/// creation time yet.
pub fn parse_recipe(text: &str) -> Result<Recipe> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(Error::generation_parse("model returned no text"));
    }

    serde_json::from_str(&cleaned).map_err(|e| {
        Error::generation_parse(format!("response is not a recipe JSON object: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    const RECIPE_JSON: &str = r#"{
        "title": "Charred Corn Elote Bowl",
        "description": "Street corn flavors in a bowl",
        "difficulty": "Easy",
        "prep_time": 10,
        "cook_time": 12,
        "servings": 2,
        "ingredients": ["corn", "cotija", "lime"],
        "steps": ["Char corn", "Mix dressing", "Assemble"],
        "nutrition": {"calories": 410, "protein": "11g", "carbs": "52g"}
    }"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_parse_plain_json() {
        let recipe = parse_recipe(RECIPE_JSON).unwrap();
        assert_eq!(recipe.title, "Charred Corn Elote Bowl");
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.steps.len(), 3);
        assert_eq!(recipe.nutrition.calories, 410);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", RECIPE_JSON);
        assert_eq!(parse_recipe(&fenced).unwrap(), parse_recipe(RECIPE_JSON).unwrap());
    }

    #[test]
    fn test_prose_is_parse_error() {
        let err = parse_recipe("Sure! Here's a lovely recipe for you.").unwrap_err();
        assert!(matches!(err, Error::GenerationParse { .. }));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = parse_recipe(r#"{"title": "Only a title"}"#).unwrap_err();
        assert!(matches!(err, Error::GenerationParse { .. }));

        let err = parse_recipe("```json\n```").unwrap_err();
        assert!(matches!(err, Error::GenerationParse { .. }));
    }
}
