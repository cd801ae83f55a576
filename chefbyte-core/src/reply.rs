//! Response classification — envelope parsing for model replies
//!
//! The model is instructed to answer with a JSON envelope, either
//! `{"type": "recipe", ...}` or `{"type": "text", "content": ...}`.
//! `classify` turns the raw reply text into a tagged `Reply` and never
//! fails: unparseable output, or a parsed object whose `type` is neither
//! `recipe` nor `text`, degrades to `Unclassified` and the raw text is
//! shown to the user as a plain message.

use serde::{Deserialize, Serialize};

/// Shown when a text envelope arrives without a `content` field.
pub const MISSING_CONTENT_PLACEHOLDER: &str = "An unexpected text response occurred.";

/// Structured fields carried by a `recipe` envelope. The model can omit
/// any of them; absent fields default rather than failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCard {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Envelope {
    Recipe(RecipeCard),
    Text {
        #[serde(default)]
        content: Option<String>,
    },
}

/// A classified model reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A structured recipe. `raw` keeps the JSON text for the transcript
    /// and the API response body.
    Recipe { raw: String, card: RecipeCard },
    /// A plain message extracted from a text envelope.
    Text { content: String },
    /// Anything that is not a recognized envelope.
    Unclassified { raw: String },
}

/// Classify one raw model reply. Purely local, never panics.
pub fn classify(raw: &str) -> Reply {
    match serde_json::from_str::<Envelope>(raw) {
        Ok(Envelope::Recipe(card)) => Reply::Recipe {
            raw: raw.to_string(),
            card,
        },
        Ok(Envelope::Text { content }) => Reply::Text {
            content: content.unwrap_or_else(|| MISSING_CONTENT_PLACEHOLDER.to_string()),
        },
        Err(_) => Reply::Unclassified {
            raw: raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_recipe_envelope() {
        let raw = r#"{
            "type": "recipe",
            "title": "Aglio e Olio",
            "description": "Garlic and olive oil spaghetti",
            "ingredients": ["spaghetti", "garlic", "olive oil"],
            "instructions": ["boil pasta", "saute garlic", "toss"],
            "prep_time": "5 minutes",
            "cook_time": "10 minutes",
            "servings": "2 servings"
        }"#;

        match classify(raw) {
            Reply::Recipe { raw: echoed, card } => {
                assert_eq!(echoed, raw);
                assert_eq!(card.title.as_deref(), Some("Aglio e Olio"));
                assert_eq!(card.ingredients.len(), 3);
                assert_eq!(card.instructions.len(), 3);
                assert_eq!(card.servings.as_deref(), Some("2 servings"));
            }
            other => panic!("Expected Recipe, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_recipe_with_missing_fields() {
        let raw = r#"{"type": "recipe", "title": "Toast"}"#;

        match classify(raw) {
            Reply::Recipe { card, .. } => {
                assert_eq!(card.title.as_deref(), Some("Toast"));
                assert!(card.ingredients.is_empty());
                assert!(card.cook_time.is_none());
            }
            other => panic!("Expected Recipe, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_text_envelope() {
        let raw = r#"{"type": "text", "content": "Try resting the dough."}"#;

        match classify(raw) {
            Reply::Text { content } => assert_eq!(content, "Try resting the dough."),
            other => panic!("Expected Text, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_text_without_content_falls_back() {
        let raw = r#"{"type": "text"}"#;

        match classify(raw) {
            Reply::Text { content } => assert_eq!(content, MISSING_CONTENT_PLACEHOLDER),
            other => panic!("Expected Text, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_unknown_type_degrades() {
        let raw = r#"{"type": "soup", "content": "?"}"#;

        match classify(raw) {
            Reply::Unclassified { raw: echoed } => assert_eq!(echoed, raw),
            other => panic!("Expected Unclassified, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_plain_prose_degrades() {
        let raw = "Sure! Just add more salt.";

        match classify(raw) {
            Reply::Unclassified { raw: echoed } => assert_eq!(echoed, raw),
            other => panic!("Expected Unclassified, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_object_json_degrades() {
        for raw in ["42", "\"just a string\"", "[1, 2, 3]", "null"] {
            match classify(raw) {
                Reply::Unclassified { .. } => {}
                other => panic!("Expected Unclassified for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_recipe_card_serializes_expected_fields() {
        let card = RecipeCard {
            title: Some("Toast".to_string()),
            ingredients: vec!["bread".to_string()],
            instructions: vec!["toast it".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["title"], "Toast");
        assert_eq!(json["ingredients"][0], "bread");
        assert_eq!(json["instructions"][0], "toast it");
    }
}
