use super::SentimentModel;
use crate::error::SentimindError;
use serde::Deserialize;
use std::collections::HashMap;
use std::{fs, path::Path};
use tracing::info;

/// Bag-of-words linear model exported from training as
/// `{"bias": f64, "weights": {"token": f64, ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    bias: f64,
    weights: HashMap<String, f64>,
}

impl LinearModel {
    pub fn new(bias: f64, weights: HashMap<String, f64>) -> Self {
        Self { bias, weights }
    }

    /// Read the artifact once at startup.
    pub fn load(path: &Path) -> Result<Self, SentimindError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SentimindError::ModelLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        let model: Self = serde_json::from_str(&contents).map_err(|e| {
            SentimindError::ModelLoad(format!("malformed model {}: {e}", path.display()))
        })?;
        info!(
            path = %path.display(),
            vocabulary = model.weights.len(),
            "sentiment model loaded"
        );
        Ok(model)
    }

    pub fn decision(&self, text: &str) -> f64 {
        tokens(text)
            .filter_map(|t| self.weights.get(&t))
            .fold(self.bias, |acc, w| acc + w)
    }
}

impl SentimentModel for LinearModel {
    fn predict(&self, text: &str) -> u8 {
        u8::from(self.decision(text) > 0.0)
    }
}

/// Lowercased alphanumeric runs; apostrophes are dropped so "don't" reads as "dont".
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.chars().filter(|c| *c != '\'').flat_map(char::to_lowercase).collect::<String>())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        serde_json::from_str(
            r#"{"bias": -0.1, "weights": {"love": 1.5, "great": 1.0, "hate": -2.0, "dont": -0.8}}"#,
        )
        .unwrap()
    }

    #[test]
    fn tokenizer_lowercases_and_strips_punctuation() {
        let t: Vec<String> = tokens("I LOVE this, don't you?!").collect();
        assert_eq!(t, vec!["i", "love", "this", "dont", "you"]);
    }

    #[test]
    fn positive_weight_wins() {
        assert_eq!(model().predict("I love this"), 1);
        assert_eq!(model().predict("I hate this"), 0);
    }

    #[test]
    fn unknown_words_fall_back_to_the_bias() {
        assert_eq!(model().predict("completely unseen words"), 0);
        let m = LinearModel::new(0.5, HashMap::new());
        assert_eq!(m.predict("anything"), 1);
    }

    #[test]
    fn missing_file_is_a_model_load_error() {
        let err = LinearModel::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SentimindError::ModelLoad(_)));
    }
}
