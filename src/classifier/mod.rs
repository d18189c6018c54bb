//! Classifier Adapter: the boundary around the externally trained sentiment model.

pub mod linear;

pub use linear::LinearModel;

use crate::error::ValidationError;
use crate::types::Label;
use serde::Serialize;
use std::sync::Arc;

/// An opaque binary sentiment model: 1 for positive, 0 for negative.
pub trait SentimentModel: Send + Sync {
    fn predict(&self, text: &str) -> u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f64,
}

/// Wraps the loaded model. Cheap to clone; the model is shared for the process lifetime.
#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn SentimentModel>,
    confidence: f64,
}

impl Classifier {
    /// `confidence` is reported as-is with every prediction; the wrapped
    /// model does not expose a calibrated score.
    pub fn new(model: Arc<dyn SentimentModel>, confidence: f64) -> Self {
        Self { model, confidence }
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        Ok(Prediction {
            label: Label::from_class(self.model.predict(text)),
            confidence: self.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(u8);

    impl SentimentModel for Always {
        fn predict(&self, _text: &str) -> u8 {
            self.0
        }
    }

    #[test]
    fn maps_classes_and_reports_fixed_confidence() {
        let pos = Classifier::new(Arc::new(Always(1)), 0.9);
        assert_eq!(
            pos.predict("I love this"),
            Ok(Prediction {
                label: Label::Positive,
                confidence: 0.9
            })
        );
        let neg = Classifier::new(Arc::new(Always(0)), 0.9);
        assert_eq!(neg.predict("meh").map(|p| p.label), Ok(Label::Negative));
    }

    #[test]
    fn blank_input_never_reaches_the_model() {
        struct Panics;
        impl SentimentModel for Panics {
            fn predict(&self, _text: &str) -> u8 {
                panic!("model must not be invoked for blank input");
            }
        }
        let c = Classifier::new(Arc::new(Panics), 0.9);
        assert_eq!(c.predict(""), Err(ValidationError::EmptyInput));
        assert_eq!(c.predict(" \t\n"), Err(ValidationError::EmptyInput));
    }
}
