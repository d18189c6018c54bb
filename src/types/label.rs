use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical sentiment label. Only this form is stored; glyphs are a display concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Map the model's binary class: 1 is Positive, anything else Negative.
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
        }
    }

    /// Decode a stored prediction, including rows written in the decorated
    /// `"😊 Positive"` form by older deployments.
    pub fn from_stored(raw: &str) -> Self {
        match raw.parse() {
            Ok(label) => label,
            Err(_) if raw.contains("Positive") => Label::Positive,
            Err(_) => Label::Negative,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Label::Positive),
            "Negative" => Ok(Label::Negative),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_one_is_positive_everything_else_negative() {
        assert_eq!(Label::from_class(1), Label::Positive);
        assert_eq!(Label::from_class(0), Label::Negative);
        assert_eq!(Label::from_class(7), Label::Negative);
    }

    #[test]
    fn decorated_legacy_rows_are_normalised() {
        assert_eq!(Label::from_stored("😊 Positive"), Label::Positive);
        assert_eq!(Label::from_stored("☹️ Negative"), Label::Negative);
        assert_eq!(Label::from_stored("Positive"), Label::Positive);
    }
}
