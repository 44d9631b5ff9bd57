use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Report text when a score is missing one of its inputs.
pub const MISSING_VALUES: &str = "Zadajte všetky vstupné hodnoty.";

/// How a calculator input is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldKind {
    /// Decimal number (z-score, % predicted, litres, cm, ...).
    Number,
    /// Whole number (age, heart rate, point score).
    Integer,
    /// Checkbox.
    Flag,
    /// One of the listed `choices`.
    Choice,
    /// Several of the listed `choices` (lymph-node stations).
    MultiChoice,
    /// Fixed-length list of integer answers (questionnaires).
    Answers,
}

/// Defines the valid range for a numeric input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScoreRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub const fn stepped(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// One input of a calculator, as the form collecting it sees it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InputField {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub range: Option<ScoreRange>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl InputField {
    pub fn number(id: &str, label: &str) -> Self {
        Self::plain(id, label, FieldKind::Number)
    }

    pub fn integer(id: &str, label: &str) -> Self {
        Self::plain(id, label, FieldKind::Integer)
    }

    pub fn flag(id: &str, label: &str) -> Self {
        Self::plain(id, label, FieldKind::Flag)
    }

    pub fn choice(id: &str, label: &str, choices: &[&str]) -> Self {
        Self {
            choices: choices.iter().map(|c| c.to_string()).collect(),
            ..Self::plain(id, label, FieldKind::Choice)
        }
    }

    pub fn multi_choice(id: &str, label: &str, choices: &[&str]) -> Self {
        Self {
            choices: choices.iter().map(|c| c.to_string()).collect(),
            ..Self::plain(id, label, FieldKind::MultiChoice)
        }
    }

    pub fn answers(id: &str, label: &str, range: ScoreRange) -> Self {
        Self {
            range: Some(range),
            ..Self::plain(id, label, FieldKind::Answers)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn range(mut self, range: ScoreRange) -> Self {
        self.range = Some(range);
        self
    }

    fn plain(id: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            range: None,
            required: false,
            choices: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub field_id: String,
    pub value: f64,
    pub expected_range: ScoreRange,
    pub message: String,
}

/// Label of the first band whose inclusive upper bound admits `score`,
/// `otherwise` when the score is above every band.
///
/// Bands must be sorted by ascending upper bound.
pub fn band<T: Copy>(score: i32, bands: &[(i32, T)], otherwise: T) -> T {
    bands
        .iter()
        .find(|(upper, _)| score <= *upper)
        .map(|(_, label)| *label)
        .unwrap_or(otherwise)
}

/// Number of criteria that are met.
pub fn count_met(criteria: &[bool]) -> i32 {
    criteria.iter().filter(|met| **met).count() as i32
}
