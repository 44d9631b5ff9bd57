//! COPD Assessment Test.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{band, InputField, ScoreRange};
use crate::{finish, parse_input, prompt, Calculator};

pub const QUESTIONS: usize = 8;
pub const PROMPT: &str = "Odpovedzte na všetkých 8 otázok (0–5).";

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CatInput {
    /// One answer (0–5) per question.
    pub answers: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatResult {
    pub total: i32,
    pub impact: String,
}

pub fn calculate_cat(answers: &[i32]) -> CatResult {
    let total = answers.iter().sum();
    let impact = band(
        total,
        &[(9, "Nízky vplyv"), (20, "Stredný vplyv"), (30, "Vysoký vplyv")],
        "Veľmi vysoký vplyv",
    );
    CatResult {
        total,
        impact: impact.to_string(),
    }
}

pub struct Cat;

impl Calculator for Cat {
    fn id(&self) -> &str {
        "cat"
    }

    fn name(&self) -> &str {
        "CAT skóre"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::answers("answers", "Odpovede 1–8", ScoreRange::stepped(0.0, 5.0, 1.0))
                    .required(),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: CatInput = parse_input(self.id(), input)?;
        if parsed.answers.len() != QUESTIONS {
            return prompt(self, input, PROMPT);
        }
        let result = calculate_cat(&parsed.answers);
        let summary = format!("CAT skóre: {} • {}", result.total, result.impact);
        finish(self, input, summary, &result, Vec::new())
    }
}
