//! Modified Medical Research Council dyspnoea scale.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct MmrcInput {
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MmrcResult {
    pub score: i32,
    pub description: String,
}

pub fn describe(score: i32) -> &'static str {
    match score {
        0 => "Dyspnoe len pri veľmi namáhavej námahe.",
        1 => "Dyspnoe pri rýchlej chôdzi alebo miernom stúpaní.",
        2 => "Chôdza pomalšia než rovesníci, prestávky pri chôdzi v rovine.",
        3 => "Po 100 metroch alebo pár minútach chôdze musí zastaviť.",
        4 => "Dyspnoe aj pri obliekaní alebo v pokoji.",
        _ => "Neplatné skóre.",
    }
}

pub struct Mmrc;

impl Calculator for Mmrc {
    fn id(&self) -> &str {
        "mmrc"
    }

    fn name(&self) -> &str {
        "mMRC skóre"
    }

    // Out-of-range grades are answered in the report, so no range here.
    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![InputField::integer("score", "Stupeň dyspnoe (0–4)").required()]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: MmrcInput = parse_input(self.id(), input)?;
        let Some(score) = parsed.score else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = MmrcResult {
            score,
            description: describe(score).to_string(),
        };
        let summary = format!("Výsledok: mMRC {score} • {}", result.description);
        finish(self, input, summary, &result, Vec::new())
    }
}
