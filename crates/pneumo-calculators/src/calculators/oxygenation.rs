//! SpO₂/FiO₂ ratio.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::fixed_half_up;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct OxygenationInput {
    /// %
    pub spo2: Option<i32>,
    /// Fraction, 0.21 on room air.
    pub fio2: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OxygenationResult {
    pub ratio: f64,
    pub interpretation: String,
}

pub fn calculate_spo2_fio2(spo2: i32, fio2: f64) -> OxygenationResult {
    let ratio = f64::from(spo2) / fio2;
    // (314.9, 315) falls through to severe.
    let interpretation = if ratio >= 315.0 {
        "Normálne / mierne znížené"
    } else if (235.0..=314.9).contains(&ratio) {
        "Stredné poškodenie oxigenácie"
    } else {
        "Ťažké poškodenie oxigenácie"
    };
    OxygenationResult {
        ratio,
        interpretation: interpretation.to_string(),
    }
}

pub struct Oxygenation;

impl Calculator for Oxygenation {
    fn id(&self) -> &str {
        "spo2_fio2"
    }

    fn name(&self) -> &str {
        "Oxygenačný index"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::integer("spo2", "SpO₂ (%)")
                    .range(ScoreRange::stepped(0.0, 100.0, 1.0))
                    .required(),
                InputField::number("fio2", "FiO₂ (0.21–1.0)")
                    .range(ScoreRange::new(0.21, 1.0))
                    .required(),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: OxygenationInput = parse_input(self.id(), input)?;
        let (Some(spo2), Some(fio2)) = (parsed.spo2, parsed.fio2) else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_spo2_fio2(spo2, fio2);
        let summary = format!(
            "SpO₂/FiO₂ = {} • {}",
            fixed_half_up(result.ratio, 1),
            result.interpretation
        );
        finish(self, input, summary, &result, Vec::new())
    }
}
