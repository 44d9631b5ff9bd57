//! Mayo Clinic model for a solitary pulmonary nodule.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::to_fixed;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct SpnInput {
    pub age: Option<i32>,
    pub smoker: bool,
    /// Extrathoracic cancer more than 5 years ago.
    pub cancer_history: bool,
    pub diameter_mm: Option<f64>,
    pub upper_lobe: bool,
    pub spiculation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpnResult {
    /// Percent.
    pub probability: f64,
    pub category: String,
}

pub fn calculate_spn(
    age: i32,
    smoker: bool,
    cancer_history: bool,
    diameter_mm: f64,
    upper_lobe: bool,
    spiculation: bool,
) -> SpnResult {
    let term = |present: bool, weight: f64| if present { weight } else { 0.0 };
    let x = -6.8272
        + 0.0391 * f64::from(age)
        + term(smoker, 0.7917)
        + term(cancer_history, 1.3388)
        + 0.1274 * diameter_mm
        + term(upper_lobe, 0.7838)
        + term(spiculation, 1.0407);

    let probability = 1.0 / (1.0 + (-x).exp()) * 100.0;
    let category = if probability < 5.0 {
        "Nízka pravdepodobnosť"
    } else if probability < 65.0 {
        "Stredná pravdepodobnosť"
    } else {
        "Vysoká pravdepodobnosť"
    };
    SpnResult {
        probability,
        category: category.to_string(),
    }
}

pub struct SolitaryNodule;

impl Calculator for SolitaryNodule {
    fn id(&self) -> &str {
        "spn"
    }

    fn name(&self) -> &str {
        "SPN skóre"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::integer("age", "Vek")
                    .range(ScoreRange::stepped(0.0, 120.0, 1.0))
                    .required(),
                InputField::flag("smoker", "Fajčiar"),
                InputField::flag("cancer_history", "Anamnéza malignity"),
                InputField::number("diameter_mm", "Priemer nodulu (mm)")
                    .range(ScoreRange::new(0.0, 300.0))
                    .required(),
                InputField::flag("upper_lobe", "Horný lalok"),
                InputField::flag("spiculation", "Spikulácie"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: SpnInput = parse_input(self.id(), input)?;
        let (Some(age), Some(diameter)) = (parsed.age, parsed.diameter_mm) else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_spn(
            age,
            parsed.smoker,
            parsed.cancer_history,
            diameter,
            parsed.upper_lobe,
            parsed.spiculation,
        );
        let summary = format!(
            "Riziko: {} % → {}",
            to_fixed(result.probability, 1),
            result.category
        );
        finish(self, input, summary, &result, Vec::new())
    }
}
