//! RESECT-90, simplified 90-day mortality estimate after lung resection.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{band, InputField, ScoreRange, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Resect90Input {
    pub age: Option<i32>,
    pub male: bool,
    pub fev1_pct: Option<i32>,
    pub dlco_pct: Option<i32>,
    pub pneumonectomy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Resect90Result {
    pub score: i32,
    pub risk: String,
}

pub fn calculate_resect90(
    age: i32,
    male: bool,
    fev1_pct: i32,
    dlco_pct: i32,
    pneumonectomy: bool,
) -> Resect90Result {
    let score = [
        (age >= 70, 2),
        (male, 1),
        (fev1_pct < 60, 2),
        (dlco_pct < 60, 2),
        (pneumonectomy, 3),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, points)| points)
    .sum();

    let risk = band(
        score,
        &[
            (1, "Nízke riziko (<2%)"),
            (3, "Stredné riziko (~5%)"),
            (5, "Vyššie riziko (~10%)"),
        ],
        "Vysoké riziko (>15%)",
    );
    Resect90Result {
        score,
        risk: risk.to_string(),
    }
}

pub struct Resect90;

impl Calculator for Resect90 {
    fn id(&self) -> &str {
        "resect90"
    }

    fn name(&self) -> &str {
        "RESECT-90"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let pct = ScoreRange::stepped(0.0, 200.0, 1.0);
            vec![
                InputField::integer("age", "Vek (roky)")
                    .range(ScoreRange::stepped(0.0, 120.0, 1.0))
                    .required(),
                InputField::flag("male", "Muž"),
                InputField::integer("fev1_pct", "FEV₁ (% pred)").range(pct).required(),
                InputField::integer("dlco_pct", "DLCO (% pred)").range(pct).required(),
                InputField::flag("pneumonectomy", "Pneumonektómia"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: Resect90Input = parse_input(self.id(), input)?;
        let (Some(age), Some(fev1), Some(dlco)) = (parsed.age, parsed.fev1_pct, parsed.dlco_pct)
        else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_resect90(age, parsed.male, fev1, dlco, parsed.pneumonectomy);
        let summary = format!("Skóre: {} → {}", result.score, result.risk);
        finish(self, input, summary, &result, Vec::new())
    }
}
