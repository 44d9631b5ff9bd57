//! CURB-65 for community-acquired pneumonia.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{count_met, InputField};
use crate::{finish, parse_input, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Curb65Input {
    pub confusion: bool,
    /// Urea > 7 mmol/L.
    pub urea_high: bool,
    /// Respiratory rate ≥ 30/min.
    pub rr_high: bool,
    /// Systolic < 90 or diastolic ≤ 60 mmHg.
    pub low_bp: bool,
    pub age_65: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Curb65Result {
    pub score: i32,
    pub risk: String,
    pub recommendation: String,
}

pub fn calculate_curb65(input: &Curb65Input) -> Curb65Result {
    let score = count_met(&[
        input.confusion,
        input.urea_high,
        input.rr_high,
        input.low_bp,
        input.age_65,
    ]);
    let (risk, recommendation) = match score {
        0 | 1 => ("Nízke riziko (≤3% mortalita)", "Ambulantná liečba"),
        2 => (
            "Stredné riziko (~9% mortalita)",
            "Zvážiť krátku hospitalizáciu alebo bližšie sledovanie",
        ),
        _ => ("Vysoké riziko (22–40% mortalita)", "Hospitalizácia, zvážiť JIS"),
    };
    Curb65Result {
        score,
        risk: risk.to_string(),
        recommendation: recommendation.to_string(),
    }
}

pub struct Curb65;

impl Calculator for Curb65 {
    fn id(&self) -> &str {
        "curb65"
    }

    fn name(&self) -> &str {
        "CURB-65"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::flag("confusion", "Zmätenosť"),
                InputField::flag("urea_high", "Urea > 7 mmol/L"),
                InputField::flag("rr_high", "Dychová frekvencia ≥ 30/min"),
                InputField::flag("low_bp", "TK sys < 90 alebo dia ≤ 60 mmHg"),
                InputField::flag("age_65", "Vek ≥ 65 rokov"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: Curb65Input = parse_input(self.id(), input)?;
        let result = calculate_curb65(&parsed);
        let summary = format!(
            "Skóre: {} • {} • Odporúčanie: {}",
            result.score, result.risk, result.recommendation
        );
        finish(self, input, summary, &result, Vec::new())
    }
}
