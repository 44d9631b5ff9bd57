//! STOP-BANG screening for obstructive sleep apnoea.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{band, count_met, InputField, ScoreRange, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct StopBangInput {
    pub snoring: bool,
    pub tired: bool,
    pub observed_apnoea: bool,
    pub hypertension: bool,
    pub bmi: Option<f64>,
    pub age: Option<i32>,
    /// cm
    pub neck_circumference: Option<f64>,
    pub male: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StopBangResult {
    pub score: i32,
    pub risk: String,
}

pub fn calculate_stopbang(
    input: &StopBangInput,
    bmi: f64,
    age: i32,
    neck_circumference: f64,
) -> StopBangResult {
    let score = count_met(&[
        input.snoring,
        input.tired,
        input.observed_apnoea,
        input.hypertension,
        bmi > 35.0,
        age > 50,
        neck_circumference > 40.0,
        input.male,
    ]);
    let risk = band(
        score,
        &[(2, "Nízke riziko OSA"), (4, "Stredné riziko OSA")],
        "Vysoké riziko OSA",
    );
    StopBangResult {
        score,
        risk: risk.to_string(),
    }
}

pub struct StopBang;

impl Calculator for StopBang {
    fn id(&self) -> &str {
        "stopbang"
    }

    fn name(&self) -> &str {
        "STOP-BANG"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::flag("snoring", "Chrápanie"),
                InputField::flag("tired", "Únava počas dňa"),
                InputField::flag("observed_apnoea", "Pozorované apnoe"),
                InputField::flag("hypertension", "Hypertenzia"),
                InputField::number("bmi", "BMI (kg/m²)").range(ScoreRange::new(10.0, 80.0)).required(),
                InputField::integer("age", "Vek (roky)")
                    .range(ScoreRange::stepped(0.0, 120.0, 1.0))
                    .required(),
                InputField::number("neck_circumference", "Obvod krku (cm)")
                    .range(ScoreRange::new(20.0, 80.0))
                    .required(),
                InputField::flag("male", "Muž"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: StopBangInput = parse_input(self.id(), input)?;
        let (Some(bmi), Some(age), Some(neck)) = (parsed.bmi, parsed.age, parsed.neck_circumference)
        else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_stopbang(&parsed, bmi, age, neck);
        let summary = format!("Skóre: {} → {}", result.score, result.risk);
        finish(self, input, summary, &result, Vec::new())
    }
}
