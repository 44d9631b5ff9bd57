//! Pulmonary Embolism Severity Index.

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
pub struct PesiInput {
    pub age: Option<i32>,
    pub male: bool,
    pub cancer: bool,
    pub heart_failure: bool,
    pub chronic_lung_disease: bool,
    pub pulse: Option<i32>,
    /// Systolic blood pressure, mmHg.
    pub sbp: Option<i32>,
    pub respiratory_rate: Option<i32>,
    /// °C
    pub temperature: Option<f64>,
    pub altered_mental_status: bool,
    pub spo2: Option<i32>,
}

/// Vital signs that every PESI evaluation needs.
#[derive(Debug, Clone, Copy)]
pub struct PesiVitals {
    pub age: i32,
    pub pulse: i32,
    pub sbp: i32,
    pub respiratory_rate: i32,
    pub temperature: f64,
    pub spo2: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PesiResult {
    pub score: i32,
    pub class_group: String,
    pub mortality: String,
}

pub fn calculate_pesi(input: &PesiInput, vitals: PesiVitals) -> PesiResult {
    let findings = [
        (!input.male, -10),
        (input.cancer, 30),
        (input.heart_failure, 10),
        (input.chronic_lung_disease, 10),
        (vitals.pulse >= 110, 20),
        (vitals.sbp < 100, 30),
        (vitals.respiratory_rate >= 30, 20),
        (vitals.temperature < 36.0, 20),
        (input.altered_mental_status, 60),
        (vitals.spo2 < 90, 20),
    ];
    let score = vitals.age
        + findings
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, points)| points)
            .sum::<i32>();

    let (class_group, mortality) = band(
        score,
        &[
            (65, ("I", "~1%")),
            (85, ("II", "~2%")),
            (105, ("III", "~3-7%")),
            (125, ("IV", "~11%")),
        ],
        ("V", "~25%"),
    );
    PesiResult {
        score,
        class_group: class_group.to_string(),
        mortality: mortality.to_string(),
    }
}

pub struct Pesi;

impl Calculator for Pesi {
    fn id(&self) -> &str {
        "pesi"
    }

    fn name(&self) -> &str {
        "PESI skóre"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let whole = |max: f64| ScoreRange::stepped(0.0, max, 1.0);
            vec![
                InputField::integer("age", "Vek (roky)").range(whole(120.0)).required(),
                InputField::flag("male", "Muž"),
                InputField::flag("cancer", "Malignita"),
                InputField::flag("heart_failure", "Chronické srdcové zlyhanie"),
                InputField::flag("chronic_lung_disease", "Chronické pľúcne ochorenie"),
                InputField::integer("pulse", "Pulz (/min)").range(whole(300.0)).required(),
                InputField::integer("sbp", "Systolický TK (mmHg)").range(whole(300.0)).required(),
                InputField::integer("respiratory_rate", "Dychová frekvencia (/min)")
                    .range(whole(100.0))
                    .required(),
                InputField::number("temperature", "Teplota (°C)")
                    .range(ScoreRange::new(25.0, 45.0))
                    .required(),
                InputField::flag("altered_mental_status", "Zmenený stav vedomia"),
                InputField::integer("spo2", "SpO₂ (%)").range(whole(100.0)).required(),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: PesiInput = parse_input(self.id(), input)?;
        let (Some(age), Some(pulse), Some(sbp), Some(respiratory_rate), Some(temperature), Some(spo2)) = (
            parsed.age,
            parsed.pulse,
            parsed.sbp,
            parsed.respiratory_rate,
            parsed.temperature,
            parsed.spo2,
        ) else {
            return prompt(self, input, MISSING_VALUES);
        };
        let vitals = PesiVitals {
            age,
            pulse,
            sbp,
            respiratory_rate,
            temperature,
            spo2,
        };
        let result = calculate_pesi(&parsed, vitals);
        let summary = format!(
            "Skóre: {} • Trieda {} • Mortalita {}",
            result.score, result.class_group, result.mortality
        );
        finish(self, input, summary, &result, Vec::new())
    }
}
