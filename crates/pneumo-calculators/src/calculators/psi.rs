//! Pneumonia Severity Index (PORT), simplified bedside version without
//! laboratory findings.

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
pub struct PsiInput {
    pub age: Option<i32>,
    pub male: bool,
    pub nursing_home: bool,
    pub neoplastic: bool,
    pub liver: bool,
    pub heart_failure: bool,
    pub cerebrovascular: bool,
    pub renal: bool,
    pub respiratory_rate: Option<i32>,
    pub sbp: Option<i32>,
    pub temperature: Option<f64>,
    pub pulse: Option<i32>,
    pub confusion: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PsiResult {
    pub score: i32,
    pub risk_class: String,
    pub mortality: String,
    pub recommendation: String,
}

pub fn calculate_psi(
    input: &PsiInput,
    age: i32,
    respiratory_rate: i32,
    sbp: i32,
    temperature: f64,
    pulse: i32,
) -> PsiResult {
    let findings = [
        (!input.male, -10),
        (input.nursing_home, 10),
        (input.neoplastic, 30),
        (input.liver, 20),
        (input.heart_failure, 10),
        (input.cerebrovascular, 10),
        (input.renal, 10),
        (respiratory_rate >= 30, 20),
        (sbp < 90, 20),
        (!(35.0..=40.0).contains(&temperature), 15),
        (pulse >= 125, 10),
        (input.confusion, 20),
    ];
    let score = age
        + findings
            .iter()
            .filter(|(present, _)| *present)
            .map(|(_, points)| points)
            .sum::<i32>();

    let (risk_class, mortality, recommendation) = band(
        score,
        &[
            (50, ("I", "<1%", "Ambulantná liečba")),
            (70, ("II", "<1%", "Ambulantná liečba")),
            (90, ("III", "~1-3%", "Krátka hospitalizácia alebo sledovanie")),
            (130, ("IV", "~8-9%", "Hospitalizácia")),
        ],
        ("V", "~27-30%", "Hospitalizácia, zvážiť JIS"),
    );
    PsiResult {
        score,
        risk_class: risk_class.to_string(),
        mortality: mortality.to_string(),
        recommendation: recommendation.to_string(),
    }
}

pub struct Psi;

impl Calculator for Psi {
    fn id(&self) -> &str {
        "psi"
    }

    fn name(&self) -> &str {
        "PSI skóre"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let whole = |max: f64| ScoreRange::stepped(0.0, max, 1.0);
            vec![
                InputField::integer("age", "Vek (roky)").range(whole(120.0)).required(),
                InputField::flag("male", "Muž"),
                InputField::flag("nursing_home", "Pobyt v zariadení sociálnych služieb"),
                InputField::flag("neoplastic", "Nádorové ochorenie"),
                InputField::flag("liver", "Ochorenie pečene"),
                InputField::flag("heart_failure", "Srdcové zlyhanie"),
                InputField::flag("cerebrovascular", "Cerebrovaskulárne ochorenie"),
                InputField::flag("renal", "Ochorenie obličiek"),
                InputField::integer("respiratory_rate", "Dychová frekvencia (/min)")
                    .range(whole(100.0))
                    .required(),
                InputField::integer("sbp", "Systolický TK (mmHg)").range(whole(300.0)).required(),
                InputField::number("temperature", "Teplota (°C)")
                    .range(ScoreRange::new(25.0, 45.0))
                    .required(),
                InputField::integer("pulse", "Pulz (/min)").range(whole(300.0)).required(),
                InputField::flag("confusion", "Zmätenosť"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: PsiInput = parse_input(self.id(), input)?;
        let (Some(age), Some(rr), Some(sbp), Some(temperature), Some(pulse)) = (
            parsed.age,
            parsed.respiratory_rate,
            parsed.sbp,
            parsed.temperature,
            parsed.pulse,
        ) else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_psi(&parsed, age, rr, sbp, temperature, pulse);
        let summary = format!(
            "Skóre: {} • Trieda {} • Mortalita {} • Odporúčanie: {}",
            result.score, result.risk_class, result.mortality, result.recommendation
        );
        finish(self, input, summary, &result, Vec::new())
    }
}
