//! Revised Geneva score, clinical probability of pulmonary embolism.

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
pub struct GenevaInput {
    pub age_65: bool,
    pub previous_vte: bool,
    pub surgery_or_fracture: bool,
    pub active_cancer: bool,
    pub unilateral_leg_pain: bool,
    pub hemoptysis: bool,
    /// Beats per minute.
    pub heart_rate: Option<i32>,
    /// Pain on deep venous palpation and unilateral oedema.
    pub leg_swelling: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenevaResult {
    pub score: i32,
    pub risk: String,
}

pub fn calculate_geneva(input: &GenevaInput, heart_rate: i32) -> GenevaResult {
    let weighted = [
        (input.age_65, 1),
        (input.previous_vte, 3),
        (input.surgery_or_fracture, 2),
        (input.active_cancer, 2),
        (input.unilateral_leg_pain, 3),
        (input.hemoptysis, 2),
        (input.leg_swelling, 4),
    ];
    let heart_points = match heart_rate {
        75..=94 => 3,
        95.. => 5,
        _ => 0,
    };
    let score = weighted
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum::<i32>()
        + heart_points;

    let risk = band(
        score,
        &[(3, "Nízka pravdepodobnosť"), (10, "Stredná pravdepodobnosť")],
        "Vysoká pravdepodobnosť",
    );
    GenevaResult {
        score,
        risk: risk.to_string(),
    }
}

pub struct Geneva;

impl Calculator for Geneva {
    fn id(&self) -> &str {
        "geneva"
    }

    fn name(&self) -> &str {
        "Revidované ženevské skóre na odhad pravdepodobnosti pľúcnej embólie"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::flag("age_65", "Vek > 65 rokov"),
                InputField::flag("previous_vte", "Predchádzajúca VTE"),
                InputField::flag("surgery_or_fracture", "Operácia alebo fraktúra v poslednom mesiaci"),
                InputField::flag("active_cancer", "Aktívna malignita"),
                InputField::flag("unilateral_leg_pain", "Jednostranná bolesť DK"),
                InputField::flag("hemoptysis", "Hemoptýza"),
                InputField::integer("heart_rate", "Srdcová frekvencia (/min)")
                    .range(ScoreRange::stepped(0.0, 300.0, 1.0))
                    .required(),
                InputField::flag("leg_swelling", "Bolesť pri palpácii DK a jednostranný opuch"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: GenevaInput = parse_input(self.id(), input)?;
        let Some(heart_rate) = parsed.heart_rate else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_geneva(&parsed, heart_rate);
        let summary = format!("Skóre: {} • {}", result.score, result.risk);
        finish(self, input, summary, &result, Vec::new())
    }
}
