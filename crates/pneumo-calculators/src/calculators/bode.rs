//! BODE index for COPD (BMI, obstruction, dyspnoea, exercise capacity).

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::display_decimal;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{band, InputField, ScoreRange, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct BodeInput {
    pub bmi: Option<f64>,
    /// FEV₁ in % of predicted.
    pub fev1_pct: Option<f64>,
    pub mmrc: Option<i32>,
    /// Six-minute walk distance, m.
    pub six_minute_walk: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BodeResult {
    pub score: i32,
    pub mortality_risk: String,
    pub details: Vec<String>,
}

fn fev1_points(fev1: f64) -> i32 {
    // Values between the closed bands (64.95, 49.95) score 3.
    if fev1 >= 65.0 {
        0
    } else if (50.0..=64.9).contains(&fev1) {
        1
    } else if (36.0..=49.9).contains(&fev1) {
        2
    } else {
        3
    }
}

fn mmrc_points(mmrc: i32) -> i32 {
    match mmrc {
        2 => 1,
        3 => 2,
        4 => 3,
        _ => 0,
    }
}

fn walk_points(metres: i32) -> i32 {
    match metres {
        350.. => 0,
        250..=349 => 1,
        150..=249 => 2,
        _ => 3,
    }
}

pub fn calculate_bode(bmi: f64, fev1_pct: f64, mmrc: i32, six_minute_walk: i32) -> BodeResult {
    let bmi_points = i32::from(bmi < 21.0);
    let fev1 = fev1_points(fev1_pct);
    let dyspnoea = mmrc_points(mmrc);
    let walk = walk_points(six_minute_walk);
    let score = bmi_points + fev1 + dyspnoea + walk;

    let details = vec![
        format!("BMI: {} → {bmi_points} b.", display_decimal(bmi)),
        format!("FEV₁ %: {} → {fev1} b.", display_decimal(fev1_pct)),
        format!("mMRC: {mmrc} → {dyspnoea} b."),
        format!("6MWD: {six_minute_walk} m → {walk} b."),
    ];
    let mortality_risk = band(
        score,
        &[(2, "Nízke riziko"), (4, "Stredné riziko"), (6, "Vyššie riziko")],
        "Vysoké riziko",
    );

    BodeResult {
        score,
        mortality_risk: mortality_risk.to_string(),
        details,
    }
}

pub struct Bode;

impl Calculator for Bode {
    fn id(&self) -> &str {
        "bode"
    }

    fn name(&self) -> &str {
        "BODE index"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::number("bmi", "BMI (kg/m²)").range(ScoreRange::new(10.0, 70.0)).required(),
                InputField::number("fev1_pct", "FEV₁ (% pred)")
                    .range(ScoreRange::new(0.0, 200.0))
                    .required(),
                InputField::integer("mmrc", "mMRC (0–4)")
                    .range(ScoreRange::stepped(0.0, 4.0, 1.0))
                    .required(),
                InputField::integer("six_minute_walk", "6MWD (m)")
                    .range(ScoreRange::stepped(0.0, 2000.0, 1.0))
                    .required(),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: BodeInput = parse_input(self.id(), input)?;
        let (Some(bmi), Some(fev1), Some(mmrc), Some(walk)) =
            (parsed.bmi, parsed.fev1_pct, parsed.mmrc, parsed.six_minute_walk)
        else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = calculate_bode(bmi, fev1, mmrc, walk);
        let summary = format!("BODE skóre: {} • {}", result.score, result.mortality_risk);
        finish(self, input, summary, &result, result.details.clone())
    }
}
