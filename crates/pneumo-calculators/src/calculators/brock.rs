//! Brock (PanCan) malignancy probability for lung nodules, full model with
//! spiculation and a centred size term.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::fixed_half_up;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, prompt, Calculator};

/// Age the model is centred on, also used when age is not given.
pub const DEFAULT_AGE: i32 = 62;
pub const DEFAULT_NODULE_COUNT: i32 = 1;
pub const DEFAULT_HIGH_RISK_CUTOFF_PERCENT: f64 = 5.0;

pub const PROMPT: &str = "Zadajte priemer nodulu (mm).";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NoduleType {
    #[default]
    Solid,
    PartSolid,
    NonSolid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum RiskCategory {
    Low,
    High,
}

/// Model covariates with every default already resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BrockFactors {
    pub age: i32,
    pub female: bool,
    pub family_history: bool,
    pub emphysema: bool,
    /// Mean of long and short axis, mm.
    pub diameter_mm: f64,
    pub nodule_type: NoduleType,
    pub upper_lobe: bool,
    pub nodule_count: i32,
    pub spiculation: bool,
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// Probability of malignancy, 0..1. NaN when the diameter is not positive.
pub fn probability(f: &BrockFactors) -> f64 {
    if f.diameter_mm <= 0.0 {
        return f64::NAN;
    }

    let diameter_cm = f.diameter_mm / 10.0;
    let size_term = diameter_cm.powf(-0.5) - 1.58113883;

    let logit = 0.0287 * (f64::from(f.age) - f64::from(DEFAULT_AGE))
        + 0.6011 * indicator(f.female)
        + 0.2961 * indicator(f.family_history)
        + 0.2953 * indicator(f.emphysema)
        - 5.3854 * size_term
        + 0.377 * indicator(f.nodule_type == NoduleType::PartSolid)
        - 0.1276 * indicator(f.nodule_type == NoduleType::NonSolid)
        + 0.6581 * indicator(f.upper_lobe)
        - 0.0824 * (f64::from(f.nodule_count) - 4.0)
        + 0.7729 * indicator(f.spiculation)
        - 6.7892;

    let odds = logit.exp();
    odds / (1.0 + odds)
}

pub fn category(probability: f64, high_risk_cutoff_percent: f64) -> RiskCategory {
    if probability * 100.0 >= high_risk_cutoff_percent {
        RiskCategory::High
    } else {
        RiskCategory::Low
    }
}

/// "Brock riziko: 12.3 % (HIGH ≥ 5 %)"
pub fn risk_note(probability: f64, high_risk: bool, cutoff_percent: f64) -> String {
    // The cutoff is printed truncated to whole percent.
    let cutoff = cutoff_percent.trunc() as i64;
    let band = if high_risk {
        format!("(HIGH ≥ {cutoff} %)")
    } else {
        format!("(LOW < {cutoff} %)")
    };
    format!(
        "Brock riziko: {} % {band}",
        fixed_half_up(probability * 100.0, 1)
    )
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct BrockInput {
    pub age: Option<i32>,
    pub female: bool,
    pub family_history: bool,
    pub emphysema: bool,
    pub diameter_mm: Option<f64>,
    pub nodule_type: NoduleType,
    pub upper_lobe: bool,
    pub nodule_count: Option<i32>,
    pub spiculation: bool,
    pub high_risk_cutoff_percent: Option<f64>,
}

impl BrockInput {
    /// Fill in the absent covariates. Age falls back to 62 and the nodule
    /// count to 1; both are logged.
    pub fn factors(&self, diameter_mm: f64) -> BrockFactors {
        let age = self.age.unwrap_or_else(|| {
            tracing::warn!(default = DEFAULT_AGE, "brock: age missing, using default");
            DEFAULT_AGE
        });
        let nodule_count = self.nodule_count.unwrap_or_else(|| {
            tracing::warn!(default = DEFAULT_NODULE_COUNT, "brock: nodule count missing, using default");
            DEFAULT_NODULE_COUNT
        });
        BrockFactors {
            age,
            female: self.female,
            family_history: self.family_history,
            emphysema: self.emphysema,
            diameter_mm,
            nodule_type: self.nodule_type,
            upper_lobe: self.upper_lobe,
            nodule_count,
            spiculation: self.spiculation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BrockResult {
    pub factors: BrockFactors,
    /// Absent when the model is undefined for the given diameter.
    pub probability: Option<f64>,
    pub category: Option<RiskCategory>,
}

pub struct Brock;

impl Calculator for Brock {
    fn id(&self) -> &str {
        "brock"
    }

    fn name(&self) -> &str {
        "Brock (PanCan) model"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::integer("age", "Vek pacienta (r.)").range(ScoreRange::stepped(0.0, 120.0, 1.0)),
                InputField::flag("female", "Žena"),
                InputField::flag("family_history", "Rodinná anamnéza karcinómu pľúc"),
                InputField::flag("emphysema", "Emfyzém"),
                InputField::number("diameter_mm", "Priemer nodulu (mm)")
                    .range(ScoreRange::new(0.0, 300.0))
                    .required(),
                InputField::choice("nodule_type", "Typ nodulu", &["solid", "part_solid", "non_solid"]),
                InputField::flag("upper_lobe", "Horný lalok"),
                InputField::integer("nodule_count", "Počet uzlov").range(ScoreRange::stepped(1.0, 100.0, 1.0)),
                InputField::flag("spiculation", "Spikulácie"),
                InputField::number("high_risk_cutoff_percent", "Prah vysokého rizika (%)")
                    .range(ScoreRange::new(0.0, 100.0)),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: BrockInput = parse_input(self.id(), input)?;
        let Some(diameter) = parsed.diameter_mm else {
            return prompt(self, input, PROMPT);
        };
        let cutoff = parsed
            .high_risk_cutoff_percent
            .unwrap_or(DEFAULT_HIGH_RISK_CUTOFF_PERCENT);
        let factors = parsed.factors(diameter);
        let p = probability(&factors);

        let (summary, result) = if p.is_nan() {
            (
                "Brock riziko nie je možné vypočítať (priemer musí byť > 0 mm).".to_string(),
                BrockResult {
                    factors,
                    probability: None,
                    category: None,
                },
            )
        } else {
            let category = category(p, cutoff);
            (
                risk_note(p, category == RiskCategory::High, cutoff),
                BrockResult {
                    factors,
                    probability: Some(p),
                    category: Some(category),
                },
            )
        };
        finish(self, input, summary, &result, Vec::new())
    }
}
