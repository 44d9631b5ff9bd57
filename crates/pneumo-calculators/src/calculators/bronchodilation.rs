//! Bronchodilator reversibility tests, ERS/ATS 2022 and ATS/ERS 2005 criteria.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::fixed_half_up;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, Calculator};

const Z_LLN: f64 = -1.645;
const RATIO_CUTOFF: f64 = 0.70;

pub const PROMPT_2022: &str =
    "Na ERS/ATS 2022 zadaj FEV₁ pred, FEV₁ po a FEV₁ predikovanú (v litroch).";
pub const PROMPT_2005: &str =
    "Na kritérium 2005 zadaj aspoň FEV₁ pred a po (v litroch). FVC je voliteľná.";

/// Volumes in litres; ratios either as z-scores or as absolute FEV₁/FVC
/// (fraction or percent).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct BronchodilationInput {
    pub fev1_pre: Option<f64>,
    pub fev1_post: Option<f64>,
    pub fev1_pred: Option<f64>,
    pub fvc_pre: Option<f64>,
    pub fvc_post: Option<f64>,
    pub fvc_pred: Option<f64>,
    pub ratio_pre: Option<f64>,
    pub ratio_post: Option<f64>,
    pub ratio_z_pre: Option<f64>,
    pub ratio_z_post: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ObstructionConclusion {
    None,
    Reversible,
    Irreversible,
}

impl ObstructionConclusion {
    pub fn phrase(self) -> &'static str {
        match self {
            ObstructionConclusion::None => "bez obštrukcie",
            ObstructionConclusion::Reversible => "reverzibilnú obštrukciu",
            ObstructionConclusion::Irreversible => "ireverzibilnú obštrukciu",
        }
    }
}

/// 70 → 0.70, 0.70 stays.
fn normalize_ratio(ratio: Option<f64>) -> Option<f64> {
    ratio.map(|r| if r > 1.5 { r / 100.0 } else { r })
}

/// Obstruction before and after bronchodilation. Z-scores are preferred;
/// without both of them the absolute ratio is compared with 0.70.
pub fn classify_obstruction(
    input: &BronchodilationInput,
    bd_positive: bool,
) -> Option<ObstructionConclusion> {
    let (pre_obstructed, post_obstructed) = match (input.ratio_z_pre, input.ratio_z_post) {
        (Some(pre), Some(post)) => (pre < Z_LLN, post < Z_LLN),
        _ => {
            let pre = normalize_ratio(input.ratio_pre)?;
            let post = normalize_ratio(input.ratio_post)?;
            (pre < RATIO_CUTOFF, post < RATIO_CUTOFF)
        }
    };

    Some(match (pre_obstructed, post_obstructed) {
        (false, false) => ObstructionConclusion::None,
        (true, false) if bd_positive => ObstructionConclusion::Reversible,
        _ => ObstructionConclusion::Irreversible,
    })
}

/// Sentence on the FEV₁/FVC z-score before and after bronchodilation.
/// Empty when neither is known.
pub fn reversibility_note(pre_z: Option<f64>, post_z: Option<f64>) -> &'static str {
    match (pre_z, post_z) {
        (None, None) => "",
        (Some(pre), None) if pre < Z_LLN => {
            "Východiskovo prítomná obštrukcia (FEV₁/FVC < LLN); reverzibilitu bez post-hodnoty nehodnotená."
        }
        (Some(_), None) => "Východiskovo bez obštrukcie (FEV₁/FVC ≥ LLN).",
        (None, Some(_)) => "Reverzibilitu obštrukcie nevieme posúdiť (chýba východiskový pomer).",
        (Some(pre), Some(post)) => {
            if pre < Z_LLN && post >= Z_LLN {
                "Reverzibilná obštrukcia (pomer po BD ≥ LLN)."
            } else if pre < Z_LLN && post < Z_LLN {
                "Ireverzibilná obštrukcia (pomer po BD < LLN)."
            } else if pre >= Z_LLN && post >= Z_LLN {
                "Bez obštrukcie (pomer pred aj po BD ≥ LLN)."
            } else if pre >= Z_LLN && post < Z_LLN {
                "Obštrukcia sa objavila po BD (neobvyklé; skontroluj kvalitu merania)."
            } else {
                ""
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bd2022Result {
    /// Change of FEV₁ in % of predicted.
    pub delta_fev1_pct_pred: f64,
    pub delta_fvc_pct_pred: Option<f64>,
    pub positive: bool,
    pub obstruction: Option<ObstructionConclusion>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bd2005Result {
    pub delta_fev1_ml: f64,
    pub delta_fev1_pct: f64,
    pub delta_fvc_ml: Option<f64>,
    pub delta_fvc_pct: Option<f64>,
    pub positive: bool,
    pub obstruction: Option<ObstructionConclusion>,
}

fn conclusion_part(obstruction: Option<ObstructionConclusion>) -> String {
    obstruction
        .map(|o| format!(" Záver podľa pomeru: {}.", o.phrase()))
        .unwrap_or_default()
}

/// Positive when FEV₁ or FVC improves by more than 10 % of predicted.
pub fn assess_2022(input: &BronchodilationInput) -> Option<Bd2022Result> {
    let (Some(pre), Some(post), Some(pred)) = (input.fev1_pre, input.fev1_post, input.fev1_pred)
    else {
        return None;
    };
    let of_predicted = |pre: f64, post: f64, pred: f64| (post - pre) / pred * 100.0;

    let delta_fev1 = of_predicted(pre, post, pred);
    let delta_fvc = match (input.fvc_pre, input.fvc_post, input.fvc_pred) {
        (Some(pre), Some(post), Some(pred)) => Some(of_predicted(pre, post, pred)),
        _ => None,
    };
    let positive = delta_fev1 > 10.0 || delta_fvc.is_some_and(|d| d > 10.0);

    Some(Bd2022Result {
        delta_fev1_pct_pred: delta_fev1,
        delta_fvc_pct_pred: delta_fvc,
        positive,
        obstruction: classify_obstruction(input, positive),
    })
}

pub fn render_2022(result: &Bd2022Result) -> String {
    let verdict = if result.positive {
        "BD test: pozitívny"
    } else {
        "BD test: negatívny"
    };
    let fvc = match result.delta_fvc_pct_pred {
        Some(d) => format!("ΔFVC = {} % pred", fixed_half_up(d, 1)),
        None => "ΔFVC = —".to_string(),
    };
    format!(
        "{verdict}. ΔFEV₁ = {} % pred, {fvc}.{}",
        fixed_half_up(result.delta_fev1_pct_pred, 1),
        conclusion_part(result.obstruction),
    )
}

/// Positive when FEV₁ or FVC improves by at least 12 % and 200 ml.
pub fn assess_2005(input: &BronchodilationInput) -> Option<Bd2005Result> {
    let (Some(pre), Some(post)) = (input.fev1_pre, input.fev1_post) else {
        return None;
    };
    let ml = |pre: f64, post: f64| (post - pre) * 1000.0;
    let pct = |pre: f64, post: f64| (post - pre) / pre * 100.0;
    let meets = |pct: f64, ml: f64| pct >= 12.0 && ml >= 200.0;

    let delta_fev1_ml = ml(pre, post);
    let delta_fev1_pct = pct(pre, post);
    let (delta_fvc_ml, delta_fvc_pct) = match (input.fvc_pre, input.fvc_post) {
        (Some(pre), Some(post)) => (Some(ml(pre, post)), Some(pct(pre, post))),
        _ => (None, None),
    };

    let positive = meets(delta_fev1_pct, delta_fev1_ml)
        || matches!((delta_fvc_pct, delta_fvc_ml), (Some(p), Some(m)) if meets(p, m));

    Some(Bd2005Result {
        delta_fev1_ml,
        delta_fev1_pct,
        delta_fvc_ml,
        delta_fvc_pct,
        positive,
        obstruction: classify_obstruction(input, positive),
    })
}

pub fn render_2005(result: &Bd2005Result) -> String {
    let verdict = if result.positive {
        "BD test (2005): pozitívny"
    } else {
        "BD test (2005): negatívny"
    };
    let fvc = match (result.delta_fvc_ml, result.delta_fvc_pct) {
        (Some(ml), Some(pct)) => format!(
            "ΔFVC = {} ml ({} %)",
            fixed_half_up(ml, 0),
            fixed_half_up(pct, 1)
        ),
        _ => "ΔFVC = —".to_string(),
    };
    format!(
        "{verdict}. ΔFEV₁ = {} ml ({} %), {fvc}.{}",
        fixed_half_up(result.delta_fev1_ml, 0),
        fixed_half_up(result.delta_fev1_pct, 1),
        conclusion_part(result.obstruction),
    )
}

/// The z-scores are reported by the reversibility note, so the verdict
/// concludes only from the absolute ratio.
fn without_z_scores(input: &BronchodilationInput) -> BronchodilationInput {
    BronchodilationInput {
        ratio_z_pre: None,
        ratio_z_post: None,
        ..*input
    }
}

fn join_note(base: String, input: &BronchodilationInput) -> String {
    [base.as_str(), reversibility_note(input.ratio_z_pre, input.ratio_z_post)]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full 2022 report: verdict followed by the reversibility note.
pub fn interpret_2022(input: &BronchodilationInput) -> String {
    let base = match assess_2022(&without_z_scores(input)) {
        Some(result) => render_2022(&result),
        None => PROMPT_2022.to_string(),
    };
    join_note(base, input)
}

/// Full 2005 report: verdict followed by the reversibility note.
pub fn interpret_2005(input: &BronchodilationInput) -> String {
    let base = match assess_2005(&without_z_scores(input)) {
        Some(result) => render_2005(&result),
        None => PROMPT_2005.to_string(),
    };
    join_note(base, input)
}

static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
    let litres = ScoreRange::new(0.0, 10.0);
    let z = ScoreRange::new(-10.0, 10.0);
    vec![
        InputField::number("fev1_pre", "FEV₁ pred (L)").range(litres).required(),
        InputField::number("fev1_post", "FEV₁ po (L)").range(litres).required(),
        InputField::number("fev1_pred", "FEV₁ predikovaná (L)").range(litres),
        InputField::number("fvc_pre", "FVC pred (L)").range(litres),
        InputField::number("fvc_post", "FVC po (L)").range(litres),
        InputField::number("fvc_pred", "FVC predikovaná (L)").range(litres),
        InputField::number("ratio_pre", "FEV₁/FVC pred (pomer alebo %)")
            .range(ScoreRange::new(0.0, 100.0)),
        InputField::number("ratio_post", "FEV₁/FVC po (pomer alebo %)")
            .range(ScoreRange::new(0.0, 100.0)),
        InputField::number("ratio_z_pre", "Pomer FEV₁/FVC pred (z-skóre)").range(z),
        InputField::number("ratio_z_post", "Pomer FEV₁/FVC po (z-skóre)").range(z),
    ]
});

pub struct Bronchodilation2022;

impl Calculator for Bronchodilation2022 {
    fn id(&self) -> &str {
        "bd_2022"
    }

    fn name(&self) -> &str {
        "BD test (2022)"
    }

    fn fields(&self) -> &[InputField] {
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: BronchodilationInput = parse_input(self.id(), input)?;
        let result = assess_2022(&parsed);
        finish(self, input, interpret_2022(&parsed), &result, Vec::new())
    }
}

pub struct Bronchodilation2005;

impl Calculator for Bronchodilation2005 {
    fn id(&self) -> &str {
        "bd_2005"
    }

    fn name(&self) -> &str {
        "BD test (2005)"
    }

    fn fields(&self) -> &[InputField] {
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: BronchodilationInput = parse_input(self.id(), input)?;
        let result = assess_2005(&parsed);
        finish(self, input, interpret_2005(&parsed), &result, Vec::new())
    }
}
