//! Pre-resection work-up: haemoglobin-corrected DLCO and predicted
//! post-operative function by the segment method.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::fixed_half_up;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, Calculator};

/// Segments of both lungs.
pub const TOTAL_SEGMENTS: u32 = 19;

pub const DLCO_PROMPT: &str = "Zadaj Hb a nameranú DLCO.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    /// Reference haemoglobin in g/dL.
    pub fn reference_hb(self) -> f64 {
        match self {
            Sex::Male => 14.6,
            Sex::Female => 13.4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct DlcoHbInput {
    /// g/dL or g/L; values above 30 are taken as g/L.
    pub hb: Option<f64>,
    pub sex: Sex,
    pub dlco_measured: Option<f64>,
    pub dlco_predicted: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DlcoCorrection {
    pub corrected_absolute: f64,
    pub corrected_percent: Option<f64>,
    pub summary: String,
}

pub fn correct_dlco(input: &DlcoHbInput) -> Option<DlcoCorrection> {
    let hb = input.hb?;
    let measured = input.dlco_measured?;

    let hb_g_dl = if hb > 30.0 { hb / 10.0 } else { hb };
    let corrected_absolute = measured * (input.sex.reference_hb() / hb_g_dl);
    let corrected_percent = input
        .dlco_predicted
        .filter(|pred| *pred > 0.0)
        .map(|pred| corrected_absolute / pred * 100.0);

    let mut summary = format!(
        "Upravená DLCO (absolútne): {}",
        fixed_half_up(corrected_absolute, 1)
    );
    if let Some(pct) = corrected_percent {
        summary.push_str(&format!(
            "\nUpravená DLCO (% pred): {} %",
            fixed_half_up(pct, 1)
        ));
    }

    Some(DlcoCorrection {
        corrected_absolute,
        corrected_percent,
        summary,
    })
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct PpoInput {
    pub removed_segments: u32,
    pub obstructed_segments: Option<u32>,
    pub fev1_pct: Option<f64>,
    pub dlco_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PpoResult {
    pub functional_before: u32,
    pub remaining: u32,
    /// Share of functional segments kept, 0..=1.
    pub factor: f64,
    pub ppo_fev1_pct: Option<f64>,
    pub ppo_dlco_pct: Option<f64>,
    pub summary: String,
}

pub fn predicted_postoperative(input: &PpoInput) -> PpoResult {
    let obstructed = input.obstructed_segments.unwrap_or(0).min(TOTAL_SEGMENTS);
    let functional_before = TOTAL_SEGMENTS - obstructed;
    let remaining = functional_before.saturating_sub(input.removed_segments);
    let factor = if functional_before > 0 {
        f64::from(remaining) / f64::from(functional_before)
    } else {
        0.0
    };

    let ppo_fev1_pct = input.fev1_pct.map(|v| v * factor);
    let ppo_dlco_pct = input.dlco_pct.map(|v| v * factor);

    let mut summary = format!(
        "Funkčné segmenty pred operáciou: {functional_before} z {TOTAL_SEGMENTS}; \
         zostávajúce po resekcii: {remaining} (faktor {} %).",
        fixed_half_up(factor * 100.0, 1)
    );
    if let Some(fev1) = ppo_fev1_pct {
        summary.push_str(&format!("\nppoFEV₁ ≈ {} % pred", fixed_half_up(fev1, 1)));
    }
    if let Some(dlco) = ppo_dlco_pct {
        summary.push_str(&format!("\nppoDLCO ≈ {} % pred", fixed_half_up(dlco, 1)));
    }

    PpoResult {
        functional_before,
        remaining,
        factor,
        ppo_fev1_pct,
        ppo_dlco_pct,
        summary,
    }
}

pub struct DlcoHbCorrection;

impl Calculator for DlcoHbCorrection {
    fn id(&self) -> &str {
        "dlco_hb"
    }

    fn name(&self) -> &str {
        "DLCO (Hb)"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::number("hb", "Hb (g/dL alebo g/L)")
                    .range(ScoreRange::new(0.1, 250.0))
                    .required(),
                InputField::choice("sex", "Pohlavie", &["male", "female"]),
                InputField::number("dlco_measured", "DLCO nameraná")
                    .range(ScoreRange::new(0.0, 100.0))
                    .required(),
                InputField::number("dlco_predicted", "DLCO predikovaná")
                    .range(ScoreRange::new(0.0, 100.0)),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: DlcoHbInput = parse_input(self.id(), input)?;
        let result = correct_dlco(&parsed);
        let summary = result
            .as_ref()
            .map(|r| r.summary.clone())
            .unwrap_or_else(|| DLCO_PROMPT.to_string());
        finish(self, input, summary, &result, Vec::new())
    }
}

pub struct PredictedPostoperative;

impl Calculator for PredictedPostoperative {
    fn id(&self) -> &str {
        "ppo"
    }

    fn name(&self) -> &str {
        "PPO"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let segments = ScoreRange::stepped(0.0, 19.0, 1.0);
            vec![
                InputField::integer("removed_segments", "Odstránené segmenty")
                    .range(segments)
                    .required(),
                InputField::integer("obstructed_segments", "Obštruované segmenty").range(segments),
                InputField::number("fev1_pct", "FEV₁ (% pred)").range(ScoreRange::new(0.0, 200.0)),
                InputField::number("dlco_pct", "DLCO (% pred)").range(ScoreRange::new(0.0, 200.0)),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: PpoInput = parse_input(self.id(), input)?;
        let result = predicted_postoperative(&parsed);
        finish(self, input, result.summary.clone(), &result, Vec::new())
    }
}
