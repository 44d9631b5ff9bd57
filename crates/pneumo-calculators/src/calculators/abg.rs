//! Arterial blood gas: primary acid-base disorder, expected compensation and
//! anion gap.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::display_decimal;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, prompt, Calculator};

pub const KPA_TO_MMHG: f64 = 7.50062;
const MMHG_TO_KPA: f64 = 1.0 / KPA_TO_MMHG;

pub const PROMPT: &str = "Zadajte platné hodnoty pH, PaCO₂ (kPa) a HCO₃⁻.";
const UNKNOWN_COURSE: &str = "Uveď akútna/chronická pre presné posúdenie.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RespiratoryCourse {
    Acute,
    Chronic,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct AbgInput {
    pub ph: Option<f64>,
    pub paco2_kpa: Option<f64>,
    /// mmol/L
    pub hco3: Option<f64>,
    pub na: Option<f64>,
    pub cl: Option<f64>,
    pub albumin_g_l: Option<f64>,
    pub course: Option<RespiratoryCourse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AcidBaseDisorder {
    RespiratoryAcidosis,
    MetabolicAcidosis,
    RespiratoryAlkalosis,
    MetabolicAlkalosis,
    CompensatedRespiratoryAcidosis,
    CompensatedRespiratoryAlkalosis,
    PossibleMixed,
}

impl AcidBaseDisorder {
    pub fn label(self) -> &'static str {
        match self {
            AcidBaseDisorder::RespiratoryAcidosis => "Respiračná acidóza",
            AcidBaseDisorder::MetabolicAcidosis => "Metabolická acidóza",
            AcidBaseDisorder::RespiratoryAlkalosis => "Respiračná alkalóza",
            AcidBaseDisorder::MetabolicAlkalosis => "Metabolická alkalóza",
            AcidBaseDisorder::CompensatedRespiratoryAcidosis => "Kompenzovaná respiračná acidóza",
            AcidBaseDisorder::CompensatedRespiratoryAlkalosis => {
                "Kompenzovaná respiračná alkalóza"
            }
            AcidBaseDisorder::PossibleMixed => "Možná zmiešaná porucha",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AbgAnalysis {
    pub primary: AcidBaseDisorder,
    pub expected_paco2_kpa: Option<f64>,
    pub expected_hco3: Option<f64>,
    pub anion_gap: Option<f64>,
    pub anion_gap_corrected: Option<f64>,
    pub notes: Vec<String>,
}

impl AbgAnalysis {
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Primárna porucha: {}", self.primary.label())];
        if let Some(v) = self.expected_paco2_kpa {
            lines.push(format!("Očak. PaCO₂: {} kPa", rounded(v, 2)));
        }
        if let Some(v) = self.expected_hco3 {
            lines.push(format!("Očak. HCO₃⁻: {} mmol/L", rounded(v, 1)));
        }
        if let Some(v) = self.anion_gap {
            lines.push(format!("Aniónová medzera: {} mmol/L", rounded(v, 1)));
        }
        if let Some(v) = self.anion_gap_corrected {
            lines.push(format!("AG (korig.): {} mmol/L", rounded(v, 1)));
        }
        lines.join("\n")
    }
}

/// Rounded to `digits` places and printed without padding: 4.5, 1.23, 5.0.
fn rounded(value: f64, digits: i32) -> String {
    let factor = 10f64.powi(digits);
    display_decimal((value * factor).round_ties_even() / factor)
}

fn primary_disorder(ph: f64, pco2_mmhg: f64, hco3: f64) -> AcidBaseDisorder {
    if ph < 7.35 {
        if pco2_mmhg > 45.0 && hco3 >= 22.0 {
            AcidBaseDisorder::RespiratoryAcidosis
        } else {
            AcidBaseDisorder::MetabolicAcidosis
        }
    } else if ph > 7.45 {
        if pco2_mmhg < 35.0 && hco3 <= 26.0 {
            AcidBaseDisorder::RespiratoryAlkalosis
        } else {
            AcidBaseDisorder::MetabolicAlkalosis
        }
    } else if pco2_mmhg > 45.0 && hco3 > 26.0 {
        AcidBaseDisorder::CompensatedRespiratoryAcidosis
    } else if pco2_mmhg < 35.0 && hco3 < 22.0 {
        AcidBaseDisorder::CompensatedRespiratoryAlkalosis
    } else {
        AcidBaseDisorder::PossibleMixed
    }
}

pub fn analyze(
    ph: f64,
    paco2_kpa: f64,
    hco3: f64,
    na: Option<f64>,
    cl: Option<f64>,
    albumin_g_l: Option<f64>,
    course: Option<RespiratoryCourse>,
) -> AbgAnalysis {
    let pco2 = paco2_kpa * KPA_TO_MMHG;
    let primary = primary_disorder(ph, pco2, hco3);

    let mut notes: Vec<&str> = Vec::new();
    if (7.35..=7.45).contains(&ph) {
        notes.push("pH v referenčnom rozmedzí – zvaž zmiešanú poruchu.");
    }

    let mut expected_paco2_kpa = None;
    let mut expected_hco3 = None;
    let chronic = course == Some(RespiratoryCourse::Chronic);

    match primary {
        AcidBaseDisorder::MetabolicAcidosis => {
            // Winter's formula
            let expected = 1.5 * hco3 + 8.0;
            expected_paco2_kpa = Some(expected * MMHG_TO_KPA);
            notes.push(if pco2 < expected - 2.0 {
                "pCO₂ < Winter – pridružená respiračná alkalóza?"
            } else if pco2 > expected + 2.0 {
                "pCO₂ > Winter – pridružená respiračná acidóza?"
            } else {
                "Respiračná kompenzácia primeraná (Winter)."
            });
        }
        AcidBaseDisorder::MetabolicAlkalosis => {
            let expected = 40.0 + 0.7 * (hco3 - 24.0);
            expected_paco2_kpa = Some(expected * MMHG_TO_KPA);
            notes.push(if pco2 < expected - 5.0 {
                "pCO₂ nižšia – pridružená respiračná alkalóza?"
            } else if pco2 > expected + 5.0 {
                "pCO₂ vyššia – pridružená respiračná acidóza?"
            } else {
                "Respiračná kompenzácia primeraná."
            });
        }
        AcidBaseDisorder::RespiratoryAcidosis => {
            let delta = (pco2 - 40.0) / 10.0;
            let expected = if chronic { 24.0 + 3.5 * delta } else { 24.0 + delta };
            expected_hco3 = Some(expected);
            notes.push(match course {
                Some(RespiratoryCourse::Acute) if hco3 > expected + 2.0 => {
                    "↑HCO₃ vyššie – pridružená metabolická alkalóza?"
                }
                Some(RespiratoryCourse::Acute) => {
                    "Akútna resp. acidóza – HCO₃ v norme pre akútnu kompenzáciu."
                }
                Some(RespiratoryCourse::Chronic) if hco3 < expected - 2.0 => {
                    "HCO₃ nižší – pridružená metabolická acidóza?"
                }
                Some(RespiratoryCourse::Chronic) => {
                    "Chronická resp. acidóza – kompenzácia primeraná."
                }
                None => UNKNOWN_COURSE,
            });
        }
        AcidBaseDisorder::RespiratoryAlkalosis => {
            let delta = (40.0 - pco2) / 10.0;
            let expected = if chronic { 24.0 - 5.0 * delta } else { 24.0 - 2.0 * delta };
            expected_hco3 = Some(expected);
            notes.push(match course {
                Some(RespiratoryCourse::Acute) if hco3 < expected - 2.0 => {
                    "HCO₃ nižší – pridružená metabolická acidóza?"
                }
                Some(RespiratoryCourse::Acute) => "Akútna resp. alkalóza – kompenzácia primeraná.",
                Some(RespiratoryCourse::Chronic) if hco3 > expected + 2.0 => {
                    "HCO₃ vyšší – pridružená metabolická alkalóza?"
                }
                Some(RespiratoryCourse::Chronic) => {
                    "Chronická resp. alkalóza – kompenzácia primeraná."
                }
                None => UNKNOWN_COURSE,
            });
        }
        _ => {}
    }

    let (anion_gap, anion_gap_corrected) = match (na, cl) {
        (Some(na), Some(cl)) => {
            let gap = na - cl - hco3;
            let corrected = albumin_g_l.map(|albumin| gap + 2.5 * (4.0 - albumin / 10.0));
            (Some(gap), corrected)
        }
        _ => (None, None),
    };

    tracing::debug!(primary = primary.label(), pco2_mmhg = pco2, "acid-base analysed");

    AbgAnalysis {
        primary,
        expected_paco2_kpa,
        expected_hco3,
        anion_gap,
        anion_gap_corrected,
        notes: notes.into_iter().map(str::to_string).collect(),
    }
}

pub struct AcidBase;

impl Calculator for AcidBase {
    fn id(&self) -> &str {
        "abg"
    }

    fn name(&self) -> &str {
        "Interpretácia acidobazickej rovnováhy"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            vec![
                InputField::number("ph", "pH").range(ScoreRange::new(6.5, 8.0)).required(),
                InputField::number("paco2_kpa", "PaCO₂ (kPa)")
                    .range(ScoreRange::new(0.5, 30.0))
                    .required(),
                InputField::number("hco3", "HCO₃⁻ (mmol/L)")
                    .range(ScoreRange::new(1.0, 80.0))
                    .required(),
                InputField::number("na", "Na⁺ (mmol/L)").range(ScoreRange::new(80.0, 200.0)),
                InputField::number("cl", "Cl⁻ (mmol/L)").range(ScoreRange::new(50.0, 160.0)),
                InputField::number("albumin_g_l", "Albumín (g/L)").range(ScoreRange::new(0.0, 80.0)),
                InputField::choice("course", "Typ respiračnej poruchy", &["acute", "chronic"]),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: AbgInput = parse_input(self.id(), input)?;
        let (Some(ph), Some(paco2), Some(hco3)) = (parsed.ph, parsed.paco2_kpa, parsed.hco3) else {
            return prompt(self, input, PROMPT);
        };
        let analysis = analyze(
            ph,
            paco2,
            hco3,
            parsed.na,
            parsed.cl,
            parsed.albumin_g_l,
            parsed.course,
        );
        finish(
            self,
            input,
            analysis.summary(),
            &analysis,
            analysis.notes.clone(),
        )
    }
}
