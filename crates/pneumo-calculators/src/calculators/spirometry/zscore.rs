//! Z-score interpretation (ERS/ATS 2022).

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use super::{AirwayResistance, Hyperinflation, Marker};
use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, Calculator};

/// Lower limit of normal.
pub const LLN: f64 = -1.645;
/// Upper limit of normal.
pub const ULN: f64 = 1.645;
/// sRaw above this (kPa·s) is elevated.
pub const SRAW_LIMIT: f64 = 1.2;

pub const MISSING_INPUT_PROMPT: &str =
    "Na vyhodnotenie je potrebné zadať aspoň FEV₁, FVC a FEV₁/FVC.";
pub const ENTIRELY_NORMAL: &str = "Zadané údaje svedčia pre normálnu funkciu pľúc bez známok ventilačnej poruchy, hyperinflácie, poruchy odporov či difúzie.";

/// Measured values as z-scores. FEV₁, FVC and the ratio are mandatory.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ZScoreInput {
    pub fev1: Option<f64>,
    pub fvc: Option<f64>,
    /// FEV₁/FVC.
    pub ratio: Option<f64>,
    pub tlc: Option<f64>,
    pub rv_tlc: Option<f64>,
    pub dlco: Option<f64>,
    pub kco: Option<f64>,
    pub va: Option<f64>,
    /// Specific airway resistance, kPa·s (not a z-score).
    pub s_raw: Option<f64>,
}

/// Severity grade of a z-score below the LLN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ZSeverity {
    Mild,
    Moderate,
    Severe,
}

impl ZSeverity {
    pub fn from_z(z: f64) -> Self {
        if z >= -2.5 {
            ZSeverity::Mild
        } else if z >= -3.5 {
            ZSeverity::Moderate
        } else {
            ZSeverity::Severe
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            ZSeverity::Mild => "mierneho stupňa",
            ZSeverity::Moderate => "stredne ťažkého stupňa",
            ZSeverity::Severe => "ťažkého stupňa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RestrictionSubtype {
    /// RV/TLC within normal limits.
    Simple,
    /// RV/TLC above the ULN.
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "pattern", rename_all = "snake_case")]
#[ts(export)]
pub enum VentilatoryPattern {
    NoDisorder,
    /// Ratio below the LLN with FEV₁ and FVC both preserved.
    IncipientObstruction,
    Obstructive {
        severity: ZSeverity,
    },
    Restrictive {
        severity: ZSeverity,
        /// `None` when RV/TLC was not measured.
        subtype: Option<RestrictionSubtype>,
    },
    Combined {
        severity: ZSeverity,
    },
    /// Low FVC, normal ratio, TLC not measured.
    PossibleRestriction,
    NonSpecific,
}

impl VentilatoryPattern {
    pub fn phrase(&self) -> String {
        match self {
            VentilatoryPattern::NoDisorder => "bez ventilačnej poruchy".to_string(),
            VentilatoryPattern::IncipientObstruction => {
                "incipientná obštrukčná ventilačná porucha".to_string()
            }
            VentilatoryPattern::Obstructive { severity } => {
                format!("obštrukčná ventilačná porucha {}", severity.phrase())
            }
            VentilatoryPattern::Restrictive { severity, subtype } => {
                let prefix = match subtype {
                    None => "",
                    Some(RestrictionSubtype::Complex) => "komplexná ",
                    Some(RestrictionSubtype::Simple) => "jednoduchá ",
                };
                format!("{prefix}restrikčná ventilačná porucha {}", severity.phrase())
            }
            VentilatoryPattern::Combined { severity } => {
                format!("kombinovaná ventilačná porucha {}", severity.phrase())
            }
            VentilatoryPattern::PossibleRestriction => {
                "možná reštrikcia – odporúčané doplniť bodypletyzmografiu".to_string()
            }
            VentilatoryPattern::NonSpecific => "nešpecifický vzor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DlcoGrade {
    NotAssessed,
    AbnormallyHigh,
    MildlyReduced,
    ModeratelyReduced,
    SeverelyReduced,
    Normal,
}

impl DlcoGrade {
    pub fn from_z(z: Option<f64>) -> Self {
        let Some(z) = z else {
            return DlcoGrade::NotAssessed;
        };
        if z > ULN {
            DlcoGrade::AbnormallyHigh
        } else if z < LLN && z >= -2.5 {
            DlcoGrade::MildlyReduced
        } else if z < -2.5 && z >= -3.5 {
            DlcoGrade::ModeratelyReduced
        } else if z < -3.5 {
            DlcoGrade::SeverelyReduced
        } else {
            DlcoGrade::Normal
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            DlcoGrade::NotAssessed => "DLCO nehodnotené",
            DlcoGrade::AbnormallyHigh => "DLCO abnormálne vysoké",
            DlcoGrade::MildlyReduced => "DLCO mierne redukované",
            DlcoGrade::ModeratelyReduced => "DLCO stredne ťažko redukované",
            DlcoGrade::SeverelyReduced => "DLCO ťažko redukované",
            DlcoGrade::Normal => "DLCO v norme",
        }
    }
}

/// Everything the report sentence is built from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ZScoreFindings {
    pub pattern: VentilatoryPattern,
    pub hyperinflation: Hyperinflation,
    pub resistance: AirwayResistance,
    pub dlco: DlcoGrade,
    pub kco: Marker,
    pub va: Marker,
    /// Every measured value within limits; the report collapses to one fixed sentence.
    pub entirely_normal: bool,
}

fn within_limits(z: Option<f64>) -> bool {
    z.is_none_or(|z| (LLN..=ULN).contains(&z))
}

fn marker(z: Option<f64>) -> Marker {
    match z {
        None => Marker::NotAssessed,
        Some(z) if z > ULN => Marker::Elevated,
        Some(z) if z < LLN => Marker::Reduced,
        Some(_) => Marker::Normal,
    }
}

fn marker_phrase(name: &str, marker: Marker) -> String {
    match marker {
        Marker::NotAssessed => format!("{name} nehodnotené"),
        Marker::Elevated => format!("{name} zvýšené"),
        Marker::Reduced => format!("{name} znížené"),
        Marker::Normal => format!("{name} v norme"),
    }
}

fn classify_pattern(
    fev1: f64,
    fvc: f64,
    ratio: f64,
    tlc: Option<f64>,
    rv_tlc: Option<f64>,
) -> VentilatoryPattern {
    let obstruction = ratio < LLN;
    let restriction = tlc.is_some_and(|t| t < LLN);
    let low_fvc = fvc < LLN;
    let low_fev1 = fev1 < LLN;
    let normal_ratio = ratio >= LLN;
    let normal_tlc = tlc.is_some_and(|t| t >= LLN);

    match tlc {
        // The combined grade follows whichever of TLC and FEV₁ deviates more.
        Some(tlc) if obstruction && restriction => {
            let worse = if tlc.abs() > fev1.abs() { tlc } else { fev1 };
            VentilatoryPattern::Combined {
                severity: ZSeverity::from_z(worse),
            }
        }
        _ if obstruction && fev1 >= LLN && fvc >= LLN => VentilatoryPattern::IncipientObstruction,
        _ if obstruction => VentilatoryPattern::Obstructive {
            severity: ZSeverity::from_z(fev1),
        },
        Some(tlc) if restriction => VentilatoryPattern::Restrictive {
            severity: ZSeverity::from_z(tlc),
            subtype: rv_tlc.map(|rv| {
                if rv > ULN {
                    RestrictionSubtype::Complex
                } else {
                    RestrictionSubtype::Simple
                }
            }),
        },
        None if normal_ratio && low_fvc => VentilatoryPattern::PossibleRestriction,
        _ if normal_ratio && (low_fev1 || low_fvc) && normal_tlc => {
            VentilatoryPattern::NonSpecific
        }
        _ => VentilatoryPattern::NoDisorder,
    }
}

/// Classify a z-score lung-function result.
///
/// Returns `None` when FEV₁, FVC or FEV₁/FVC is missing.
pub fn assess(input: &ZScoreInput) -> Option<ZScoreFindings> {
    let (fev1, fvc, ratio) = (input.fev1?, input.fvc?, input.ratio?);

    let pattern = classify_pattern(fev1, fvc, ratio, input.tlc, input.rv_tlc);

    let hyperinflation = match input.rv_tlc {
        None => Hyperinflation::NotAssessed,
        Some(rv) if rv > ULN => Hyperinflation::Present,
        Some(_) => Hyperinflation::Absent,
    };

    let resistance = match input.s_raw {
        None => AirwayResistance::NotAssessed,
        Some(s) if s > SRAW_LIMIT => AirwayResistance::Elevated,
        Some(_) => AirwayResistance::Normal,
    };

    let entirely_normal = pattern == VentilatoryPattern::NoDisorder
        && within_limits(input.rv_tlc)
        && input.s_raw.is_none_or(|s| s <= SRAW_LIMIT)
        && within_limits(input.dlco)
        && within_limits(input.kco)
        && within_limits(input.va)
        && fev1 >= LLN
        && fvc >= LLN
        && ratio >= LLN
        && input.tlc.is_none_or(|t| t >= LLN);

    Some(ZScoreFindings {
        pattern,
        hyperinflation,
        resistance,
        dlco: DlcoGrade::from_z(input.dlco),
        kco: marker(input.kco),
        va: marker(input.va),
        entirely_normal,
    })
}

/// Render findings as the report sentence.
pub fn render(findings: &ZScoreFindings) -> String {
    if findings.entirely_normal {
        return ENTIRELY_NORMAL.to_string();
    }

    format!(
        "Vo funkčnom vyšetrení pľúc {}, {}, {}, {}, {}, {}.",
        findings.pattern.phrase(),
        findings.hyperinflation.phrase(),
        findings.resistance.phrase(),
        findings.dlco.phrase(),
        marker_phrase("KCO", findings.kco),
        marker_phrase("VA", findings.va),
    )
}

/// One-sentence interpretation, or a prompt when mandatory values are missing.
pub fn interpret(input: &ZScoreInput) -> String {
    match assess(input) {
        Some(findings) => render(&findings),
        None => MISSING_INPUT_PROMPT.to_string(),
    }
}

pub struct SpirometryZScore;

impl Calculator for SpirometryZScore {
    fn id(&self) -> &str {
        "spirometry_z"
    }

    fn name(&self) -> &str {
        "Spirometria (z-skóre)"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let z = ScoreRange::new(-10.0, 10.0);
            vec![
                InputField::number("fev1", "FEV₁ (z)").range(z).required(),
                InputField::number("fvc", "FVC (z)").range(z).required(),
                InputField::number("ratio", "FEV₁/FVC (z)").range(z).required(),
                InputField::number("tlc", "TLC (z)").range(z),
                InputField::number("rv_tlc", "RV/TLC (z)").range(z),
                InputField::number("dlco", "DLCO (z)").range(z),
                InputField::number("kco", "KCO (z)").range(z),
                InputField::number("va", "VA (z)").range(z),
                InputField::number("s_raw", "sRaw (kPa·s)"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: ZScoreInput = parse_input(self.id(), input)?;
        let findings = assess(&parsed);
        let summary = match &findings {
            Some(findings) => render(findings),
            None => MISSING_INPUT_PROMPT.to_string(),
        };
        finish(self, input, summary, &findings, Vec::new())
    }
}
