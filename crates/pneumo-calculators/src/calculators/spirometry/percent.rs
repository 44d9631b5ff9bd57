//! Percent-of-predicted interpretation (ERS 2005).

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use super::{AirwayResistance, Hyperinflation, Marker};
use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, Calculator};

/// FEV₁/FVC below this percentage is obstruction.
pub const OBSTRUCTION_CUTOFF: f64 = 70.0;
/// Lower bound of normal for FEV₁, FVC, TLC and the diffusion parameters.
pub const NORMAL_CUTOFF: f64 = 80.0;
/// RV/TLC above this percentage is hyperinflation.
pub const HYPERINFLATION_CUTOFF: f64 = 120.0;
/// sRaw above this (kPa·s) is elevated.
pub const SRAW_LIMIT: f64 = 1.2;
/// A ratio at or below this was entered as a fraction and is scaled by 100.
pub const FRACTION_RATIO_LIMIT: f64 = 1.2;

pub const MISSING_INPUT_PROMPT: &str =
    "Na vyhodnotenie % režimu zadaj FEV₁ %pred, FVC %pred a FEV₁/FVC (%)";
pub const ENTIRELY_NORMAL: &str = "Nález svedčí pre normálnu funkciu pľúc bez ventilačnej poruchy, hyperinflácie, zvýšených odporov či poruchy difúzie.";

/// Measured values as percent of predicted. FEV₁, FVC and the ratio are mandatory.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct PercentInput {
    pub fev1_pct: Option<f64>,
    pub fvc_pct: Option<f64>,
    /// FEV₁/FVC in percent; a fraction (`0.65`) is accepted and scaled.
    pub ratio_pct: Option<f64>,
    pub tlc_pct: Option<f64>,
    pub rv_tlc_pct: Option<f64>,
    pub dlco_pct: Option<f64>,
    pub kco_pct: Option<f64>,
    pub va_pct: Option<f64>,
    pub s_raw: Option<f64>,
}

/// Six-tier grade of FEV₁ %pred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Fev1Grade {
    /// ≥ 80 %
    Incipient,
    /// ≥ 70 %
    MildIncipient,
    /// ≥ 60 %
    Moderate,
    /// ≥ 50 %
    ModeratelySevere,
    /// ≥ 35 %
    Severe,
    VerySevere,
}

impl Fev1Grade {
    pub fn from_percent(p: f64) -> Self {
        if p >= 80.0 {
            Fev1Grade::Incipient
        } else if p >= 70.0 {
            Fev1Grade::MildIncipient
        } else if p >= 60.0 {
            Fev1Grade::Moderate
        } else if p >= 50.0 {
            Fev1Grade::ModeratelySevere
        } else if p >= 35.0 {
            Fev1Grade::Severe
        } else {
            Fev1Grade::VerySevere
        }
    }

    fn obstruction_label(self) -> &'static str {
        match self {
            Fev1Grade::Incipient => "incipientnú",
            Fev1Grade::MildIncipient => "ľahkú incipientnú",
            Fev1Grade::Moderate => "strednú",
            Fev1Grade::ModeratelySevere => "stredne ťažkú",
            Fev1Grade::Severe => "ťažkú",
            Fev1Grade::VerySevere => "veľmi ťažkú",
        }
    }

    fn restriction_label(self) -> &'static str {
        match self {
            Fev1Grade::Incipient => "ľahkú (podľa FEV₁ v norme – klinicky skôr mierny rozsah)",
            Fev1Grade::MildIncipient => "ľahkú",
            Fev1Grade::Moderate => "strednú",
            Fev1Grade::ModeratelySevere => "stredne ťažkú",
            Fev1Grade::Severe => "ťažkú",
            Fev1Grade::VerySevere => "veľmi ťažkú",
        }
    }
}

/// Ventilatory pattern. Every graded pattern is graded on FEV₁ %pred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "pattern", rename_all = "snake_case")]
#[ts(export)]
pub enum PercentPattern {
    NoDisorder,
    Obstructive { grade: Fev1Grade },
    Restrictive { grade: Fev1Grade },
    Combined { grade: Fev1Grade },
    /// TLC normal, ratio normal, FEV₁ or FVC low.
    NonSpecific,
    /// FVC low, ratio normal, TLC not measured.
    PossibleRestriction,
}

impl PercentPattern {
    pub fn phrase(&self) -> String {
        match self {
            PercentPattern::NoDisorder => "bez ventilačnej poruchy".to_string(),
            PercentPattern::Combined { grade } => format!(
                "kombinovanú ventilačnú poruchu – obštrukčnú ({}) a restrikčnú ({})",
                grade.obstruction_label(),
                grade.restriction_label()
            ),
            PercentPattern::Obstructive { grade } => format!(
                "obštrukčnú ventilačnú poruchu ({}; podľa FEV₁ %pred)",
                grade.obstruction_label()
            ),
            PercentPattern::Restrictive { grade } => format!(
                "restrikčnú ventilačnú poruchu ({}; podľa FEV₁ %pred)",
                grade.restriction_label()
            ),
            PercentPattern::NonSpecific => {
                "nešpecifickú ventilačnú poruchu (pomer normálny, TLC v norme, znížené FEV₁/FVC)"
                    .to_string()
            }
            PercentPattern::PossibleRestriction => "možnú restrikciu – pomer je normálny, FVC znížené; odporúča sa doplniť bodypletyzmografiu (TLC)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DlcoPercentGrade {
    NotAssessed,
    /// ≥ 80 %
    Normal,
    /// ≥ 60 %
    Mild,
    /// ≥ 40 %
    Moderate,
    Severe,
}

impl DlcoPercentGrade {
    pub fn from_percent(p: Option<f64>) -> Self {
        match p {
            None => DlcoPercentGrade::NotAssessed,
            Some(p) if p >= 80.0 => DlcoPercentGrade::Normal,
            Some(p) if p >= 60.0 => DlcoPercentGrade::Mild,
            Some(p) if p >= 40.0 => DlcoPercentGrade::Moderate,
            Some(_) => DlcoPercentGrade::Severe,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            DlcoPercentGrade::NotAssessed => "DLCO nehodnotená",
            DlcoPercentGrade::Normal => "DLCO v norme",
            DlcoPercentGrade::Mild => "DLCO znížená – mierne",
            DlcoPercentGrade::Moderate => "DLCO znížená – stredne ťažko",
            DlcoPercentGrade::Severe => "DLCO znížená – ťažko",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PercentFindings {
    /// The ratio actually compared against the cutoff, after fraction scaling.
    pub ratio_pct: f64,
    pub pattern: PercentPattern,
    pub hyperinflation: Hyperinflation,
    pub resistance: AirwayResistance,
    pub dlco: DlcoPercentGrade,
    /// Never [`Marker::Elevated`] in this mode.
    pub kco: Marker,
    pub va: Marker,
    pub entirely_normal: bool,
}

/// `0.65` → `65.0`; values above [`FRACTION_RATIO_LIMIT`] pass through.
pub fn normalize_ratio(ratio: f64) -> f64 {
    if ratio <= FRACTION_RATIO_LIMIT {
        ratio * 100.0
    } else {
        ratio
    }
}

fn marker(p: Option<f64>) -> Marker {
    match p {
        None => Marker::NotAssessed,
        Some(p) if p >= NORMAL_CUTOFF => Marker::Normal,
        Some(_) => Marker::Reduced,
    }
}

fn marker_phrase(name: &str, marker: Marker) -> String {
    match marker {
        Marker::NotAssessed => format!("{name} nehodnotená"),
        Marker::Normal => format!("{name} v norme"),
        Marker::Reduced | Marker::Elevated => format!("{name} znížené"),
    }
}

fn classify_pattern(fev1: f64, fvc: f64, ratio: f64, tlc: Option<f64>) -> PercentPattern {
    let obstruction = ratio < OBSTRUCTION_CUTOFF;
    let restriction = tlc.is_some_and(|t| t < NORMAL_CUTOFF);
    let grade = Fev1Grade::from_percent(fev1);

    match tlc {
        _ if obstruction && restriction => PercentPattern::Combined { grade },
        _ if obstruction => PercentPattern::Obstructive { grade },
        Some(t) if t < NORMAL_CUTOFF => PercentPattern::Restrictive { grade },
        Some(t) if t >= NORMAL_CUTOFF && (fev1 < NORMAL_CUTOFF || fvc < NORMAL_CUTOFF) => {
            PercentPattern::NonSpecific
        }
        None if fvc < NORMAL_CUTOFF => PercentPattern::PossibleRestriction,
        _ => PercentPattern::NoDisorder,
    }
}

/// Classify a percent-predicted lung-function result.
///
/// Returns `None` when FEV₁, FVC or FEV₁/FVC is missing.
pub fn assess(input: &PercentInput) -> Option<PercentFindings> {
    let (fev1, fvc) = (input.fev1_pct?, input.fvc_pct?);
    let ratio = normalize_ratio(input.ratio_pct?);

    let pattern = classify_pattern(fev1, fvc, ratio, input.tlc_pct);

    let hyperinflation = match input.rv_tlc_pct {
        None => Hyperinflation::NotAssessed,
        Some(rv) if rv > HYPERINFLATION_CUTOFF => Hyperinflation::Present,
        Some(_) => Hyperinflation::Absent,
    };

    let resistance = match input.s_raw {
        None => AirwayResistance::NotAssessed,
        Some(s) if s > SRAW_LIMIT => AirwayResistance::Elevated,
        Some(_) => AirwayResistance::Normal,
    };

    let at_least_normal = |p: Option<f64>| p.is_none_or(|p| p >= NORMAL_CUTOFF);
    let entirely_normal = pattern == PercentPattern::NoDisorder
        && input.rv_tlc_pct.is_none_or(|rv| rv <= HYPERINFLATION_CUTOFF)
        && input.s_raw.is_none_or(|s| s <= SRAW_LIMIT)
        && at_least_normal(input.dlco_pct)
        && at_least_normal(input.kco_pct)
        && at_least_normal(input.va_pct)
        && fev1 >= NORMAL_CUTOFF
        && fvc >= NORMAL_CUTOFF
        && ratio >= OBSTRUCTION_CUTOFF
        && at_least_normal(input.tlc_pct);

    Some(PercentFindings {
        ratio_pct: ratio,
        pattern,
        hyperinflation,
        resistance,
        dlco: DlcoPercentGrade::from_percent(input.dlco_pct),
        kco: marker(input.kco_pct),
        va: marker(input.va_pct),
        entirely_normal,
    })
}

pub fn render(findings: &PercentFindings) -> String {
    if findings.entirely_normal {
        return ENTIRELY_NORMAL.to_string();
    }

    format!(
        "Nález svedčí pre {}, {}, {}, {}, {}, {}.",
        findings.pattern.phrase(),
        findings.hyperinflation.phrase(),
        findings.resistance.short_phrase(),
        findings.dlco.phrase(),
        marker_phrase("KCO", findings.kco),
        marker_phrase("VA", findings.va),
    )
}

pub fn interpret(input: &PercentInput) -> String {
    match assess(input) {
        Some(findings) => render(&findings),
        None => MISSING_INPUT_PROMPT.to_string(),
    }
}

pub struct SpirometryPercent;

impl Calculator for SpirometryPercent {
    fn id(&self) -> &str {
        "spirometry_percent"
    }

    fn name(&self) -> &str {
        "Spirometria (% pred)"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let pct = ScoreRange::new(0.0, 300.0);
            vec![
                InputField::number("fev1_pct", "FEV₁ %pred").range(pct).required(),
                InputField::number("fvc_pct", "FVC %pred").range(pct).required(),
                InputField::number("ratio_pct", "FEV₁/FVC (%)")
                    .range(ScoreRange::new(0.0, 100.0))
                    .required(),
                InputField::number("tlc_pct", "TLC %pred").range(pct),
                InputField::number("rv_tlc_pct", "RV/TLC %pred").range(pct),
                InputField::number("dlco_pct", "DLCO %pred").range(pct),
                InputField::number("kco_pct", "KCO %pred").range(pct),
                InputField::number("va_pct", "VA %pred").range(pct),
                InputField::number("s_raw", "sRaw (kPa·s)"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: PercentInput = parse_input(self.id(), input)?;
        let findings = assess(&parsed);
        let summary = match &findings {
            Some(findings) => render(findings),
            None => MISSING_INPUT_PROMPT.to_string(),
        };
        finish(self, input, summary, &findings, Vec::new())
    }
}
