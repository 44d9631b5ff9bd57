//! Fleischner Society 2017 follow-up of incidental pulmonary nodules.
//!
//! [`recommend`] is the bare decision table. [`workup`] takes the two
//! measured axes, runs the Brock model on the mean diameter and feeds its
//! probability into the table as the patient's risk.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::round_half_up;
use pneumo_core::models::evaluation::Evaluation;

use super::brock::{self, BrockInput, NoduleType, DEFAULT_HIGH_RISK_CUTOFF_PERCENT};
use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange, MISSING_VALUES};
use crate::{finish, parse_input, prompt, Calculator};

const MEASUREMENT_NOTES: [&str; 2] = [
    "Meraj priemer (dlhá+krátka os)/2, celé mm.",
    "Za rast považuj ≥2 mm alebo ≥25 % objemu.",
];

pub const UNKNOWN_TYPE: &str =
    "Neznámy typ nodulu – uveď „solid“, „ground-glass“ alebo „part-solid“.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum FleischnerType {
    Solid,
    GroundGlass,
    PartSolid,
}

impl FleischnerType {
    /// Case-insensitive, accepts "ggn", "groundglass" and "partsolid".
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "solid" => Some(FleischnerType::Solid),
            "ground-glass" | "ggn" | "groundglass" => Some(FleischnerType::GroundGlass),
            "part-solid" | "partsolid" => Some(FleischnerType::PartSolid),
            _ => None,
        }
    }

    pub fn brock_type(self) -> NoduleType {
        match self {
            FleischnerType::Solid => NoduleType::Solid,
            FleischnerType::GroundGlass => NoduleType::NonSolid,
            FleischnerType::PartSolid => NoduleType::PartSolid,
        }
    }
}

/// A nodule as the decision table sees it.
#[derive(Debug, Clone, Copy)]
pub struct Nodule {
    pub size_mm: i32,
    pub nodule_type: Option<FleischnerType>,
    pub high_risk: bool,
    pub multiple: bool,
    pub solid_component_mm: Option<i32>,
    pub suspicious_features: bool,
    pub thick_slice: bool,
    pub incomplete_ct: bool,
    /// Brock probability 0..1; overrides `high_risk` when present.
    pub brock_probability: Option<f64>,
    pub brock_cutoff_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FleischnerResult {
    pub recommendation: String,
    pub notes: Vec<String>,
}

fn solid_recommendation(size: i32, multiple: bool, high_risk: bool) -> &'static str {
    match (multiple, size, high_risk) {
        (false, ..6, true) => "Solídny uzol <6 mm: voliteľné CT o 12 mesiacov (vysoké riziko).",
        (false, ..6, false) => "Solídny uzol <6 mm: kontrola sa nevyžaduje (nízke riziko).",
        (false, 6..=8, true) => {
            "Solídny uzol 6–8 mm: CT o 6–12 mesiacov, potom CT o 18–24 mesiacov (vysoké riziko)."
        }
        (false, 6..=8, false) => {
            "Solídny uzol 6–8 mm: CT o 6–12 mesiacov, zvážiť CT o 18–24 mesiacov (nízke riziko)."
        }
        (false, _, _) => "Solídny uzol >8 mm: CT o 3 mesiace, PET-CT alebo biopsia.",
        (true, ..6, true) => "Viacnásobné solídne uzly <6 mm: voliteľné CT o 12 mesiacov.",
        (true, ..6, false) => "Viacnásobné solídne uzly <6 mm: kontrola sa nevyžaduje.",
        (true, 6..=8, true) => {
            "Viacnásobné solídne uzly 6–8 mm: CT o 3–6 mesiacov, potom 18–24 mesiacov."
        }
        (true, 6..=8, false) => {
            "Viacnásobné solídne uzly 6–8 mm: CT o 3–6 mesiacov, zvážiť 18–24 mesiacov."
        }
        (true, _, _) => {
            "Viacnásobné solídne uzly >8 mm: CT o 3–6 mesiacov, potom 18–24 mesiacov; riadiť sa najpodozrivejším."
        }
    }
}

fn ground_glass_recommendation(size: i32, multiple: bool) -> &'static str {
    match (multiple, size < 6) {
        (false, true) => "Jeden ground-glass uzol <6 mm: kontrola sa nevyžaduje.",
        (false, false) => {
            "Jeden ground-glass uzol ≥6 mm: CT o 6–12 mesiacov; ak pretrváva, CT každé 2 roky do 5 rokov."
        }
        (true, true) => {
            "Viacnásobné subsolídne uzly <6 mm: CT o 3–6 mesiacov; ak stabilné, sledovanie podľa rizika."
        }
        (true, false) => {
            "Viacnásobné subsolídne uzly ≥6 mm: CT o 3–6 mesiacov; ďalší postup podľa najpodozrivejšieho."
        }
    }
}

fn part_solid_recommendation(size: i32, multiple: bool, solid_component: Option<i32>) -> &'static str {
    if multiple {
        return if size < 6 {
            "Viacnásobné subsolídne uzly <6 mm: CT o 3–6 mesiacov; ak stabilné, zvážiť CT o 2 a 4 roky."
        } else {
            "Viacnásobné subsolídne uzly ≥6 mm: CT o 3–6 mesiacov; ďalší postup podľa najpodozrivejšieho."
        };
    }
    if size < 6 {
        return "Jeden part-solid uzol <6 mm: sledovanie sa zvyčajne nevyžaduje.";
    }
    match solid_component {
        None => {
            "Jeden part-solid uzol ≥6 mm: CT o 3–6 mesiacov; ďalší postup závisí od veľkosti solidnej časti."
        }
        Some(..6) => {
            "Jeden part-solid uzol ≥6 mm so solidnou časťou <6 mm: CT o 3–6 mesiacov; ak pretrváva, ročné CT do 5 rokov."
        }
        Some(_) => "Jeden part-solid uzol so solidnou časťou ≥6 mm: zváž PET-CT alebo biopsiu.",
    }
}

pub fn recommend(nodule: &Nodule) -> FleischnerResult {
    let size = nodule.size_mm.max(0);
    let cutoff = nodule.brock_cutoff_percent;

    let high_risk = nodule
        .brock_probability
        .map(|p| p * 100.0 >= cutoff)
        .unwrap_or(nodule.high_risk);

    let mut notes = Vec::new();
    if let Some(p) = nodule.brock_probability {
        notes.push(brock::risk_note(p, high_risk, cutoff));
    }
    if nodule.thick_slice && size >= 6 {
        notes.push("Hrubé rezy: odporúčaná CT hrudníka s tenkými rezmi (≤1.5 mm).".to_string());
    }
    if nodule.incomplete_ct {
        notes.push(if size > 8 || nodule.suspicious_features {
            "Neúplné CT: pri >8 mm alebo podozrivom náleze doplň kompletné CT hrudníka.".to_string()
        } else {
            "Neúplné CT: pri ≤8 mm možno postupovať podľa Fleischner, ale preferuj kompletné CT."
                .to_string()
        });
    }
    notes.extend(MEASUREMENT_NOTES.iter().map(|n| n.to_string()));

    let recommendation = match nodule.nodule_type {
        Some(FleischnerType::Solid) => solid_recommendation(size, nodule.multiple, high_risk),
        Some(FleischnerType::GroundGlass) => ground_glass_recommendation(size, nodule.multiple),
        Some(FleischnerType::PartSolid) => {
            part_solid_recommendation(size, nodule.multiple, nodule.solid_component_mm)
        }
        None => UNKNOWN_TYPE,
    };

    FleischnerResult {
        recommendation: recommendation.to_string(),
        notes,
    }
}

/// Mean of the two axes, 0 unless both are positive.
pub fn mean_diameter(long_axis_mm: f64, short_axis_mm: f64) -> f64 {
    if long_axis_mm > 0.0 && short_axis_mm > 0.0 {
        (long_axis_mm + short_axis_mm) / 2.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct FleischnerInput {
    /// Already averaged size. Ignored when the axes are given.
    pub size_mm: Option<i32>,
    pub long_axis_mm: Option<f64>,
    pub short_axis_mm: Option<f64>,
    pub nodule_type: String,
    pub high_risk: bool,
    pub multiple: bool,
    pub solid_component_mm: Option<i32>,
    pub suspicious_features: bool,
    pub thick_slice: bool,
    pub incomplete_ct: bool,
    pub brock_probability: Option<f64>,
    pub brock_cutoff_percent: Option<f64>,
    /// Brock covariates, used only with the axes.
    pub age: Option<i32>,
    pub female: bool,
    pub family_history: bool,
    pub emphysema: bool,
    pub upper_lobe: bool,
    pub nodule_count: Option<i32>,
    pub spiculation: bool,
}

impl FleischnerInput {
    fn nodule(&self, size_mm: i32, brock_probability: Option<f64>) -> Nodule {
        Nodule {
            size_mm,
            nodule_type: FleischnerType::parse(&self.nodule_type),
            high_risk: self.high_risk,
            multiple: self.multiple,
            solid_component_mm: self.solid_component_mm,
            suspicious_features: self.suspicious_features,
            thick_slice: self.thick_slice,
            incomplete_ct: self.incomplete_ct,
            brock_probability,
            brock_cutoff_percent: self
                .brock_cutoff_percent
                .unwrap_or(DEFAULT_HIGH_RISK_CUTOFF_PERCENT),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkupResult {
    pub mean_diameter_mm: f64,
    pub size_mm: i32,
    pub brock_probability: Option<f64>,
    pub fleischner: FleischnerResult,
}

/// Axes → mean diameter → Brock → Fleischner.
///
/// A Brock probability that cannot be computed (no positive diameter) is
/// left out, and the boolean `high_risk` decides instead.
pub fn workup(input: &FleischnerInput, long_axis_mm: f64, short_axis_mm: f64) -> WorkupResult {
    let mean = mean_diameter(long_axis_mm, short_axis_mm);
    let size_mm = round_half_up(mean, 0) as i32;

    let nodule_type = FleischnerType::parse(&input.nodule_type)
        .map(FleischnerType::brock_type)
        .unwrap_or_default();
    let brock_input = BrockInput {
        age: input.age,
        female: input.female,
        family_history: input.family_history,
        emphysema: input.emphysema,
        diameter_mm: Some(mean),
        nodule_type,
        upper_lobe: input.upper_lobe,
        nodule_count: input.nodule_count,
        spiculation: input.spiculation,
        high_risk_cutoff_percent: input.brock_cutoff_percent,
    };
    let probability = brock::probability(&brock_input.factors(mean));
    let brock_probability = if probability.is_nan() {
        tracing::warn!(mean_diameter_mm = mean, "brock probability undefined, using high_risk flag");
        None
    } else {
        Some(probability)
    };

    WorkupResult {
        mean_diameter_mm: mean,
        size_mm,
        brock_probability,
        fleischner: recommend(&input.nodule(size_mm, brock_probability)),
    }
}

pub struct Fleischner;

impl Calculator for Fleischner {
    fn id(&self) -> &str {
        "fleischner"
    }

    fn name(&self) -> &str {
        "Fleischnerove kritériá pre sledovanie nodulov"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let mm = ScoreRange::new(0.0, 300.0);
            vec![
                InputField::integer("size_mm", "Veľkosť nodulu (mm)"),
                InputField::number("long_axis_mm", "Dlhá os (mm)").range(mm),
                InputField::number("short_axis_mm", "Krátka os (mm)").range(mm),
                InputField::choice(
                    "nodule_type",
                    "Typ nodulu",
                    &["solid", "ground-glass", "part-solid"],
                )
                .required(),
                InputField::flag("high_risk", "Vysoké riziko"),
                InputField::flag("multiple", "Viacnásobné uzly"),
                InputField::integer("solid_component_mm", "Solidná časť (mm)"),
                InputField::flag("suspicious_features", "Podozrivé znaky (rast/spikulácie/↑densita)"),
                InputField::flag("thick_slice", "Hrubé rezy"),
                InputField::flag("incomplete_ct", "Neúplné CT hrudníka"),
                InputField::number("brock_probability", "Brock pravdepodobnosť (0–1)")
                    .range(ScoreRange::new(0.0, 1.0)),
                InputField::number("brock_cutoff_percent", "Prah vysokého rizika (%)")
                    .range(ScoreRange::new(0.0, 100.0)),
                InputField::integer("age", "Vek pacienta (r.)")
                    .range(ScoreRange::stepped(0.0, 120.0, 1.0)),
                InputField::flag("female", "Žena"),
                InputField::flag("family_history", "Rodinná anamnéza karcinómu pľúc"),
                InputField::flag("emphysema", "Emfyzém"),
                InputField::flag("upper_lobe", "Horný lalok"),
                InputField::integer("nodule_count", "Počet uzlov")
                    .range(ScoreRange::stepped(1.0, 100.0, 1.0)),
                InputField::flag("spiculation", "Spikulácie"),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: FleischnerInput = parse_input(self.id(), input)?;

        if parsed.long_axis_mm.is_some() || parsed.short_axis_mm.is_some() {
            let result = workup(
                &parsed,
                parsed.long_axis_mm.unwrap_or(0.0),
                parsed.short_axis_mm.unwrap_or(0.0),
            );
            let summary = format!("Odporúčanie: {}", result.fleischner.recommendation);
            let notes = result.fleischner.notes.clone();
            return finish(self, input, summary, &result, notes);
        }

        let Some(size_mm) = parsed.size_mm else {
            return prompt(self, input, MISSING_VALUES);
        };
        let result = recommend(&parsed.nodule(size_mm, parsed.brock_probability));
        let summary = format!("Odporúčanie: {}", result.recommendation);
        finish(self, input, summary, &result, result.notes.clone())
    }
}
