//! TNM-9 lung cancer staging.
//!
//! T, N and M are classified independently and then combined into a stage
//! group. Nothing is ever rejected: missing inputs fall back to defaults
//! (see [`calculate_t`]) and an N category without a stage row is reported as
//! [`StageGroup::Unstageable`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, Calculator};

/// Every selectable lymph-node station, in form order.
pub const ALL_STATIONS: [&str; 20] = [
    "1R", "1L", "2R", "2L", "3aR", "3aL", "3p", "4R", "4L", "5", "6", "7", "8", "9", "10R", "10L",
    "11R", "11L", "12R", "12L",
];

/// Mediastinal and subcarinal stations.
pub const N2_STATIONS: [&str; 12] = [
    "2R", "2L", "3aR", "3aL", "3p", "4R", "4L", "5", "6", "7", "8", "9",
];

/// Hilar and intrapulmonary stations.
pub const N1_STATIONS: [&str; 6] = ["10R", "10L", "11R", "11L", "12R", "12L"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TCategory {
    Tis,
    T1a,
    T1b,
    T1c,
    T2a,
    T2b,
    T3,
    T4,
}

impl TCategory {
    /// Position in the severity order. Comparisons go through this, not
    /// through declaration order.
    pub const fn ordinal(self) -> u8 {
        match self {
            TCategory::Tis => 0,
            TCategory::T1a => 1,
            TCategory::T1b => 2,
            TCategory::T1c => 3,
            TCategory::T2a => 4,
            TCategory::T2b => 5,
            TCategory::T3 => 6,
            TCategory::T4 => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TCategory::Tis => "Tis",
            TCategory::T1a => "T1a",
            TCategory::T1b => "T1b",
            TCategory::T1c => "T1c",
            TCategory::T2a => "T2a",
            TCategory::T2b => "T2b",
            TCategory::T3 => "T3",
            TCategory::T4 => "T4",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TCategory::Tis => "Carcinoma in situ",
            TCategory::T1a => "Tumor ≤ 1 cm",
            TCategory::T1b => "Tumor > 1 cm but ≤ 2 cm",
            TCategory::T1c => "Tumor > 2 cm but ≤ 3 cm",
            TCategory::T2a => "Tumor > 3 cm but ≤ 4 cm OR invasion of visceral pleura, main bronchus involvement, atelectasis/pneumonitis",
            TCategory::T2b => "Tumor > 4 cm but ≤ 5 cm",
            TCategory::T3 => "Tumor > 5 cm but ≤ 7 cm OR invasion of chest wall/parietal pleura, phrenic nerve, pericardium, or separate nodules in same lobe",
            TCategory::T4 => "Tumor > 7 cm OR invasion of mediastinum, heart, great vessels, trachea, carina, vertebral body/canal, esophagus, or separate nodules in different ipsilateral lobe",
        }
    }

    /// Base category from the largest tumour diameter.
    pub fn from_size(size_cm: f64) -> Self {
        if size_cm <= 1.0 {
            TCategory::T1a
        } else if size_cm <= 2.0 {
            TCategory::T1b
        } else if size_cm <= 3.0 {
            TCategory::T1c
        } else if size_cm <= 4.0 {
            TCategory::T2a
        } else if size_cm <= 5.0 {
            TCategory::T2b
        } else if size_cm <= 7.0 {
            TCategory::T3
        } else {
            TCategory::T4
        }
    }
}

impl PartialOrd for TCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum NCategory {
    N0,
    N1,
    N2a,
    N2b,
    N3,
    NX,
}

impl NCategory {
    pub fn label(self) -> &'static str {
        match self {
            NCategory::N0 => "N0",
            NCategory::N1 => "N1",
            NCategory::N2a => "N2a",
            NCategory::N2b => "N2b",
            NCategory::N3 => "N3",
            NCategory::NX => "NX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MCategory {
    M0,
    M1a,
    M1b,
    M1c1,
    M1c2,
}

impl MCategory {
    pub fn label(self) -> &'static str {
        match self {
            MCategory::M0 => "M0",
            MCategory::M1a => "M1a",
            MCategory::M1b => "M1b",
            MCategory::M1c1 => "M1c1",
            MCategory::M1c2 => "M1c2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MCategory::M0 => "No distant metastasis",
            MCategory::M1a => "Intrathoracic metastasis: contralateral lung nodule, pleural/pericardial nodules, or malignant effusion",
            MCategory::M1b => "Single extrathoracic metastasis",
            MCategory::M1c1 => "Multiple extrathoracic metastases in a single organ",
            MCategory::M1c2 => "Multiple extrathoracic metastases in multiple organs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[allow(clippy::upper_case_acronyms)]
pub enum StageGroup {
    Stage0,
    IA1,
    IA2,
    IA3,
    IB,
    IIA,
    IIB,
    IIIA,
    IIIB,
    IIIC,
    IVA,
    IVB,
    Unstageable,
}

impl StageGroup {
    pub fn label(self) -> &'static str {
        match self {
            StageGroup::Stage0 => "Stage 0",
            StageGroup::IA1 => "Stage IA1",
            StageGroup::IA2 => "Stage IA2",
            StageGroup::IA3 => "Stage IA3",
            StageGroup::IB => "Stage IB",
            StageGroup::IIA => "Stage IIA",
            StageGroup::IIB => "Stage IIB",
            StageGroup::IIIA => "Stage IIIA",
            StageGroup::IIIB => "Stage IIIB",
            StageGroup::IIIC => "Stage IIIC",
            StageGroup::IVA => "Stage IVA",
            StageGroup::IVB => "Stage IVB",
            StageGroup::Unstageable => "Unstageable",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TumorSide {
    #[default]
    Right,
    Left,
}

/// Anatomical findings that raise T regardless of size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct UpstagingFactors {
    pub visceral_pleural_invasion: bool,
    pub main_bronchus_involvement: bool,
    pub atelectasis: bool,
    pub chest_wall: bool,
    pub phrenic_nerve: bool,
    pub pericardium: bool,
    pub separate_nodule_same_lobe: bool,
    pub diaphragm: bool,
    pub mediastinum: bool,
    pub heart: bool,
    pub great_vessels: bool,
    pub trachea: bool,
    pub laryngeal_nerve: bool,
    pub esophagus: bool,
    pub vertebra: bool,
    pub carina: bool,
    pub separate_nodule_different_lobe: bool,
}

const UPSTAGING_LABELS: [(&str, &str); 17] = [
    ("visceral_pleural_invasion", "Invázia viscerálnej pleury"),
    ("main_bronchus_involvement", "Postihnutie hlavného bronchu"),
    ("atelectasis", "Atelektáza / obštrukčná pneumonitída"),
    ("chest_wall", "Invázia hrudnej steny / parietálnej pleury"),
    ("phrenic_nerve", "Invázia n. phrenicus"),
    ("pericardium", "Invázia perikardu"),
    ("separate_nodule_same_lobe", "Satelitný nodul v tom istom laloku"),
    ("diaphragm", "Invázia bránice"),
    ("mediastinum", "Invázia mediastína"),
    ("heart", "Invázia srdca"),
    ("great_vessels", "Invázia veľkých ciev"),
    ("trachea", "Invázia trachey"),
    ("laryngeal_nerve", "Invázia n. laryngeus recurrens"),
    ("esophagus", "Invázia pažeráka"),
    ("vertebra", "Invázia stavca"),
    ("carina", "Invázia kariny"),
    ("separate_nodule_different_lobe", "Nodul v inom ipsilaterálnom laloku"),
];

impl UpstagingFactors {
    fn forces_t4(&self) -> bool {
        self.diaphragm
            || self.mediastinum
            || self.heart
            || self.great_vessels
            || self.trachea
            || self.laryngeal_nerve
            || self.esophagus
            || self.vertebra
            || self.carina
            || self.separate_nodule_different_lobe
    }

    fn t3_floor(&self) -> bool {
        self.chest_wall || self.phrenic_nerve || self.pericardium || self.separate_nodule_same_lobe
    }

    fn t2a_floor(&self) -> bool {
        self.visceral_pleural_invasion || self.main_bronchus_involvement || self.atelectasis
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct TumorInput {
    /// Largest diameter in cm.
    pub size_cm: Option<f64>,
    #[serde(flatten)]
    pub upstaging: UpstagingFactors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct NodalInput {
    pub side: TumorSide,
    /// Involved station codes, e.g. "4R", "7", "10L".
    pub stations: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct MetastasisInput {
    pub intrathoracic: bool,
    pub extrathoracic_count: u32,
    pub organs_involved: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct TnmInput {
    #[serde(flatten)]
    pub tumor: TumorInput,
    #[serde(flatten)]
    pub nodes: NodalInput,
    #[serde(flatten)]
    pub metastasis: MetastasisInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TnmResult {
    pub t: TCategory,
    pub n: NCategory,
    pub m: MCategory,
    pub stage: StageGroup,
}

impl TnmResult {
    /// "T1a N0 M0"
    pub fn line_tnm(&self) -> String {
        format!("{} {} {}", self.t.label(), self.n.label(), self.m.label())
    }

    pub fn clinical_stage(&self) -> &'static str {
        self.stage.label()
    }

    pub fn report(&self) -> String {
        format!(
            "TNM: {}\nKlinické štádium: {}",
            self.line_tnm(),
            self.clinical_stage()
        )
    }
}

/// T from size, raised by upstaging findings.
///
/// An absent size yields Tis. Only the highest applicable tier of upstaging
/// factors is applied, and upstaging never lowers the size-based category.
pub fn calculate_t(input: &TumorInput) -> TCategory {
    let Some(size) = input.size_cm else {
        tracing::warn!("tumour size missing, defaulting T to Tis");
        return TCategory::Tis;
    };
    let t = TCategory::from_size(size);
    let up = &input.upstaging;

    if up.forces_t4() {
        TCategory::T4
    } else if up.t3_floor() {
        t.max(TCategory::T3)
    } else if up.t2a_floor() {
        t.max(TCategory::T2a)
    } else {
        t
    }
}

/// Station number without its laterality suffix: "3aR" → "3", "10L" → "10".
fn station_number(station: &str) -> &str {
    let end = station
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(station.len());
    &station[..end]
}

fn is_contralateral(station: &str, side: TumorSide) -> bool {
    match side {
        TumorSide::Right => station.ends_with('L'),
        TumorSide::Left => station.ends_with('R'),
    }
}

pub fn calculate_n(input: &NodalInput) -> NCategory {
    let stations = &input.stations;
    if stations.is_empty() {
        return NCategory::N0;
    }

    let n3 = stations
        .iter()
        .any(|s| station_number(s) == "1" || is_contralateral(s, input.side));
    if n3 {
        return NCategory::N3;
    }

    let n2 = stations
        .iter()
        .filter(|s| N2_STATIONS.contains(&s.as_str()))
        .count();
    match n2 {
        0 => {}
        1 => return NCategory::N2a,
        _ => return NCategory::N2b,
    }

    if stations.iter().any(|s| N1_STATIONS.contains(&s.as_str())) {
        NCategory::N1
    } else {
        NCategory::N0
    }
}

/// M from metastasis descriptors.
///
/// Several extrathoracic metastases with `organs_involved == 0` fall through
/// to M0; callers are expected to supply the organ count.
pub fn calculate_m(input: &MetastasisInput) -> MCategory {
    if input.intrathoracic {
        MCategory::M1a
    } else if input.extrathoracic_count == 1 {
        MCategory::M1b
    } else if input.extrathoracic_count > 1 && input.organs_involved == 1 {
        MCategory::M1c1
    } else if input.organs_involved > 1 {
        MCategory::M1c2
    } else {
        if input.extrathoracic_count > 1 {
            tracing::warn!(
                count = input.extrathoracic_count,
                "multiple extrathoracic metastases without organ count, M stays M0"
            );
        }
        MCategory::M0
    }
}

pub fn calculate_stage(t: TCategory, n: NCategory, m: MCategory) -> StageGroup {
    use NCategory::*;
    use StageGroup::*;

    match m {
        MCategory::M1a | MCategory::M1b => return IVA,
        MCategory::M1c1 | MCategory::M1c2 => return IVB,
        MCategory::M0 => {}
    }

    match (t, n) {
        (TCategory::Tis, _) => Stage0,
        (_, NX) => Unstageable,
        (TCategory::T1a, N0) => IA1,
        (TCategory::T1b, N0) => IA2,
        (TCategory::T1c, N0) => IA3,
        (TCategory::T1a | TCategory::T1b | TCategory::T1c, N1) => IIA,
        (TCategory::T1a | TCategory::T1b | TCategory::T1c, N2a) => IIB,
        (TCategory::T1a | TCategory::T1b | TCategory::T1c, N2b) => IIIA,
        (TCategory::T1a | TCategory::T1b | TCategory::T1c, N3) => IIIB,
        (TCategory::T2a, N0) => IB,
        (TCategory::T2b, N0) => IIA,
        (TCategory::T2a | TCategory::T2b, N1) => IIB,
        (TCategory::T2a | TCategory::T2b, N2a) => IIIA,
        (TCategory::T2a | TCategory::T2b, N2b | N3) => IIIB,
        (TCategory::T3, N0) => IIB,
        (TCategory::T3, N1 | N2a) => IIIA,
        (TCategory::T3, N2b) => IIIB,
        (TCategory::T3, N3) => IIIC,
        (TCategory::T4, N0 | N1) => IIIA,
        (TCategory::T4, N2a | N2b) => IIIB,
        (TCategory::T4, N3) => IIIC,
    }
}

pub fn evaluate_tnm(input: &TnmInput) -> TnmResult {
    let t = calculate_t(&input.tumor);
    let n = calculate_n(&input.nodes);
    let m = calculate_m(&input.metastasis);
    let stage = calculate_stage(t, n, m);
    tracing::debug!(t = t.label(), n = n.label(), m = m.label(), stage = stage.label(), "tnm staged");
    TnmResult { t, n, m, stage }
}

pub struct Tnm9;

impl Calculator for Tnm9 {
    fn id(&self) -> &str {
        "tnm9"
    }

    fn name(&self) -> &str {
        "TNM klasifikácia"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let mut fields = vec![
                InputField::number("size_cm", "Veľkosť nádoru (cm)"),
            ];
            fields.extend(
                UPSTAGING_LABELS
                    .iter()
                    .map(|(id, label)| InputField::flag(id, label)),
            );
            fields.extend([
                InputField::choice("side", "Strana nádoru", &["right", "left"]),
                InputField::multi_choice("stations", "Postihnuté uzlinové stanice", &ALL_STATIONS),
                InputField::flag("intrathoracic", "Intratorakálne metastázy"),
                InputField::integer("extrathoracic_count", "Počet extratorakálnych metastáz")
                    .range(ScoreRange::stepped(0.0, 100.0, 1.0)),
                InputField::integer("organs_involved", "Počet postihnutých orgánov")
                    .range(ScoreRange::stepped(0.0, 20.0, 1.0)),
            ]);
            fields
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: TnmInput = parse_input(self.id(), input)?;
        let result = evaluate_tnm(&parsed);
        finish(self, input, result.report(), &result, Vec::new())
    }
}
