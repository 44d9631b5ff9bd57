//! Lung-function interpretation.
//!
//! Two independent interpreters: [`zscore`] grades against the GLI limits of
//! normal (ERS/ATS 2022), [`percent`] against fixed percent-predicted cutoffs
//! (ERS 2005). They share the shape of their findings but no thresholds.
//!
//! Both produce one report sentence in five parts: ventilatory pattern,
//! hyperinflation, airway resistance, then diffusion (DLCO, KCO, VA).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod percent;
pub mod zscore;

/// Hyperinflation judged from RV/TLC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Hyperinflation {
    NotAssessed,
    Present,
    Absent,
}

impl Hyperinflation {
    pub fn phrase(self) -> &'static str {
        match self {
            Hyperinflation::NotAssessed => "hyperinflácia nehodnotená",
            Hyperinflation::Present => "s hyperinfláciou",
            Hyperinflation::Absent => "bez hyperinflácie",
        }
    }
}

/// Specific airway resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AirwayResistance {
    NotAssessed,
    Elevated,
    Normal,
}

impl AirwayResistance {
    /// Wording of the z-score report.
    pub fn phrase(self) -> &'static str {
        match self {
            AirwayResistance::NotAssessed => "odpory nehodnotené",
            AirwayResistance::Elevated => "zvýšené odpory v dýchacích cestách",
            AirwayResistance::Normal => "bez zvýšených odporov v dýchacích cestách",
        }
    }

    /// Wording of the percent-predicted report.
    pub fn short_phrase(self) -> &'static str {
        match self {
            AirwayResistance::NotAssessed => "odpory nehodnotené",
            AirwayResistance::Elevated => "odpory zvýšené",
            AirwayResistance::Normal => "odpory v norme",
        }
    }
}

/// Ungraded flag for a diffusion sub-parameter (KCO, VA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Marker {
    NotAssessed,
    Elevated,
    Reduced,
    Normal,
}
