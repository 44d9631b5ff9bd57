//! Corticosteroid dose conversion through the prednisone equivalent.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::to_fixed;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, prompt, Calculator};

/// Drug name and the dose (mg) equivalent to 5 mg of prednisone.
pub const STEROID_TABLE: [(&str, f64); 8] = [
    ("Betametazon (IV)", 0.75),
    ("Kortizón (PO)", 25.0),
    ("Dexametazon (IV/PO)", 0.75),
    ("Hydrokortizón (IV/PO)", 20.0),
    ("Metylprednizolón (IV/PO)", 4.0),
    ("Prednizolón (PO)", 5.0),
    ("Prednison (PO)", 5.0),
    ("Triamcinolón (IV)", 4.0),
];

const PREDNISONE_REFERENCE_MG: f64 = 5.0;

pub const INVALID_DOSE: &str = "Zadajte platnú dávku.";

pub fn drug_names() -> impl Iterator<Item = &'static str> {
    STEROID_TABLE.iter().map(|(name, _)| *name)
}

fn equivalent_dose(drug: &str) -> Option<f64> {
    STEROID_TABLE
        .iter()
        .find(|(name, _)| *name == drug)
        .map(|(_, dose)| *dose)
}

/// Equivalent dose of `output_drug`. `None` for an unknown drug or a
/// non-positive dose.
pub fn convert(input_drug: &str, dose_mg: f64, output_drug: &str) -> Option<f64> {
    let input = equivalent_dose(input_drug)?;
    let output = equivalent_dose(output_drug)?;
    if dose_mg <= 0.0 {
        return None;
    }
    let prednisone = dose_mg * (PREDNISONE_REFERENCE_MG / input);
    Some(prednisone * (output / PREDNISONE_REFERENCE_MG))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct SteroidInput {
    pub input_drug: String,
    pub dose_mg: Option<f64>,
    pub output_drug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SteroidResult {
    pub input_drug: String,
    pub dose_mg: f64,
    pub output_drug: String,
    pub converted_mg: f64,
}

pub struct SteroidConversion;

impl Calculator for SteroidConversion {
    fn id(&self) -> &str {
        "steroid"
    }

    fn name(&self) -> &str {
        "Konverzia kortikosteroidov"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let drugs: Vec<&str> = drug_names().collect();
            vec![
                InputField::choice("input_drug", "Vstupný liek", &drugs).required(),
                InputField::number("dose_mg", "Dávka (mg)")
                    .range(ScoreRange::new(0.0, 10_000.0))
                    .required(),
                InputField::choice("output_drug", "Cieľový liek", &drugs).required(),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: SteroidInput = parse_input(self.id(), input)?;
        let Some(dose) = parsed.dose_mg.filter(|d| *d > 0.0) else {
            return prompt(self, input, INVALID_DOSE);
        };
        let Some(converted) = convert(&parsed.input_drug, dose, &parsed.output_drug) else {
            let unknown = if equivalent_dose(&parsed.input_drug).is_none() {
                &parsed.input_drug
            } else {
                &parsed.output_drug
            };
            tracing::warn!(drug = %unknown, "unknown corticosteroid");
            return prompt(self, input, &format!("Neznámy liek: {unknown}."));
        };

        let summary = format!(
            "{} mg {} ≈ {} mg {}",
            to_fixed(dose, 1),
            parsed.input_drug,
            to_fixed(converted, 1),
            parsed.output_drug
        );
        let result = SteroidResult {
            input_drug: parsed.input_drug,
            dose_mg: dose,
            output_drug: parsed.output_drug,
            converted_mg: converted,
        };
        let notes = vec!["Výsledky sú orientačné – vždy zohľadni klinický stav pacienta.".to_string()];
        finish(self, input, summary, &result, notes)
    }
}
