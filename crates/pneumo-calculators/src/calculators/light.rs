//! Light's criteria for pleural effusion.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use pneumo_core::format::to_fixed;
use pneumo_core::models::evaluation::Evaluation;

use crate::error::CalculatorError;
use crate::scoring::{InputField, ScoreRange};
use crate::{finish, parse_input, Calculator};

pub const PROMPT: &str = "Zadajte sérové a pleurálne hodnoty proteínov a LDH aj hornú hranicu normy LDH.";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct LightInput {
    /// g/dL
    pub serum_protein: Option<f64>,
    /// g/dL
    pub pleural_protein: Option<f64>,
    /// U/L
    pub serum_ldh: Option<f64>,
    /// U/L
    pub pleural_ldh: Option<f64>,
    /// Upper limit of normal for serum LDH, U/L.
    pub serum_ldh_uln: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LightResult {
    pub protein_ratio: f64,
    pub ldh_ratio: f64,
    pub two_thirds_uln: f64,
    pub is_exudate: bool,
    pub explanation: Vec<String>,
}

pub fn evaluate_light(
    serum_protein: f64,
    pleural_protein: f64,
    serum_ldh: f64,
    pleural_ldh: f64,
    serum_ldh_uln: f64,
) -> LightResult {
    let protein_ratio = pleural_protein / serum_protein;
    let ldh_ratio = pleural_ldh / serum_ldh;
    let two_thirds_uln = 2.0 / 3.0 * serum_ldh_uln;

    let criteria = [
        (protein_ratio > 0.5, "Proteínové kritérium splnené (>0.5)"),
        (ldh_ratio > 0.6, "LDH pomerové kritérium splnené (>0.6)"),
        (pleural_ldh > two_thirds_uln, "LDH > 2/3 ULN splnené"),
    ];
    let met: Vec<&str> = criteria
        .iter()
        .filter(|(met, _)| *met)
        .map(|(_, label)| *label)
        .collect();
    let is_exudate = !met.is_empty();

    let verdict = if is_exudate {
        format!("➤ Výpotok je EXSUDÁT (splnené: {})", met.join(", "))
    } else {
        "➤ Výpotok je TRANSUDÁT (žiadne kritérium nesplnené)".to_string()
    };
    let explanation = vec![
        format!("PF/S proteín = {} (kritérium >0.50)", to_fixed(protein_ratio, 2)),
        format!("PF/S LDH = {} (kritérium >0.60)", to_fixed(ldh_ratio, 2)),
        format!(
            "Pleural LDH = {} vs 2/3 ULN = {}",
            to_fixed(pleural_ldh, 0),
            to_fixed(two_thirds_uln, 0)
        ),
        verdict,
    ];

    LightResult {
        protein_ratio,
        ldh_ratio,
        two_thirds_uln,
        is_exudate,
        explanation,
    }
}

pub struct LightCriteria;

impl Calculator for LightCriteria {
    fn id(&self) -> &str {
        "light"
    }

    fn name(&self) -> &str {
        "Lightove kritériá"
    }

    fn fields(&self) -> &[InputField] {
        static FIELDS: LazyLock<Vec<InputField>> = LazyLock::new(|| {
            let protein = ScoreRange::new(0.01, 20.0);
            let ldh = ScoreRange::new(0.01, 100_000.0);
            vec![
                InputField::number("serum_protein", "Sérum proteíny (g/dL)").range(protein).required(),
                InputField::number("pleural_protein", "Pleurálne proteíny (g/dL)")
                    .range(ScoreRange::new(0.0, 20.0))
                    .required(),
                InputField::number("serum_ldh", "Sérum LDH (U/L)").range(ldh).required(),
                InputField::number("pleural_ldh", "Pleurálne LDH (U/L)")
                    .range(ScoreRange::new(0.0, 100_000.0))
                    .required(),
                InputField::number("serum_ldh_uln", "Horná hranica normy LDH (U/L)")
                    .range(ldh)
                    .required(),
            ]
        });
        &FIELDS
    }

    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError> {
        let parsed: LightInput = parse_input(self.id(), input)?;
        let result = match (
            parsed.serum_protein,
            parsed.pleural_protein,
            parsed.serum_ldh,
            parsed.pleural_ldh,
            parsed.serum_ldh_uln,
        ) {
            (Some(sp), Some(pp), Some(sl), Some(pl), Some(uln)) => {
                Some(evaluate_light(sp, pp, sl, pl, uln))
            }
            _ => None,
        };
        let summary = result
            .as_ref()
            .map(|r| r.explanation.join("\n"))
            .unwrap_or_else(|| PROMPT.to_string());
        finish(self, input, summary, &result, Vec::new())
    }
}
