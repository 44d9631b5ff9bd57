//! pneumo-calculators
//!
//! Pneumology calculators: spirometry interpretation, TNM-9 staging,
//! acid-base analysis and the bedside scores. Every calculator is a pure
//! function over a typed input record; the [`Calculator`] trait wraps each one
//! for callers that only hold JSON (forms, the command line).

pub mod calculators;
pub mod error;
pub mod scoring;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use pneumo_core::models::evaluation::Evaluation;

use calculators::*;
use error::CalculatorError;
use scoring::{InputField, ValidationError};

/// Trait implemented by each calculator.
pub trait Calculator: Send + Sync {
    /// Unique identifier (e.g., "spirometry_z", "tnm9").
    fn id(&self) -> &str;

    /// Menu title, in the report language.
    fn name(&self) -> &str;

    /// The inputs this calculator reads, in form order.
    fn fields(&self) -> &[InputField];

    /// Deserialize `input`, run the calculation and render the report.
    fn evaluate(&self, input: &Value) -> Result<Evaluation, CalculatorError>;

    /// Check numeric inputs against the ranges declared in [`Calculator::fields`].
    ///
    /// Missing inputs are not errors here: calculators answer those with a
    /// prompt in the report itself.
    fn validate_input(&self, input: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for field in self.fields() {
            let Some(range) = field.range else {
                continue;
            };
            let values: Vec<f64> = match input.get(&field.id) {
                Some(Value::Number(n)) => n.as_f64().into_iter().collect(),
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_f64).collect(),
                _ => continue,
            };
            for value in values {
                if !range.contains(value) {
                    errors.push(ValidationError {
                        field_id: field.id.clone(),
                        value,
                        expected_range: range,
                        message: format!(
                            "{}: {} {} is outside range [{}, {}]",
                            self.name(),
                            field.label,
                            value,
                            range.min,
                            range.max,
                        ),
                    });
                }
            }
        }
        errors
    }

    /// `id=value` pairs for every supplied input, in field order.
    fn echo_inputs(&self, input: &Value) -> String {
        self.fields()
            .iter()
            .filter_map(|field| match input.get(&field.id) {
                None | Some(Value::Null) => None,
                Some(value) => Some(format!("{}={}", field.id, render_value(value))),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join("/"),
        other => other.to_string(),
    }
}

/// Deserialize a calculator's typed input from JSON.
pub(crate) fn parse_input<T: DeserializeOwned>(
    calculator_id: &str,
    input: &Value,
) -> Result<T, CalculatorError> {
    serde_json::from_value(input.clone()).map_err(|source| CalculatorError::InvalidInput {
        calculator_id: calculator_id.to_string(),
        source,
    })
}

/// Package a finished calculation as an [`Evaluation`].
pub(crate) fn finish<T: Serialize>(
    calculator: &dyn Calculator,
    input: &Value,
    summary: String,
    detail: &T,
    notes: Vec<String>,
) -> Result<Evaluation, CalculatorError> {
    Ok(Evaluation {
        calculator_id: calculator.id().to_string(),
        calculator_name: calculator.name().to_string(),
        inputs: calculator.echo_inputs(input),
        summary,
        detail: serde_json::to_value(detail)?,
        notes,
    })
}

/// An [`Evaluation`] that only asks for the missing inputs.
pub(crate) fn prompt(
    calculator: &dyn Calculator,
    input: &Value,
    text: &str,
) -> Result<Evaluation, CalculatorError> {
    finish(calculator, input, text.to_string(), &Value::Null, Vec::new())
}

/// Return all registered calculators, in menu order.
pub fn all_calculators() -> Vec<Box<dyn Calculator>> {
    vec![
        Box::new(spirometry::zscore::SpirometryZScore),
        Box::new(spirometry::percent::SpirometryPercent),
        Box::new(bronchodilation::Bronchodilation2022),
        Box::new(bronchodilation::Bronchodilation2005),
        Box::new(lung_resection::DlcoHbCorrection),
        Box::new(lung_resection::PredictedPostoperative),
        Box::new(tnm::Tnm9),
        Box::new(light::LightCriteria),
        Box::new(abg::AcidBase),
        Box::new(bode::Bode),
        Box::new(cat::Cat),
        Box::new(curb65::Curb65),
        Box::new(fleischner::Fleischner),
        Box::new(brock::Brock),
        Box::new(geneva::Geneva),
        Box::new(mmrc::Mmrc),
        Box::new(steroid::SteroidConversion),
        Box::new(psi::Psi),
        Box::new(pesi::Pesi),
        Box::new(resect90::Resect90),
        Box::new(mayo::SolitaryNodule),
        Box::new(oxygenation::Oxygenation),
        Box::new(stopbang::StopBang),
    ]
}

/// Look up a calculator by ID.
pub fn get_calculator(id: &str) -> Option<Box<dyn Calculator>> {
    all_calculators().into_iter().find(|c| c.id() == id)
}

/// Validate and evaluate `input` with the calculator registered as `id`.
///
/// A JSON `null` is treated as an empty form.
pub fn evaluate(id: &str, input: &Value) -> Result<Evaluation, CalculatorError> {
    let calculator =
        get_calculator(id).ok_or_else(|| CalculatorError::UnknownCalculator(id.to_string()))?;

    let empty = Value::Object(serde_json::Map::new());
    let input = if input.is_null() { &empty } else { input };

    if let Some(error) = calculator.validate_input(input).into_iter().next() {
        return Err(error.into());
    }

    let evaluation = calculator.evaluate(input)?;
    tracing::debug!(calculator = id, summary = %evaluation.summary, "evaluated");
    Ok(evaluation)
}
