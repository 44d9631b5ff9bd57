//! Replay of a batch of evaluation requests through a bounded history.

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pneumo_calculators::error::CalculatorError;
use pneumo_core::error::CoreError;
use pneumo_core::format::format_timestamp;
use pneumo_core::models::history::EvaluationHistory;

use crate::config::PneumoConfig;

/// One line of a session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub calculator: String,
    #[serde(default)]
    pub input: Value,
}

/// Fill inputs the config provides a value for when the caller left them out.
///
/// Only the Brock high-risk cutoff is configurable today; it is injected into
/// the `brock` and `fleischner` forms.
pub fn apply_config(calculator_id: &str, input: Value, config: &PneumoConfig) -> Value {
    let key = match calculator_id {
        "brock" => "high_risk_cutoff_percent",
        "fleischner" => "brock_cutoff_percent",
        _ => return input,
    };
    let mut input = match input {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    if let Some(obj) = input.as_object_mut() {
        obj.entry(key)
            .or_insert_with(|| Value::from(config.brock_high_risk_cutoff_percent));
    }
    input
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("request {index} ({calculator}): {source}")]
    Calculator {
        index: usize,
        calculator: String,
        #[source]
        source: CalculatorError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Evaluate `requests` in order, recording each into a history of the
/// configured capacity. Stops at the first failing request.
pub fn run(requests: &[SessionRequest], config: &PneumoConfig) -> Result<EvaluationHistory, SessionError> {
    let mut history = EvaluationHistory::with_capacity(config.history_capacity)?;
    for (index, request) in requests.iter().enumerate() {
        let input = apply_config(&request.calculator, request.input.clone(), config);
        let evaluation = pneumo_calculators::evaluate(&request.calculator, &input).map_err(|source| {
            SessionError::Calculator {
                index,
                calculator: request.calculator.clone(),
                source,
            }
        })?;
        history.record(&evaluation);
    }
    tracing::info!(requests = requests.len(), kept = history.len(), "session replayed");
    Ok(history)
}

/// Newest first, one block per entry:
///
/// ```text
/// 07.03.2024 14:05 • CURB-65
/// confusion=true
/// Skóre: 1 • ...
/// ```
pub fn render_history(history: &EvaluationHistory, tz: &TimeZone) -> String {
    history
        .entries()
        .map(|entry| {
            let mut block = format!("{} • {}", format_timestamp(entry.timestamp, tz), entry.kind);
            if !entry.inputs.is_empty() {
                block.push('\n');
                block.push_str(&entry.inputs);
            }
            block.push('\n');
            block.push_str(&entry.result);
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
