use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The outcome of running one calculator once.
///
/// `summary` is the pre-rendered report text shown to (and copied by) the
/// clinician; `detail` carries the structured result record of the calculator
/// that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    pub calculator_id: String,
    pub calculator_name: String,
    /// `key=value` echo of the supplied inputs, in form order.
    pub inputs: String,
    pub summary: String,
    pub detail: serde_json::Value,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Evaluation {
    /// Summary followed by bullet notes, one per line.
    pub fn report(&self) -> String {
        if self.notes.is_empty() {
            return self.summary.clone();
        }
        let mut text = self.summary.clone();
        text.push('\n');
        for note in &self.notes {
            text.push_str(&format!("\n• {note}"));
        }
        text
    }
}
