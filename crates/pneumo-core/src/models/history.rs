use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::evaluation::Evaluation;
use crate::error::CoreError;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// One remembered evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: jiff::Timestamp,
    /// Calculator name as shown in the menu, e.g. "Spirometria (z-skóre)".
    pub kind: String,
    pub inputs: String,
    pub result: String,
}

impl HistoryEntry {
    pub fn new(kind: impl Into<String>, inputs: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: jiff::Timestamp::now(),
            kind: kind.into(),
            inputs: inputs.into(),
            result: result.into(),
        }
    }

    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self::new(
            evaluation.calculator_name.clone(),
            evaluation.inputs.clone(),
            evaluation.report(),
        )
    }
}

/// Bounded, most-recent-first list of past evaluations.
///
/// Lives only as long as the session that owns it; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl Default for EvaluationHistory {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            entries: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY + 1),
        }
    }
}

impl EvaluationHistory {
    pub fn with_capacity(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        })
    }

    /// Prepend `entry`, dropping the oldest one once the cap is exceeded.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn record(&mut self, evaluation: &Evaluation) {
        self.push(HistoryEntry::from_evaluation(evaluation));
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
