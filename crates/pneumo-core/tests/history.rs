use pneumo_core::error::CoreError;
use pneumo_core::models::evaluation::Evaluation;
use pneumo_core::models::history::{EvaluationHistory, HistoryEntry, DEFAULT_HISTORY_CAPACITY};

fn entry(n: usize) -> HistoryEntry {
    HistoryEntry::new("CAT skóre", format!("run={n}"), format!("result {n}"))
}

#[test]
fn default_capacity_is_ten() {
    let history = EvaluationHistory::default();
    assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(history.capacity(), 10);
    assert!(history.is_empty());
}

#[test]
fn keeps_most_recent_first_and_caps_at_ten() {
    let mut history = EvaluationHistory::default();
    for n in 0..15 {
        history.push(entry(n));
    }

    assert_eq!(history.len(), 10);
    let inputs: Vec<&str> = history.entries().map(|e| e.inputs.as_str()).collect();
    assert_eq!(inputs.first(), Some(&"run=14"));
    assert_eq!(inputs.last(), Some(&"run=5"));
    assert_eq!(history.latest().unwrap().result, "result 14");
}

#[test]
fn custom_capacity() {
    let mut history = EvaluationHistory::with_capacity(2).unwrap();
    history.push(entry(1));
    history.push(entry(2));
    history.push(entry(3));
    let results: Vec<&str> = history.entries().map(|e| e.result.as_str()).collect();
    assert_eq!(results, ["result 3", "result 2"]);
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(matches!(
        EvaluationHistory::with_capacity(0),
        Err(CoreError::ZeroCapacity)
    ));
}

#[test]
fn clear_empties_history() {
    let mut history = EvaluationHistory::default();
    history.push(entry(1));
    history.clear();
    assert!(history.is_empty());
    assert!(history.latest().is_none());
}

#[test]
fn record_stores_full_report() {
    let evaluation = Evaluation {
        calculator_id: "bode".to_string(),
        calculator_name: "BODE index".to_string(),
        inputs: "bmi=22".to_string(),
        summary: "BODE skóre: 1 • Nízke riziko".to_string(),
        detail: serde_json::Value::Null,
        notes: vec!["BMI: 22.0 → 0 b.".to_string()],
    };
    let mut history = EvaluationHistory::default();
    history.record(&evaluation);

    let latest = history.latest().unwrap();
    assert_eq!(latest.kind, "BODE index");
    assert_eq!(latest.inputs, "bmi=22");
    assert_eq!(latest.result, "BODE skóre: 1 • Nízke riziko\n\n• BMI: 22.0 → 0 b.");
}

#[test]
fn entries_get_distinct_ids() {
    let a = entry(1);
    let b = entry(2);
    assert_ne!(a.id, b.id);
}
