use pneumo_calculators::calculators::abg::{analyze, AcidBaseDisorder, RespiratoryCourse, PROMPT};
use serde_json::json;

#[test]
fn metabolic_acidosis_with_low_pco2_suggests_respiratory_alkalosis() {
    let analysis = analyze(7.25, 3.5, 16.0, Some(140.0), Some(100.0), Some(20.0), None);
    assert_eq!(analysis.primary, AcidBaseDisorder::MetabolicAcidosis);
    assert_eq!(analysis.anion_gap, Some(24.0));
    assert_eq!(analysis.anion_gap_corrected, Some(29.0));
    assert_eq!(
        analysis.notes,
        vec!["pCO₂ < Winter – pridružená respiračná alkalóza?"]
    );
    assert_eq!(
        analysis.summary(),
        "Primárna porucha: Metabolická acidóza\n\
         Očak. PaCO₂: 4.27 kPa\n\
         Aniónová medzera: 24.0 mmol/L\n\
         AG (korig.): 29.0 mmol/L"
    );
}

#[test]
fn winter_compensation_within_two_mmhg_is_appropriate() {
    let analysis = analyze(7.30, 4.27, 16.0, None, None, None, None);
    assert_eq!(analysis.notes, vec!["Respiračná kompenzácia primeraná (Winter)."]);
    assert!(analysis.anion_gap.is_none());
}

#[test]
fn respiratory_acidosis_uses_the_course() {
    let acute = analyze(7.25, 8.0, 26.0, None, None, None, Some(RespiratoryCourse::Acute));
    assert_eq!(acute.primary, AcidBaseDisorder::RespiratoryAcidosis);
    assert_eq!(
        acute.notes,
        vec!["Akútna resp. acidóza – HCO₃ v norme pre akútnu kompenzáciu."]
    );
    assert!(acute.summary().ends_with("Očak. HCO₃⁻: 26.0 mmol/L"));

    let chronic = analyze(7.25, 8.0, 26.0, None, None, None, Some(RespiratoryCourse::Chronic));
    assert_eq!(
        chronic.notes,
        vec!["HCO₃ nižší – pridružená metabolická acidóza?"]
    );

    let unknown = analyze(7.25, 8.0, 26.0, None, None, None, None);
    assert_eq!(
        unknown.notes,
        vec!["Uveď akútna/chronická pre presné posúdenie."]
    );
}

#[test]
fn respiratory_alkalosis() {
    let analysis = analyze(7.50, 3.5, 22.0, None, None, None, Some(RespiratoryCourse::Acute));
    assert_eq!(analysis.primary, AcidBaseDisorder::RespiratoryAlkalosis);
    assert_eq!(
        analysis.notes,
        vec!["Akútna resp. alkalóza – kompenzácia primeraná."]
    );
}

#[test]
fn metabolic_alkalosis_expects_pco2_rise() {
    let analysis = analyze(7.50, 6.0, 34.0, None, None, None, None);
    assert_eq!(analysis.primary, AcidBaseDisorder::MetabolicAlkalosis);
    assert_eq!(analysis.notes, vec!["Respiračná kompenzácia primeraná."]);
}

#[test]
fn normal_ph_flags_possible_mixed_disorder() {
    let mixed = analyze(7.40, 5.3, 24.0, None, None, None, None);
    assert_eq!(mixed.primary, AcidBaseDisorder::PossibleMixed);
    assert_eq!(
        mixed.notes,
        vec!["pH v referenčnom rozmedzí – zvaž zmiešanú poruchu."]
    );

    let compensated = analyze(7.38, 7.0, 32.0, None, None, None, None);
    assert_eq!(
        compensated.primary,
        AcidBaseDisorder::CompensatedRespiratoryAcidosis
    );
}

#[test]
fn notes_are_carried_into_the_evaluation() {
    let evaluation = pneumo_calculators::evaluate(
        "abg",
        &json!({ "ph": 7.25, "paco2_kpa": 8.0, "hco3": 26.0, "course": "acute" }),
    )
    .unwrap();
    assert_eq!(evaluation.notes.len(), 1);
    assert!(evaluation.summary.starts_with("Primárna porucha: Respiračná acidóza"));
    assert_eq!(evaluation.detail["primary"], "respiratory_acidosis");
}

#[test]
fn missing_blood_gas_values_prompt() {
    let evaluation = pneumo_calculators::evaluate("abg", &json!({ "ph": 7.3 })).unwrap();
    assert_eq!(evaluation.summary, PROMPT);
    assert!(evaluation.detail.is_null());
}
