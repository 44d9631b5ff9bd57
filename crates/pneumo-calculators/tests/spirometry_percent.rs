use pneumo_calculators::calculators::spirometry::percent::{
    assess, interpret, normalize_ratio, DlcoPercentGrade, Fev1Grade, PercentInput,
    PercentPattern, ENTIRELY_NORMAL, MISSING_INPUT_PROMPT,
};
use pneumo_calculators::calculators::spirometry::{AirwayResistance, Hyperinflation, Marker};

fn spirometry(fev1: f64, fvc: f64, ratio: f64) -> PercentInput {
    PercentInput {
        fev1_pct: Some(fev1),
        fvc_pct: Some(fvc),
        ratio_pct: Some(ratio),
        ..Default::default()
    }
}

#[test]
fn fractional_ratio_is_scaled_to_percent() {
    assert!((normalize_ratio(0.65) - 65.0).abs() < 1e-9);
    assert!((normalize_ratio(1.2) - 120.0).abs() < 1e-9);
    assert_eq!(normalize_ratio(1.5), 1.5);
    assert_eq!(normalize_ratio(72.0), 72.0);

    let findings = assess(&spirometry(55.0, 90.0, 0.65)).unwrap();
    assert!((findings.ratio_pct - 65.0).abs() < 1e-9);
    assert_eq!(
        findings.pattern,
        PercentPattern::Obstructive {
            grade: Fev1Grade::ModeratelySevere
        }
    );
}

#[test]
fn obstruction_report_sentence() {
    assert_eq!(
        interpret(&spirometry(55.0, 90.0, 0.6)),
        "Nález svedčí pre obštrukčnú ventilačnú poruchu (stredne ťažkú; podľa FEV₁ %pred), \
         hyperinflácia nehodnotená, odpory nehodnotené, DLCO nehodnotená, \
         KCO nehodnotená, VA nehodnotená."
    );
}

#[test]
fn normal_values_give_the_normal_sentence() {
    let input = PercentInput {
        tlc_pct: Some(100.0),
        rv_tlc_pct: Some(110.0),
        dlco_pct: Some(92.0),
        s_raw: Some(0.9),
        ..spirometry(95.0, 98.0, 78.0)
    };
    assert!(assess(&input).unwrap().entirely_normal);
    assert_eq!(interpret(&input), ENTIRELY_NORMAL);
}

#[test]
fn fev1_grade_boundaries() {
    assert_eq!(Fev1Grade::from_percent(80.0), Fev1Grade::Incipient);
    assert_eq!(Fev1Grade::from_percent(79.9), Fev1Grade::MildIncipient);
    assert_eq!(Fev1Grade::from_percent(60.0), Fev1Grade::Moderate);
    assert_eq!(Fev1Grade::from_percent(50.0), Fev1Grade::ModeratelySevere);
    assert_eq!(Fev1Grade::from_percent(35.0), Fev1Grade::Severe);
    assert_eq!(Fev1Grade::from_percent(34.9), Fev1Grade::VerySevere);
}

#[test]
fn combined_disorder_names_both_components() {
    let input = PercentInput {
        tlc_pct: Some(70.0),
        ..spirometry(45.0, 60.0, 60.0)
    };
    assert_eq!(
        assess(&input).unwrap().pattern,
        PercentPattern::Combined {
            grade: Fev1Grade::Severe
        }
    );
    assert!(interpret(&input).starts_with(
        "Nález svedčí pre kombinovanú ventilačnú poruchu – obštrukčnú (ťažkú) a restrikčnú (ťažkú),"
    ));
}

#[test]
fn restriction_with_normal_fev1_gets_the_mild_qualifier() {
    let input = PercentInput {
        tlc_pct: Some(70.0),
        ..spirometry(85.0, 70.0, 82.0)
    };
    assert!(interpret(&input).starts_with(
        "Nález svedčí pre restrikčnú ventilačnú poruchu (ľahkú (podľa FEV₁ v norme – klinicky skôr mierny rozsah); podľa FEV₁ %pred),"
    ));
}

#[test]
fn non_specific_and_possible_restriction() {
    let with_tlc = PercentInput {
        tlc_pct: Some(90.0),
        ..spirometry(75.0, 85.0, 80.0)
    };
    assert_eq!(assess(&with_tlc).unwrap().pattern, PercentPattern::NonSpecific);

    let without_tlc = spirometry(85.0, 70.0, 85.0);
    assert_eq!(
        assess(&without_tlc).unwrap().pattern,
        PercentPattern::PossibleRestriction
    );
}

#[test]
fn diffusion_grades() {
    assert_eq!(DlcoPercentGrade::from_percent(None), DlcoPercentGrade::NotAssessed);
    assert_eq!(DlcoPercentGrade::from_percent(Some(80.0)), DlcoPercentGrade::Normal);
    assert_eq!(DlcoPercentGrade::from_percent(Some(65.0)), DlcoPercentGrade::Mild);
    assert_eq!(DlcoPercentGrade::from_percent(Some(40.0)), DlcoPercentGrade::Moderate);
    assert_eq!(DlcoPercentGrade::from_percent(Some(39.0)), DlcoPercentGrade::Severe);
}

#[test]
fn kco_is_never_reported_as_elevated() {
    let input = PercentInput {
        kco_pct: Some(150.0),
        va_pct: Some(60.0),
        ..spirometry(95.0, 98.0, 78.0)
    };
    let findings = assess(&input).unwrap();
    assert_eq!(findings.kco, Marker::Normal);
    assert_eq!(findings.va, Marker::Reduced);
    assert!(interpret(&input).ends_with("KCO v norme, VA znížené."));
}

#[test]
fn missing_ratio_asks_for_input() {
    let input = PercentInput {
        fev1_pct: Some(80.0),
        fvc_pct: Some(80.0),
        ..Default::default()
    };
    assert!(assess(&input).is_none());
    assert_eq!(interpret(&input), MISSING_INPUT_PROMPT);
}

#[test]
fn hyperinflation_starts_above_120_percent() {
    let at_limit = PercentInput {
        rv_tlc_pct: Some(120.0),
        ..spirometry(95.0, 98.0, 78.0)
    };
    let findings = assess(&at_limit).unwrap();
    assert_eq!(findings.hyperinflation, Hyperinflation::Absent);
    assert_eq!(interpret(&at_limit), ENTIRELY_NORMAL);

    let past_limit = PercentInput {
        rv_tlc_pct: Some(120.1),
        ..spirometry(95.0, 98.0, 78.0)
    };
    let findings = assess(&past_limit).unwrap();
    assert_eq!(findings.hyperinflation, Hyperinflation::Present);
    assert!(!findings.entirely_normal);
    assert_eq!(
        interpret(&past_limit),
        "Nález svedčí pre bez ventilačnej poruchy, s hyperinfláciou, odpory nehodnotené, \
         DLCO nehodnotená, KCO nehodnotená, VA nehodnotená."
    );
}

#[test]
fn airway_resistance_is_elevated_above_1_2() {
    let at_limit = PercentInput {
        s_raw: Some(1.2),
        ..spirometry(95.0, 98.0, 78.0)
    };
    let findings = assess(&at_limit).unwrap();
    assert_eq!(findings.resistance, AirwayResistance::Normal);
    assert_eq!(interpret(&at_limit), ENTIRELY_NORMAL);

    let past_limit = PercentInput {
        s_raw: Some(1.21),
        rv_tlc_pct: Some(100.0),
        ..spirometry(95.0, 98.0, 78.0)
    };
    let findings = assess(&past_limit).unwrap();
    assert_eq!(findings.resistance, AirwayResistance::Elevated);
    assert_eq!(
        interpret(&past_limit),
        "Nález svedčí pre bez ventilačnej poruchy, bez hyperinflácie, odpory zvýšené, \
         DLCO nehodnotená, KCO nehodnotená, VA nehodnotená."
    );
}

#[test]
fn resistance_in_norm_is_spelled_out_when_other_findings_are_abnormal() {
    let input = PercentInput {
        s_raw: Some(0.8),
        ..spirometry(55.0, 90.0, 60.0)
    };
    assert!(interpret(&input).contains("hyperinflácia nehodnotená, odpory v norme, DLCO"));
}
