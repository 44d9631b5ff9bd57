use pneumo_calculators::calculators::brock::{
    self, BrockFactors, BrockInput, NoduleType, RiskCategory, DEFAULT_AGE, PROMPT,
};
use pneumo_calculators::calculators::fleischner::{
    mean_diameter, recommend, workup, FleischnerInput, FleischnerType, Nodule, UNKNOWN_TYPE,
};
use pneumo_calculators::calculators::mayo::calculate_spn;
use pneumo_calculators::error::CalculatorError;
use pneumo_calculators::scoring::MISSING_VALUES;
use serde_json::json;

fn factors(diameter_mm: f64) -> BrockFactors {
    BrockInput::default().factors(diameter_mm)
}

fn nodule(size_mm: i32, nodule_type: FleischnerType) -> Nodule {
    Nodule {
        size_mm,
        nodule_type: Some(nodule_type),
        high_risk: false,
        multiple: false,
        solid_component_mm: None,
        suspicious_features: false,
        thick_slice: false,
        incomplete_ct: false,
        brock_probability: None,
        brock_cutoff_percent: 5.0,
    }
}

#[test]
fn brock_defaults_age_and_count() {
    let f = factors(10.0);
    assert_eq!(f.age, DEFAULT_AGE);
    assert_eq!(f.nodule_count, 1);
    assert_eq!(f.nodule_type, NoduleType::Solid);
}

#[test]
fn brock_probability_for_a_small_solid_nodule() {
    let p = brock::probability(&factors(10.0));
    assert!((p - 0.031912).abs() < 1e-5);
    assert_eq!(brock::category(p, 5.0), RiskCategory::Low);
    assert_eq!(brock::risk_note(p, false, 5.0), "Brock riziko: 3.2 % (LOW < 5 %)");
}

#[test]
fn brock_risk_factors_raise_probability() {
    let f = BrockFactors {
        age: 70,
        female: true,
        upper_lobe: true,
        spiculation: true,
        ..factors(15.0)
    };
    let p = brock::probability(&f);
    assert!((p - 0.459490).abs() < 1e-5);
    assert_eq!(brock::category(p, 5.0), RiskCategory::High);
    assert_eq!(brock::risk_note(p, true, 5.0), "Brock riziko: 45.9 % (HIGH ≥ 5 %)");
}

#[test]
fn brock_is_undefined_without_positive_diameter() {
    assert!(brock::probability(&factors(0.0)).is_nan());
    assert!(brock::probability(&factors(-3.0)).is_nan());

    let evaluation = pneumo_calculators::evaluate("brock", &json!({ "diameter_mm": 0.0 })).unwrap();
    assert_eq!(
        evaluation.summary,
        "Brock riziko nie je možné vypočítať (priemer musí byť > 0 mm)."
    );
    assert!(evaluation.detail["probability"].is_null());
}

#[test]
fn brock_cutoff_is_configurable() {
    let evaluation = pneumo_calculators::evaluate(
        "brock",
        &json!({ "diameter_mm": 10.0, "high_risk_cutoff_percent": 2.0 }),
    )
    .unwrap();
    assert_eq!(evaluation.summary, "Brock riziko: 3.2 % (HIGH ≥ 2 %)");
    assert_eq!(evaluation.detail["category"], "HIGH");
}

#[test]
fn brock_without_diameter_prompts() {
    let evaluation = pneumo_calculators::evaluate("brock", &json!({ "age": 60 })).unwrap();
    assert_eq!(evaluation.summary, PROMPT);
}

#[test]
fn mayo_probability_bands() {
    let result = calculate_spn(65, true, false, 15.0, true, false);
    assert!((result.probability - 31.0197).abs() < 1e-3);
    assert_eq!(result.category, "Stredná pravdepodobnosť");

    let low = calculate_spn(40, false, false, 5.0, false, false);
    assert_eq!(low.category, "Nízka pravdepodobnosť");

    let high = calculate_spn(80, true, true, 30.0, true, true);
    assert_eq!(high.category, "Vysoká pravdepodobnosť");
}

#[test]
fn mayo_report_and_missing_inputs() {
    let evaluation = pneumo_calculators::evaluate(
        "spn",
        &json!({ "age": 40, "diameter_mm": 5.0 }),
    )
    .unwrap();
    assert_eq!(evaluation.summary, "Riziko: 1.0 % → Nízka pravdepodobnosť");

    let evaluation = pneumo_calculators::evaluate("spn", &json!({ "age": 40 })).unwrap();
    assert_eq!(evaluation.summary, MISSING_VALUES);
}

#[test]
fn nodule_type_aliases() {
    assert_eq!(FleischnerType::parse("Solid"), Some(FleischnerType::Solid));
    assert_eq!(FleischnerType::parse(" GGN "), Some(FleischnerType::GroundGlass));
    assert_eq!(FleischnerType::parse("groundglass"), Some(FleischnerType::GroundGlass));
    assert_eq!(FleischnerType::parse("partsolid"), Some(FleischnerType::PartSolid));
    assert_eq!(FleischnerType::parse("cyst"), None);
}

#[test]
fn solid_nodule_table() {
    let small = recommend(&nodule(4, FleischnerType::Solid));
    assert_eq!(
        small.recommendation,
        "Solídny uzol <6 mm: kontrola sa nevyžaduje (nízke riziko)."
    );
    assert_eq!(
        small.notes,
        vec![
            "Meraj priemer (dlhá+krátka os)/2, celé mm.",
            "Za rast považuj ≥2 mm alebo ≥25 % objemu.",
        ]
    );

    let medium = recommend(&Nodule {
        high_risk: true,
        ..nodule(7, FleischnerType::Solid)
    });
    assert_eq!(
        medium.recommendation,
        "Solídny uzol 6–8 mm: CT o 6–12 mesiacov, potom CT o 18–24 mesiacov (vysoké riziko)."
    );

    let large = recommend(&nodule(9, FleischnerType::Solid));
    assert_eq!(
        large.recommendation,
        "Solídny uzol >8 mm: CT o 3 mesiace, PET-CT alebo biopsia."
    );

    let multiple = recommend(&Nodule {
        multiple: true,
        ..nodule(5, FleischnerType::Solid)
    });
    assert_eq!(
        multiple.recommendation,
        "Viacnásobné solídne uzly <6 mm: kontrola sa nevyžaduje."
    );
}

#[test]
fn subsolid_nodule_table() {
    assert_eq!(
        recommend(&nodule(8, FleischnerType::GroundGlass)).recommendation,
        "Jeden ground-glass uzol ≥6 mm: CT o 6–12 mesiacov; ak pretrváva, CT každé 2 roky do 5 rokov."
    );
    assert_eq!(
        recommend(&Nodule {
            solid_component_mm: Some(7),
            ..nodule(10, FleischnerType::PartSolid)
        })
        .recommendation,
        "Jeden part-solid uzol so solidnou časťou ≥6 mm: zváž PET-CT alebo biopsiu."
    );
    assert_eq!(
        recommend(&Nodule {
            solid_component_mm: Some(4),
            ..nodule(10, FleischnerType::PartSolid)
        })
        .recommendation,
        "Jeden part-solid uzol ≥6 mm so solidnou časťou <6 mm: CT o 3–6 mesiacov; ak pretrváva, ročné CT do 5 rokov."
    );
}

#[test]
fn unknown_type_gets_a_hint() {
    let result = recommend(&Nodule {
        nodule_type: None,
        ..nodule(5, FleischnerType::Solid)
    });
    assert_eq!(result.recommendation, UNKNOWN_TYPE);
}

#[test]
fn brock_probability_overrides_risk_flag_and_leads_the_notes() {
    let result = recommend(&Nodule {
        brock_probability: Some(0.07),
        thick_slice: true,
        incomplete_ct: true,
        ..nodule(9, FleischnerType::Solid)
    });
    assert_eq!(
        result.notes,
        vec![
            "Brock riziko: 7.0 % (HIGH ≥ 5 %)",
            "Hrubé rezy: odporúčaná CT hrudníka s tenkými rezmi (≤1.5 mm).",
            "Neúplné CT: pri >8 mm alebo podozrivom náleze doplň kompletné CT hrudníka.",
            "Meraj priemer (dlhá+krátka os)/2, celé mm.",
            "Za rast považuj ≥2 mm alebo ≥25 % objemu.",
        ]
    );

    let low = recommend(&Nodule {
        high_risk: true,
        brock_probability: Some(0.01),
        ..nodule(4, FleischnerType::Solid)
    });
    assert_eq!(
        low.recommendation,
        "Solídny uzol <6 mm: kontrola sa nevyžaduje (nízke riziko)."
    );
}

#[test]
fn mean_diameter_needs_both_axes() {
    assert_eq!(mean_diameter(12.0, 8.0), 10.0);
    assert_eq!(mean_diameter(12.0, 0.0), 0.0);
}

#[test]
fn workup_runs_brock_on_the_mean_diameter() {
    let input = FleischnerInput {
        nodule_type: "solid".to_string(),
        ..Default::default()
    };
    let result = workup(&input, 12.0, 8.0);
    assert_eq!(result.size_mm, 10);
    let p = result.brock_probability.unwrap();
    assert!((p - 0.031912).abs() < 1e-5);
    assert_eq!(
        result.fleischner.recommendation,
        "Solídny uzol >8 mm: CT o 3 mesiace, PET-CT alebo biopsia."
    );
    assert_eq!(result.fleischner.notes[0], "Brock riziko: 3.2 % (LOW < 5 %)");

    assert_eq!(workup(&input, 7.0, 6.0).size_mm, 7);
}

#[test]
fn workup_without_a_diameter_falls_back_to_the_risk_flag() {
    let input = FleischnerInput {
        nodule_type: "solid".to_string(),
        high_risk: true,
        ..Default::default()
    };
    let result = workup(&input, 5.0, 0.0);
    assert!(result.brock_probability.is_none());
    assert_eq!(
        result.fleischner.recommendation,
        "Solídny uzol <6 mm: voliteľné CT o 12 mesiacov (vysoké riziko)."
    );
}

#[test]
fn fleischner_form_chooses_axes_or_size() {
    let by_axes = pneumo_calculators::evaluate(
        "fleischner",
        &json!({ "nodule_type": "solid", "long_axis_mm": 12.0, "short_axis_mm": 8.0 }),
    )
    .unwrap();
    assert_eq!(
        by_axes.summary,
        "Odporúčanie: Solídny uzol >8 mm: CT o 3 mesiace, PET-CT alebo biopsia."
    );
    assert_eq!(by_axes.detail["size_mm"], 10);

    let by_size = pneumo_calculators::evaluate(
        "fleischner",
        &json!({ "nodule_type": "ground-glass", "size_mm": 4 }),
    )
    .unwrap();
    assert_eq!(
        by_size.summary,
        "Odporúčanie: Jeden ground-glass uzol <6 mm: kontrola sa nevyžaduje."
    );
    assert_eq!(by_size.notes.len(), 2);

    let missing =
        pneumo_calculators::evaluate("fleischner", &json!({ "nodule_type": "solid" })).unwrap();
    assert_eq!(missing.summary, MISSING_VALUES);
}

#[test]
fn workup_rejects_out_of_range_age_and_count() {
    let cases = [
        ("age", i32::MIN),
        ("age", i32::MAX),
        ("nodule_count", i32::MIN),
        ("nodule_count", 0),
    ];
    for (field, value) in cases {
        let mut input = json!({
            "nodule_type": "solid",
            "long_axis_mm": 8.0,
            "short_axis_mm": 6.0,
        });
        input[field] = json!(value);
        let error = pneumo_calculators::evaluate("fleischner", &input).unwrap_err();
        assert!(
            matches!(error, CalculatorError::Validation(ref v) if v.field_id == field),
            "{field} = {value} should fail validation"
        );
    }
}

#[test]
fn brock_probability_does_not_overflow_on_extreme_covariates() {
    let young = BrockFactors {
        age: i32::MIN,
        ..factors(8.0)
    };
    let p = brock::probability(&young);
    assert!((0.0..0.01).contains(&p));

    let crowded = BrockFactors {
        nodule_count: i32::MIN,
        ..factors(8.0)
    };
    let p = brock::probability(&crowded);
    assert!(p.is_nan() || (0.0..=1.0).contains(&p));
}
