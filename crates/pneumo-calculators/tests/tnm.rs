use std::collections::BTreeSet;

use pneumo_calculators::calculators::tnm::{
    calculate_m, calculate_n, calculate_stage, calculate_t, evaluate_tnm, MCategory,
    MetastasisInput, NCategory, NodalInput, StageGroup, TCategory, TnmInput, TumorInput,
    TumorSide, UpstagingFactors,
};
use serde_json::json;

fn tumor(size_cm: f64) -> TumorInput {
    TumorInput {
        size_cm: Some(size_cm),
        ..Default::default()
    }
}

fn nodes(side: TumorSide, stations: &[&str]) -> NodalInput {
    NodalInput {
        side,
        stations: stations.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
    }
}

fn metastasis(intrathoracic: bool, count: u32, organs: u32) -> MetastasisInput {
    MetastasisInput {
        intrathoracic,
        extrathoracic_count: count,
        organs_involved: organs,
    }
}

#[test]
fn t_category_from_size_boundaries() {
    assert_eq!(calculate_t(&tumor(0.5)), TCategory::T1a);
    assert_eq!(calculate_t(&tumor(1.0)), TCategory::T1a);
    assert_eq!(calculate_t(&tumor(1.5)), TCategory::T1b);
    assert_eq!(calculate_t(&tumor(3.0)), TCategory::T1c);
    assert_eq!(calculate_t(&tumor(3.5)), TCategory::T2a);
    assert_eq!(calculate_t(&tumor(5.0)), TCategory::T2b);
    assert_eq!(calculate_t(&tumor(6.5)), TCategory::T3);
    assert_eq!(calculate_t(&tumor(7.1)), TCategory::T4);
}

#[test]
fn missing_size_is_tis() {
    assert_eq!(calculate_t(&TumorInput::default()), TCategory::Tis);
}

#[test]
fn t4_invasion_overrides_size() {
    let input = TumorInput {
        size_cm: Some(0.8),
        upstaging: UpstagingFactors {
            carina: true,
            ..Default::default()
        },
    };
    assert_eq!(calculate_t(&input), TCategory::T4);
}

#[test]
fn upstaging_raises_but_never_lowers() {
    let chest_wall = UpstagingFactors {
        chest_wall: true,
        ..Default::default()
    };
    let small = TumorInput {
        size_cm: Some(1.5),
        upstaging: chest_wall,
    };
    assert_eq!(calculate_t(&small), TCategory::T3);

    let large = TumorInput {
        size_cm: Some(8.0),
        upstaging: chest_wall,
    };
    assert_eq!(calculate_t(&large), TCategory::T4);

    let pleura = TumorInput {
        size_cm: Some(2.5),
        upstaging: UpstagingFactors {
            visceral_pleural_invasion: true,
            ..Default::default()
        },
    };
    assert_eq!(calculate_t(&pleura), TCategory::T2a);

    let pleura_large = TumorInput {
        size_cm: Some(4.5),
        ..pleura
    };
    assert_eq!(calculate_t(&pleura_large), TCategory::T2b);
}

#[test]
fn t_categories_are_ordered() {
    assert!(TCategory::Tis < TCategory::T1a);
    assert!(TCategory::T2b < TCategory::T3);
    assert_eq!(TCategory::T1c.max(TCategory::T2a), TCategory::T2a);
}

#[test]
fn n_category_from_stations() {
    assert_eq!(calculate_n(&nodes(TumorSide::Right, &[])), NCategory::N0);
    assert_eq!(calculate_n(&nodes(TumorSide::Right, &["10R"])), NCategory::N1);
    assert_eq!(calculate_n(&nodes(TumorSide::Right, &["7"])), NCategory::N2a);
    assert_eq!(
        calculate_n(&nodes(TumorSide::Right, &["7", "4R"])),
        NCategory::N2b
    );
    assert_eq!(
        calculate_n(&nodes(TumorSide::Right, &["7", "11R"])),
        NCategory::N2a
    );
}

#[test]
fn supraclavicular_and_contralateral_stations_are_n3() {
    assert_eq!(calculate_n(&nodes(TumorSide::Right, &["1R"])), NCategory::N3);
    assert_eq!(calculate_n(&nodes(TumorSide::Right, &["4L"])), NCategory::N3);
    assert_eq!(calculate_n(&nodes(TumorSide::Left, &["4R"])), NCategory::N3);
    assert_eq!(calculate_n(&nodes(TumorSide::Left, &["4L"])), NCategory::N2a);
}

#[test]
fn station_ten_is_not_supraclavicular() {
    assert_eq!(calculate_n(&nodes(TumorSide::Right, &["10R"])), NCategory::N1);
    assert_eq!(calculate_n(&nodes(TumorSide::Left, &["12L"])), NCategory::N1);
}

#[test]
fn m_category() {
    assert_eq!(calculate_m(&metastasis(false, 0, 0)), MCategory::M0);
    assert_eq!(calculate_m(&metastasis(true, 5, 0)), MCategory::M1a);
    assert_eq!(calculate_m(&metastasis(false, 1, 1)), MCategory::M1b);
    assert_eq!(calculate_m(&metastasis(false, 3, 1)), MCategory::M1c1);
    assert_eq!(calculate_m(&metastasis(false, 3, 2)), MCategory::M1c2);
}

#[test]
fn several_metastases_without_organ_count_stay_m0() {
    assert_eq!(calculate_m(&metastasis(false, 3, 0)), MCategory::M0);
}

#[test]
fn stage_groups() {
    use MCategory::*;
    use NCategory::*;
    use TCategory::*;

    assert_eq!(calculate_stage(Tis, N2b, M0), StageGroup::Stage0);
    assert_eq!(calculate_stage(Tis, NX, M0), StageGroup::Stage0);
    assert_eq!(calculate_stage(T1a, NX, M0), StageGroup::Unstageable);
    assert_eq!(calculate_stage(T1a, N0, M0), StageGroup::IA1);
    assert_eq!(calculate_stage(T1b, N0, M0), StageGroup::IA2);
    assert_eq!(calculate_stage(T1c, N0, M0), StageGroup::IA3);
    assert_eq!(calculate_stage(T2a, N0, M0), StageGroup::IB);
    assert_eq!(calculate_stage(T2b, N0, M0), StageGroup::IIA);
    assert_eq!(calculate_stage(T1b, N2a, M0), StageGroup::IIB);
    assert_eq!(calculate_stage(T3, N1, M0), StageGroup::IIIA);
    assert_eq!(calculate_stage(T2a, N3, M0), StageGroup::IIIB);
    assert_eq!(calculate_stage(T4, N3, M0), StageGroup::IIIC);
    assert_eq!(calculate_stage(T1a, N0, M1b), StageGroup::IVA);
    assert_eq!(calculate_stage(T4, N3, M1c2), StageGroup::IVB);
}

#[test]
fn stage_labels() {
    assert_eq!(StageGroup::IIIA.label(), "Stage IIIA");
    assert_eq!(StageGroup::Unstageable.label(), "Unstageable");
}

#[test]
fn full_staging_report() {
    let input = TnmInput {
        tumor: tumor(0.5),
        nodes: nodes(TumorSide::Right, &[]),
        metastasis: MetastasisInput::default(),
    };
    let result = evaluate_tnm(&input);
    assert_eq!(result.line_tnm(), "T1a N0 M0");
    assert_eq!(result.clinical_stage(), "Stage IA1");
    assert_eq!(result.report(), "TNM: T1a N0 M0\nKlinické štádium: Stage IA1");
}

#[test]
fn evaluates_flat_json_form() {
    let evaluation = pneumo_calculators::evaluate(
        "tnm9",
        &json!({
            "size_cm": 2.5,
            "pericardium": true,
            "side": "left",
            "stations": ["7", "4L"],
            "extrathoracic_count": 0
        }),
    )
    .unwrap();
    assert_eq!(
        evaluation.summary,
        "TNM: T3 N2b M0\nKlinické štádium: Stage IIIB"
    );
    assert_eq!(
        evaluation.inputs,
        "size_cm=2.5, pericardium=true, side=left, stations=7/4L, extrathoracic_count=0"
    );
    assert_eq!(evaluation.detail["stage"], "IIIB");
}

#[test]
fn organ_count_out_of_range_is_rejected() {
    let error = pneumo_calculators::evaluate("tnm9", &json!({ "organs_involved": 50 }))
        .unwrap_err();
    assert!(error.to_string().contains("outside range"));
}

#[test]
fn tumour_larger_than_any_preset_is_staged_t4() {
    let evaluation = pneumo_calculators::evaluate("tnm9", &json!({ "size_cm": 45.0 })).unwrap();
    assert!(evaluation.summary.starts_with("TNM: T4 "));
    assert_eq!(calculate_t(&tumor(45.0)), TCategory::T4);
}
