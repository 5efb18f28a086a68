//! Serde roundtrip and JsonSchema validation for the snapshot types, plus a
//! replay of a realistic log through the projector.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use pugh_core::entities::*;
use pugh_core::scale::{Scale, ScaleLabel};
use pugh_core::scoring::{OptionTotal, weighted_totals, winner};
use pugh_core::{Event, EventKind, MatrixSnapshot, project};
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn framework_log() -> Vec<Event> {
    let kinds = vec![
        EventKind::matrix_created(
            "Frontend framework",
            Some("Q3 rewrite".into()),
            false,
            Scale::default(),
        ),
        EventKind::criterion_added("cri_cost", "Cost", None).unwrap(),
        EventKind::criterion_added(
            "cri_docs",
            "Docs",
            Some(Scale::Numeric {
                min: 1.0,
                max: 5.0,
                step: 0.5,
                labels: vec![ScaleLabel {
                    value: 5.0,
                    label: "Excellent".into(),
                }],
            }),
        )
        .unwrap(),
        EventKind::criterion_weight_adjusted("cri_docs", 6).unwrap(),
        EventKind::option_added("opt_react", "React").unwrap(),
        EventKind::option_added("opt_svelte", "Svelte").unwrap(),
        EventKind::rating_assigned("rating_1", "opt_react", "cri_cost", 7.0, None, None).unwrap(),
        EventKind::rating_assigned(
            "rating_2",
            "opt_svelte",
            "cri_cost",
            8.0,
            Some("cheap".into()),
            Some("smaller bundle".into()),
        )
        .unwrap(),
        EventKind::rating_assigned("rating_3", "opt_react", "cri_docs", 5.0, None, None).unwrap(),
        EventKind::rating_assigned("rating_4", "opt_svelte", "cri_docs", 3.5, None, None).unwrap(),
        EventKind::comment_added(
            "comment_1",
            "opt_svelte",
            "cri_docs",
            "getting better",
            Some("rating_4".into()),
        )
        .unwrap(),
    ];
    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            let secs = i64::try_from(i).unwrap();
            let ts = Utc.timestamp_opt(1_770_000_000 + secs, 0).unwrap();
            Event::new(format!("evt_{i:03}"), ts, "ana", "br_main", kind).unwrap()
        })
        .collect()
}

roundtrip_and_validate!(snapshot_roundtrip, MatrixSnapshot, project(&framework_log()));

roundtrip_and_validate!(
    criterion_roundtrip,
    Criterion,
    Criterion {
        id: "cri_1".into(),
        label: "Performance".into(),
        author: "ana".into(),
        scale: Some(Scale::Binary),
        description: Some("p95 render time".into()),
    }
);

roundtrip_and_validate!(
    comment_entry_roundtrip,
    CellEntry,
    CellEntry {
        id: "comment_1".into(),
        option_id: "opt_1".into(),
        criterion_id: "cri_1".into(),
        timestamp: Utc::now(),
        author: "bo".into(),
        body: EntryBody::Comment {
            text: "needs a benchmark".into(),
            parent_comment_id: Some("rating_1".into()),
        },
    }
);

roundtrip_and_validate!(
    matrix_meta_roundtrip,
    MatrixMeta,
    MatrixMeta {
        title: Some("Vendors".into()),
        description: None,
        archived: true,
        config: MatrixConfig {
            default_scale: Scale::Unbounded,
            allow_negative: true,
        },
    }
);

roundtrip_and_validate!(
    option_total_roundtrip,
    OptionTotal,
    OptionTotal {
        option_id: "opt_1".into(),
        label: "React".into(),
        total: 85.5,
    }
);

#[test]
fn event_log_survives_json_lines() {
    let log = framework_log();
    let lines: Vec<String> = log
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    let recovered: Vec<Event> = lines
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(project(&recovered), project(&log));
}

#[test]
fn framework_log_projects_expected_state() {
    let snap = project(&framework_log());
    assert_eq!(snap.matrix.title.as_deref(), Some("Frontend framework"));
    assert_eq!(snap.criteria.len(), 2);
    assert_eq!(snap.options.len(), 2);
    assert_eq!(snap.rating_count(), 4);
    assert_eq!(snap.entries.len(), 5);
    assert_eq!(snap.weight("cri_cost"), Some(10));
    assert_eq!(snap.weight("cri_docs"), Some(6));

    // react: 7*10 + 5*6 = 100; svelte: 8*10 + 3.5*6 = 101.
    let totals = weighted_totals(&snap);
    assert_eq!(totals[0].total, 100.0);
    assert_eq!(totals[1].total, 101.0);
    assert_eq!(winner(&totals).unwrap().label, "Svelte");
}
