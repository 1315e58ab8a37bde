use pinlens_schema::value::{coerce_number, coerce_string, numeric, parse_leading_float};
use pinlens_schema::{describe, escape_html, ColumnType, LogicalField, Record, TableKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;

#[test]
fn test_every_kind_has_unique_keys() {
    for kind in TableKind::ALL {
        let schema = describe(kind);
        let keys: HashSet<_> = schema.columns().iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), schema.columns().len(), "duplicate key in {kind}");
        assert_eq!(schema.kind(), kind);
        assert!(schema.columns().first().is_some_and(|c| c.sticky));
    }
}

#[test]
fn test_kinds_parse_from_slugs() {
    for kind in TableKind::ALL {
        assert_eq!(kind.slug().parse::<TableKind>().unwrap(), kind);
    }
    assert!("pins".parse::<TableKind>().is_err());
}

#[test]
fn test_only_checkbox_is_computed() {
    let computed: Vec<_> = ColumnType::ALL.iter().filter(|t| t.is_computed()).collect();
    assert_eq!(computed, vec![&ColumnType::Checkbox]);
}

#[test]
fn test_alias_prefers_first_present_key() {
    let record = Record::from_json(
        "rec1",
        json!({"Hook Technique": "", "hook_technique": "List", "CTA Strength": 0}),
    );
    assert_eq!(
        record.logical_text(LogicalField::HookTechnique).as_deref(),
        Some("List")
    );
    assert_eq!(record.logical(LogicalField::CtaStrength), Some(&json!(0)));
}

fn cell_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        ".{0,24}".prop_map(Value::String),
        prop::collection::vec(".{0,6}".prop_map(Value::String), 0..4).prop_map(Value::Array),
    ]
}

proptest! {
    #[test]
    fn prop_escaped_text_has_no_markup(raw in ".{0,64}") {
        let escaped = escape_html(&raw);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
    }

    #[test]
    fn prop_coercion_is_total(value in cell_value()) {
        let _ = coerce_string(&value);
        let _ = coerce_number(Some(&value));
        prop_assert!(numeric(&value).map_or(true, |f| !f.is_nan()));
    }

    #[test]
    fn prop_leading_float_reads_prefix(n in -10_000i32..10_000, suffix in "[a-z/ ]{0,8}") {
        let raw = format!("{n}{suffix}");
        prop_assert_eq!(parse_leading_float(&raw), Some(f64::from(n)));
    }
}
