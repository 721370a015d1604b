use hpd_config::{load_layered_yaml_from_strings, report_unused_keys, UnusedKeyPolicy};

/// Validates:
/// 1) Unused keys (typos) are detected in WARN mode but do not error.
/// 2) Unused keys cause failure in FAIL mode.
/// 3) Keys under consumed prefixes are not flagged.
/// 4) Deterministic ordering of unused pointers.

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
input:
  path: dati.csv

matching:
  horizon_days: 364

unused_section:
  foo: 123
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");

    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert!(!report.is_clean(), "report should detect unused keys");
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/matching/horizon_days".to_string(),
            "/unused_section/foo".to_string(),
        ]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
output:
  colour: false
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect_err("fail mode must error");

    let msg = err.to_string();
    assert!(msg.contains("CONFIG_UNUSED_KEYS"), "got: {msg}");
    assert!(msg.contains("/output/colour"), "got: {msg}");
}

#[test]
fn consumed_keys_are_clean() {
    let yaml = r#"
input:
  path: dati.csv
  date_format: "%d/%m/%Y"
  day_basis: year_relative
  delimiter: ","
matching:
  horizon_day: 365
  require_terminal_valuation: false
output:
  color: true
  format: table
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("fully consumed config must pass");
    assert!(report.is_clean());
}

#[test]
fn empty_config_is_clean() {
    let loaded = load_layered_yaml_from_strings(&[""]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap();
    assert!(report.is_clean());
}
