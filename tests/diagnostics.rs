use mission_runner::diagnostics::{self, Finding, NamedValue, inspect};
use ndarray::{ArrayD, IxDyn, array};

fn scan_to_string(entries: &[NamedValue]) -> (Vec<Finding>, String) {
    let mut out = Vec::new();
    let findings = diagnostics::scan("output", entries, &mut out).expect("scan");
    (findings, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn nan_entry_prints_one_line() {
    let entries = [NamedValue::from_vec("fuel_burned", vec![f64::NAN])];
    let (findings, text) = scan_to_string(&entries);
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("NaN/Inf detected in output: fuel_burned - "));
    assert_eq!(
        findings,
        [Finding {
            name: "fuel_burned".into(),
            nan_count: 1,
            inf_count: 0,
        }]
    );
}

#[test]
fn finite_entries_print_nothing() {
    let entries = [NamedValue::from_vec("altitude", vec![1000.0, 2000.0])];
    let (findings, text) = scan_to_string(&entries);
    assert!(findings.is_empty());
    assert!(text.is_empty());
}

#[test]
fn infinities_are_flagged() {
    let entries = [NamedValue::from_vec(
        "thrust",
        vec![f64::INFINITY, 1.0, f64::NEG_INFINITY],
    )];
    let (findings, text) = scan_to_string(&entries);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].inf_count, 2);
    assert_eq!(findings[0].nan_count, 0);
    assert!(text.contains("thrust"));
}

#[test]
fn every_offending_entry_is_reported_once() {
    let entries = [
        NamedValue::from_vec("mass", vec![f64::NAN, f64::NAN]),
        NamedValue::scalar("range", 214.0),
        NamedValue::scalar("drag", f64::INFINITY),
        NamedValue::from_vec("time", vec![0.0, f64::NAN]),
    ];
    let (findings, text) = scan_to_string(&entries);
    let names: Vec<&str> = findings.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["mass", "drag", "time"]);
    assert_eq!(findings[0].nan_count, 2);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(": mass - "));
    assert!(lines[1].contains(": drag - "));
    assert!(lines[2].contains(": time - "));
}

#[test]
fn multidimensional_values_are_scanned() {
    let mut grid = ArrayD::<f64>::zeros(IxDyn(&[2, 3, 2]));
    grid[IxDyn(&[1, 2, 0])] = f64::NAN;
    let entry = NamedValue::new("traj.cruise.states", grid);
    let finding = inspect(&entry).expect("nan inside grid");
    assert_eq!(finding.nan_count, 1);

    let matrix = NamedValue::new("jacobian", array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
    assert!(inspect(&matrix).is_none());
}

#[test]
fn label_names_the_collection() {
    let entries = [NamedValue::scalar("mission:design:range", f64::NAN)];
    let mut out = Vec::new();
    diagnostics::scan("input", &entries, &mut out).expect("scan");
    let text = String::from_utf8(out).expect("utf-8 output");
    assert!(text.starts_with("NaN/Inf detected in input: mission:design:range - "));
}
