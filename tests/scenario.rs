use std::path::{Path, PathBuf};

use mission_runner::config::presets::{do228_level2_scenario, dornier228_scenario};
use mission_runner::config::{self, ConfigError, ObjectiveType, Optimizer, ValidationError};
use mission_runner::scenario::{self, ScenarioError};

fn catalog() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/scenarios")
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn shipped_dornier_scenario_matches_preset() {
    let loaded = scenario::load("dornier228_validation", &catalog()).expect("dornier scenario");
    let preset = dornier228_scenario().expect("dornier preset");
    assert_eq!(loaded, preset);
    assert_eq!(loaded.run().driver.optimizer, Optimizer::Ipopt);
    assert_eq!(loaded.run().driver.max_iter, 500);
    assert_eq!(
        loaded.mission().phase_names().collect::<Vec<_>>(),
        ["climb_1", "cruise", "descent_1"]
    );
}

#[test]
fn shipped_level2_scenario_matches_preset() {
    let loaded = scenario::load("do228_level2", &catalog()).expect("level2 scenario");
    let preset = do228_level2_scenario().expect("level2 preset");
    assert_eq!(loaded, preset);
    assert_eq!(loaded.run().objective.reference, Some(-1.0e5));
    assert!(!loaded.run().diagnostics.check_nan);
    assert!(loaded.mission().pre_mission().optimize_mass);
    assert!(loaded.mission().post_mission().constrain_range);
}

#[test]
fn catalog_lists_shipped_scenarios() {
    let names = scenario::list(&catalog()).expect("catalog listing");
    assert!(names.contains(&"dornier228_validation".to_string()));
    assert!(names.contains(&"do228_level2".to_string()));
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn resolve_prefers_existing_path() {
    let path = fixture("brac_level2_1500nm.yaml");
    let resolved = scenario::resolve(path.to_str().expect("utf-8 path"), &catalog())
        .expect("direct path");
    assert_eq!(resolved, path);
}

#[test]
fn unknown_scenario_is_not_found() {
    let err = scenario::load("no_such_mission", &catalog()).unwrap_err();
    match err {
        ScenarioError::NotFound { name, dir } => {
            assert_eq!(name, "no_such_mission");
            assert_eq!(dir, catalog());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn missing_catalog_directory_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent");
    assert!(matches!(
        scenario::list(&missing),
        Err(ScenarioError::Catalog { .. })
    ));
}

#[test]
fn inverted_descent_altitude_bounds_are_rejected() {
    let err = config::load_scenario(fixture("brac_level2_1500nm.yaml")).unwrap_err();
    match err {
        ConfigError::Invalid(ValidationError::InvertedBounds {
            phase,
            field,
            low,
            high,
        }) => {
            assert_eq!(phase, "descent_1");
            assert_eq!(field, "altitude_bounds");
            assert_eq!(low, 40_500.0);
            assert_eq!(high, 11_000.0);
        }
        other => panic!("expected inverted bounds, got {other:?}"),
    }
}

#[test]
fn corrected_toml_mission_loads() {
    let mission = config::load_mission(fixture("brac_1500nm_mission.toml")).expect("toml mission");
    assert_eq!(mission.phases().len(), 6);
    assert_eq!(mission.phases()[0].name, "climb_1");
    // pre_mission omitted from the file
    assert!(!mission.pre_mission().include_takeoff);
    assert!(!mission.pre_mission().optimize_mass);
    let cruise = mission.phase("cruise_1").expect("cruise_1");
    assert!(cruise.user_options.solve_for_distance);
    assert_eq!(cruise.time_guess_minutes(), Some((30.0, 120.0)));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mission.json");
    std::fs::write(&path, "{}").expect("write json");
    assert!(matches!(
        config::load_scenario(&path),
        Err(ConfigError::UnsupportedFormat(p)) if p == path
    ));
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    match config::load_scenario(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn scenario_parses_from_yaml_text() {
    let preset = dornier228_scenario().expect("dornier preset");
    let text = std::fs::read_to_string(catalog().join("dornier228_validation.yaml"))
        .expect("scenario text");
    let parsed = config::scenario_from_yaml(&text).expect("parse scenario");
    assert_eq!(parsed, preset);
}

#[test]
fn objective_kind_is_read_from_type_key() {
    let text = std::fs::read_to_string(catalog().join("do228_level2.yaml")).expect("scenario text");
    let parsed = config::scenario_from_yaml(&text).expect("parse scenario");
    assert_eq!(parsed.run().objective.objective_type, ObjectiveType::Mass);

    let renamed = text.replacen("type: mass", "objective_type: mass", 1);
    assert_ne!(renamed, text);
    assert!(matches!(
        config::scenario_from_yaml(&renamed),
        Err(ConfigError::Parse(_))
    ));
}
