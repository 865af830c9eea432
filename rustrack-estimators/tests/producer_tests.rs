use std::io::Write;
use std::sync::Arc;

use rustrack_estimators::{
    load_config_file, ConfigError, EstimatorConfig, EstimatorRegistry, MeasurementEstimator,
};

fn chi2_json(name: &str, max_chi2: f64) -> String {
    format!(r#"{{"ComponentName": "{name}", "MaxChi2": {max_chi2}, "nSigma": 3.0}}"#)
}

fn charge_json(name: &str) -> String {
    format!(
        r#"{{
            "ComponentName": "{name}",
            "MaxChi2": 30.0,
            "nSigma": 3.0,
            "MaxSagitta": 2.0,
            "pTChargeCutThreshold": 15.0,
            "clusterChargeCut": {{"value": 1620.0}}
        }}"#
    )
}

#[test]
fn test_produce_returns_shared_instance() {
    let registry = EstimatorRegistry::new();
    registry.register(EstimatorConfig::from_json(&chi2_json("Chi2", 30.0)).unwrap());

    let first = registry.produce("Chi2").unwrap();
    let second = registry.produce("Chi2").unwrap();
    assert!(
        Arc::ptr_eq(&first, &second),
        "repeated produce must hand out the same instance"
    );
}

#[test]
fn test_reload_changes_cuts_for_new_callers() {
    let registry = EstimatorRegistry::new();
    registry.register(EstimatorConfig::from_json(&chi2_json("Chi2", 30.0)).unwrap());
    let old = registry.produce("Chi2").unwrap();
    assert_eq!(old.chi_squared_cut(), 30.0);

    registry.register(EstimatorConfig::from_json(&chi2_json("Chi2", 16.0)).unwrap());
    let new = registry.produce("Chi2").unwrap();

    assert!(!Arc::ptr_eq(&old, &new), "changed config must rebuild");
    assert_eq!(new.chi_squared_cut(), 16.0);
    // Holders of the old handle are unaffected by the reload.
    assert_eq!(old.chi_squared_cut(), 30.0);
}

#[test]
fn test_concurrent_first_access_builds_once() {
    let registry = EstimatorRegistry::new();
    registry.register(EstimatorConfig::from_json(&charge_json("Chi2Charge")).unwrap());

    let handles: Vec<Arc<dyn MeasurementEstimator>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| registry.produce("Chi2Charge").unwrap()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    for handle in &handles[1..] {
        assert!(
            Arc::ptr_eq(&handles[0], handle),
            "concurrent first access must not build twice"
        );
    }
}

#[test]
fn test_unknown_component_is_an_error() {
    let registry = EstimatorRegistry::new();
    registry.register(EstimatorConfig::from_json(&chi2_json("Chi2", 30.0)).unwrap());

    assert!(matches!(
        registry.produce("Typo"),
        Err(ConfigError::UnknownComponent(name)) if name == "Typo"
    ));
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"estimators": [{}, {}]}}"#,
        chi2_json("Chi2", 30.0),
        charge_json("Chi2Charge")
    )
    .unwrap();

    let configs = load_config_file(file.path()).unwrap();
    assert_eq!(configs.len(), 2);

    let registry = EstimatorRegistry::new();
    for config in configs {
        registry.register(config);
    }
    assert_eq!(registry.names(), vec!["Chi2", "Chi2Charge"]);

    let estimator = registry.produce("Chi2Charge").unwrap();
    assert_eq!(estimator.chi_squared_cut(), 30.0);
    assert_eq!(estimator.max_sagitta(), 2.0);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = load_config_file("/no/such/estimators.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_bad_block_in_file_names_the_component() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"estimators": [{{"ComponentName": "Broken", "MaxChi2": 30.0}}]}}"#
    )
    .unwrap();

    let err = load_config_file(file.path()).unwrap_err();
    match err {
        ConfigError::MissingParameter {
            parameter,
            component,
        } => {
            assert_eq!(parameter, "nSigma");
            assert_eq!(component, "Broken");
        }
        other => panic!("unexpected error: {other}"),
    }
}
