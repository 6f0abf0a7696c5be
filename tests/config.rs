use std::io::Write as _;

use spriview::color_scheme::ColorScheme;
use spriview::{CommandType, ConfigError, DashboardConfig};

#[test]
fn defaults_match_the_instrument_layout() {
    let cfg = DashboardConfig::default();
    assert_eq!(cfg.title, "SPRi App");
    assert_eq!(cfg.theme, ColorScheme::Light);
    assert_eq!(cfg.broker.url, "ws://localhost:9001");
    assert_eq!(cfg.charts.len(), 2);
    assert!(cfg.charts[0].baseline);
    assert!(!cfg.charts[1].baseline);
    assert_eq!(cfg.charts[0].capacity, 100);
    assert_eq!(cfg.images, vec!["drawing".to_string(), "raw".to_string()]);
    assert_eq!(cfg.controls.sliders[0].cmd, CommandType::SetPump);
    assert_eq!(cfg.controls.sliders[0].max, 255.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_yaml_keeps_other_defaults() {
    let yaml = r#"
title: Bench 2
theme: dark
broker:
  url: mqtt://10.0.0.5:1883
charts:
  - field: Mean
    source: ref
    capacity: 20
    channel_ids: [19, 20, 190]
controls:
  buttons: [0, 1]
"#;
    let cfg = DashboardConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.title, "Bench 2");
    assert_eq!(cfg.theme, ColorScheme::Dark);
    assert_eq!(cfg.broker.url, "mqtt://10.0.0.5:1883");
    assert_eq!(cfg.broker.keep_alive_secs, 30);
    assert_eq!(cfg.charts.len(), 1);
    assert_eq!(cfg.charts[0].source, "ref");
    assert!(!cfg.charts[0].baseline);
    assert_eq!(cfg.charts[0].channel_ids, vec![19, 20, 190]);
    assert_eq!(
        cfg.controls.buttons,
        vec![CommandType::StartCamera, CommandType::StopCamera]
    );
    assert_eq!(cfg.controls.sliders.len(), 8);
    assert_eq!(cfg.topics.histograms, "telemetry/histograms");
}

#[test]
fn unknown_command_code_is_rejected() {
    let yaml = "controls:\n  buttons: [42]\n";
    assert!(DashboardConfig::from_yaml_str(yaml).is_err());
}

#[test]
fn yaml_round_trips() {
    let cfg = DashboardConfig::default();
    let text = cfg.to_yaml_string().unwrap();
    assert_eq!(DashboardConfig::from_yaml_str(&text).unwrap(), cfg);
}

#[test]
fn invalid_values_fail_validation() {
    let mut cfg = DashboardConfig::default();
    cfg.charts[0].capacity = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

    let mut cfg = DashboardConfig::default();
    cfg.controls.sliders[0].min = 300.0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn load_reads_an_explicit_file() {
    let path = std::env::temp_dir().join(format!("spriview-config-{}.yaml", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "title: From file\nhistogram: false").unwrap();
    drop(f);

    let cfg = DashboardConfig::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.title, "From file");
    assert!(!cfg.histogram);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let path = std::env::temp_dir().join("spriview-does-not-exist.yaml");
    assert!(matches!(
        DashboardConfig::load(Some(&path)),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn broken_yaml_reports_the_path() {
    let path = std::env::temp_dir().join(format!("spriview-broken-{}.yaml", std::process::id()));
    std::fs::write(&path, "charts: [this is: not: valid").unwrap();
    let err = DashboardConfig::load_from_path(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
