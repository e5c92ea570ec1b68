use std::path::Path;

use upgrade_shooter::config::GameConfig;
use upgrade_shooter::error::ConfigError;
use upgrade_shooter::rules::{Movement, Variant, DEFAULT_HEIGHT, DEFAULT_WIDTH};

use tempfile::TempDir;

#[test]
fn defaults_match_classic_rules() {
    let config = GameConfig::default();
    assert_eq!(config.variant, Variant::Classic);
    assert_eq!(config.width, DEFAULT_WIDTH);
    assert_eq!(config.height, DEFAULT_HEIGHT);
    assert_eq!(config.frame_ms, 16);
    assert!(config.seed.is_none());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let text = "variant = \"deluxe\"\nwidth = 480.0\nseed = 7\n";
    let config = GameConfig::from_toml(text, Path::new("config.toml")).expect("valid");
    assert_eq!(config.variant, Variant::Deluxe);
    assert_eq!(config.width, 480.0);
    assert_eq!(config.height, DEFAULT_HEIGHT);
    assert_eq!(config.seed, Some(7));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let err = GameConfig::from_toml("variant = [", Path::new("bad.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn unknown_variant_is_rejected() {
    let err = GameConfig::from_toml("variant = \"arcade\"", Path::new("c.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let config = GameConfig::load(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn load_or_default_swallows_errors() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "width = \"wide\"").expect("write");
    assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
}

#[test]
fn rules_follow_the_variant() {
    let config = GameConfig {
        variant: Variant::Deluxe,
        width: 480.0,
        starting_health: 3,
        ..GameConfig::default()
    };
    let rules = config.rules();
    assert_eq!(rules.variant, Variant::Deluxe);
    assert!(rules.particles);
    assert!(matches!(rules.movement, Movement::Momentum { .. }));
    assert_eq!(rules.width, 480.0);
    assert_eq!(rules.starting_health, 3);
}

#[test]
fn degenerate_sizes_are_clamped() {
    let config = GameConfig {
        width: 0.0,
        starting_health: 0,
        ..GameConfig::default()
    };
    let rules = config.rules();
    assert_eq!(rules.width, 1.0);
    assert_eq!(rules.starting_health, 1);
}
