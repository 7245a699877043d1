//! Configuration loading tests

use std::io::Write;

use terse_console::config::{StaticConfig, get_config, update_config};
use terse_console::controller::{ControllerOptions, RefreshOrdering};
use terse_console::highlight::Emphasis;
use terse_console::models::PreviewMergePolicy;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_explicit_file() {
    let file = write_config(
        r#"
[api]
base_url = "http://10.0.0.2:30000"

[table]
refresh_ordering = "last_resolved_wins"
delete_visits = false

[preview]
merge_policy = "all_or_nothing"

[display]
emphasis = "markdown"
"#,
    );

    let config = StaticConfig::load_from(file.path().to_str());

    assert_eq!(config.api.base_url, "http://10.0.0.2:30000");
    assert_eq!(config.table.refresh_ordering, RefreshOrdering::LastResolvedWins);
    assert!(config.table.delete_terse);
    assert!(!config.table.delete_visits);
    assert_eq!(config.preview.merge_policy, PreviewMergePolicy::AllOrNothing);
    assert!(config.preview.fetch_on_write);
    assert_eq!(config.display.emphasis, Emphasis::Markdown);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_missing_explicit_file_falls_back_to_defaults() {
    let config = StaticConfig::load_from(Some("/definitely/not/here.toml"));
    assert_eq!(config.api.base_url, "http://127.0.0.1:30000");
    assert_eq!(config.display.emphasis, Emphasis::Ansi);
}

#[test]
fn test_invalid_value_falls_back_to_defaults() {
    let file = write_config("[table]\nrefresh_ordering = \"newest\"\n");
    let config = StaticConfig::load_from(file.path().to_str());
    assert_eq!(config.table.refresh_ordering, RefreshOrdering::LastIssuedWins);
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = StaticConfig::default();
    config.export.dir = "/tmp/exports".to_string();
    config.logging.format = "json".to_string();
    config.save_to_file(&path).unwrap();

    let loaded = StaticConfig::load_from(path.to_str());
    assert_eq!(loaded.export.dir, "/tmp/exports");
    assert_eq!(loaded.logging.format, "json");
}

#[test]
fn test_controller_options_follow_config() {
    let mut config = StaticConfig::default();
    config.table.delete_terse = false;
    config.preview.fetch_on_write = false;

    let options = ControllerOptions::from(&config);
    assert!(!options.delete_flags.terse);
    assert!(options.delete_flags.visits);
    assert!(!options.fetch_preview_on_write);
    assert_eq!(options.refresh_ordering, RefreshOrdering::LastIssuedWins);
}

#[test]
fn test_update_config_replaces_global() {
    let mut config = StaticConfig::default();
    config.api.timeout_secs = 42;
    update_config(config);
    assert_eq!(get_config().api.timeout_secs, 42);
}
