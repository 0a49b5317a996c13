//! Tests for environment overlays and profile merging.

use folio_config::{BuildMode, ConfigDiscovery, Environment, merge_layers};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("folio.toml"), content).expect("write config");
}

#[test]
fn production_profile_overrides_scalars_and_concatenates_lists() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        &dir,
        r#"
[build]
public_path = "/"
plugins = ["html-minifier"]

[profiles.production.build]
public_path = "https://cdn.example.com/"
plugins = ["compress"]

[[pages]]
title = "Demo"
entry = { app = "main.js" }
"#,
    );

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    let env = config
        .env_config(Environment::Production)
        .expect("env config");
    let resolved = merge_layers(&config.build, &[&env.overlay]).expect("merge");

    assert_eq!(resolved.public_path, "https://cdn.example.com/");
    assert_eq!(resolved.plugins, vec!["html-minifier", "compress"]);
    assert!(resolved.minify);
    assert!(resolved.hash_filenames);
}

#[test]
fn development_defaults_enable_source_maps() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        &dir,
        r#"
[[pages]]
title = "Demo"
entry = { app = "main.js" }
"#,
    );

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    let env = config
        .env_config(Environment::Development)
        .expect("env config");
    let resolved = merge_layers(&config.build, &[&env.overlay]).expect("merge");

    assert!(resolved.source_maps);
    assert!(!resolved.minify);
}

#[test]
fn profile_preserves_unspecified_fields() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        &dir,
        r#"
[build]
out_dir = "public"
vendor_chunk = "libs"

[profiles.production.build]
minify = false
"#,
    );

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    let env = config
        .env_config(Environment::Production)
        .expect("env config");
    let resolved = merge_layers(&config.build, &[&env.overlay]).expect("merge");

    assert!(!resolved.minify);
    assert_eq!(resolved.vendor_chunk, "libs");
    assert_eq!(resolved.out_dir, std::path::PathBuf::from("public"));
}

#[test]
fn profile_mode_override() {
    let dir = TempDir::new().expect("tempdir");
    write_config(
        &dir,
        r#"
mode = "isolated"

[profiles.production]
mode = "shared"
"#,
    );

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert_eq!(config.mode_for(Environment::Production), BuildMode::Shared);
    assert_eq!(config.mode_for(Environment::Development), BuildMode::Isolated);
}

#[test]
fn profile_build_must_be_a_table() {
    let config = folio_config::FolioConfig::from_value(serde_json::json!({
        "profiles": { "production": { "build": "fast" } }
    }))
    .expect("config");

    assert!(config.env_config(Environment::Production).is_err());
}
