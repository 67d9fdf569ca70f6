//! Unit tests for configuration resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests that
//! manipulate SUKI_ROOT_FOLDER are marked with #[serial] so they run
//! sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use suki_common::config::{
    resolve_database_path, resolve_root_folder, ConfigOverrides, TomlConfig, DATABASE_FILE_NAME,
    ROOT_FOLDER_ENV,
};

#[test]
#[serial]
fn test_cli_arg_has_highest_priority() {
    env::set_var(ROOT_FOLDER_ENV, "/env/suki");
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/toml/suki")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/cli/suki")), &toml_config);
    assert_eq!(resolved, PathBuf::from("/cli/suki"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/env/suki");
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/toml/suki")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &toml_config);
    assert_eq!(resolved, PathBuf::from("/env/suki"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/toml/suki")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &toml_config);
    assert_eq!(resolved, PathBuf::from("/toml/suki"));
}

#[test]
#[serial]
fn test_no_overrides_uses_compiled_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert!(!resolved.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "");
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/toml/suki")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &toml_config);
    assert_eq!(resolved, PathBuf::from("/toml/suki"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_database_path_from_root_folder() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/data/suki")),
        ..Default::default()
    };

    let db_path = resolve_database_path(&ConfigOverrides::default(), &toml_config);
    assert_eq!(db_path, PathBuf::from("/data/suki").join(DATABASE_FILE_NAME));
}

#[test]
#[serial]
fn test_database_path_override_wins() {
    env::remove_var(ROOT_FOLDER_ENV);
    let overrides = ConfigOverrides {
        database_path: Some(PathBuf::from("/elsewhere/other.db")),
        root_folder: None,
    };
    let toml_config = TomlConfig {
        database_path: Some(PathBuf::from("/toml/suki.db")),
        ..Default::default()
    };

    let db_path = resolve_database_path(&overrides, &toml_config);
    assert_eq!(db_path, PathBuf::from("/elsewhere/other.db"));
}

#[test]
fn test_toml_config_load_missing_file_uses_defaults() {
    let config = TomlConfig::load(Path::new("/definitely/not/here/suki.toml")).unwrap();
    assert!(config.database_path.is_none());
    assert!(config.root_folder.is_none());
}
