use std::{collections::HashMap, fs, path::Path};

use reelshelf_config::{
    CatalogConfig, ConfigError, ConfigSource, ENV_CONFIG_JSON, ENV_CONFIG_PATH,
    ENV_MAX_RETRIES,
};
use tempfile::TempDir;

fn env(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> + use<> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn falls_back_to_defaults() {
    let root = TempDir::new().unwrap();
    let (config, source) =
        CatalogConfig::load_with(env(&[]), root.path()).unwrap();
    assert_eq!(source, ConfigSource::Default);
    assert_eq!(config, CatalogConfig::default());
}

#[test]
fn discovers_nested_default_file() {
    let root = TempDir::new().unwrap();
    let path = write(
        root.path(),
        "config/reelshelf.json",
        r#"{"remote": {"page_size": 10, "item_cap": 30}}"#,
    );

    let (config, source) =
        CatalogConfig::load_with(env(&[]), root.path()).unwrap();
    assert_eq!(source, ConfigSource::File(path));
    assert_eq!(config.remote.page_size, 10);
    assert_eq!(config.remote.item_cap, Some(30));
}

#[test]
fn top_level_toml_wins_over_nested_json() {
    let root = TempDir::new().unwrap();
    let toml = write(root.path(), "reelshelf.toml", "[window]\npage_size = 50\n");
    write(
        root.path(),
        "config/reelshelf.json",
        r#"{"window": {"page_size": 5}}"#,
    );

    let (config, source) =
        CatalogConfig::load_with(env(&[]), root.path()).unwrap();
    assert_eq!(source, ConfigSource::File(toml));
    assert_eq!(config.window.page_size(), 50);
}

#[test]
fn env_path_beats_inline_json_and_discovery() {
    let root = TempDir::new().unwrap();
    write(root.path(), "reelshelf.toml", "[retry]\nmax_retries = 9\n");
    let explicit = write(
        root.path(),
        "elsewhere/custom.toml",
        "[retry]\nmax_retries = 2\n",
    );

    let (config, source) = CatalogConfig::load_with(
        env(&[
            (ENV_CONFIG_PATH, explicit.display().to_string()),
            (ENV_CONFIG_JSON, r#"{"retry": {"max_retries": 7}}"#.into()),
        ]),
        root.path(),
    )
    .unwrap();
    assert_eq!(source, ConfigSource::EnvPath(explicit));
    assert_eq!(config.retry.max_retries, 2);
}

#[test]
fn inline_json_beats_discovery() {
    let root = TempDir::new().unwrap();
    write(root.path(), "reelshelf.toml", "[retry]\nmax_retries = 9\n");

    let (config, source) = CatalogConfig::load_with(
        env(&[(ENV_CONFIG_JSON, r#"{"retry": {"max_retries": 7}}"#.into())]),
        root.path(),
    )
    .unwrap();
    assert_eq!(source, ConfigSource::EnvInline);
    assert_eq!(config.retry.max_retries, 7);
}

#[test]
fn overrides_apply_after_file() {
    let root = TempDir::new().unwrap();
    write(root.path(), "reelshelf.toml", "[retry]\nmax_retries = 9\n");

    let (config, _) = CatalogConfig::load_with(
        env(&[(ENV_MAX_RETRIES, "4".into())]),
        root.path(),
    )
    .unwrap();
    assert_eq!(config.retry.max_retries, 4);
}

#[test]
fn invalid_file_values_fail_validation() {
    let root = TempDir::new().unwrap();
    write(
        root.path(),
        "reelshelf.toml",
        "[retry]\ninitial_backoff_ms = 5000\nmax_backoff_ms = 1000\n",
    );

    let err = CatalogConfig::load_with(env(&[]), root.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRetry { .. }), "{err}");
}

#[test]
fn missing_env_path_is_a_read_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("absent.toml");

    let err = CatalogConfig::load_with(
        env(&[(ENV_CONFIG_PATH, missing.display().to_string())]),
        root.path(),
    )
    .unwrap_err();
    match err {
        ConfigError::Read { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn explicit_toml_with_wrong_types_is_a_parse_error() {
    let root = TempDir::new().unwrap();
    let path = write(root.path(), "bad.toml", "[remote]\npage_size = \"ten\"\n");

    let err = CatalogConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}
