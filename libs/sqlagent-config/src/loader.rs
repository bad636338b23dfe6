//! Config file loading and environment-driven discovery.
//!
//! `load` decodes a single file, picking the decoder by extension (JSON is
//! the default, YAML for `.yaml`/`.yml`). Discovery walks a fixed set of
//! candidate directories upward from a starting point, looking for
//! `database[-LABEL].{json,yaml,yml}`.

use crate::descriptor::ConnectionDescriptor;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that overrides the config file path directly.
pub const ENV_DB_CONFIG: &str = "DB_CONFIG";

/// Environment variable selecting the label suffix of the config file name.
pub const ENV_DB_LABEL: &str = "DB_LABEL";

/// Base name of the config file, before label suffix and extension.
pub const DEFAULT_CONFIG_BASENAME: &str = "database";

/// How many directory levels upward discovery walks.
const SEARCH_LEVELS: usize = 3;

/// Subdirectory probed at each level, after the level itself.
const SEARCH_SUBDIR: &str = "config";

/// Extensions probed at each candidate location, in order.
const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Read and decode a config file into a [`ConnectionDescriptor`].
pub fn load(path: impl AsRef<Path>) -> ConfigResult<ConnectionDescriptor> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let cfg: ConnectionDescriptor = match ext.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    debug!(path = %path.display(), driver = %cfg.driver, "database config loaded");
    Ok(cfg)
}

/// Config file name for the given label: `database` or `database-LABEL`.
fn config_basename(label: Option<&str>) -> String {
    match label {
        Some(label) if !label.is_empty() => format!("{}-{}", DEFAULT_CONFIG_BASENAME, label),
        _ => DEFAULT_CONFIG_BASENAME.to_string(),
    }
}

/// Probe one directory for `STEM.{json,yaml,yml}`.
fn find_in_dir(dir: &Path, stem: &str) -> Option<PathBuf> {
    for ext in EXTENSIONS {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Search for a config file upward from `start_dir`.
///
/// At each of the 3 levels the directory itself is probed first, then its
/// `config/` subdirectory. The first existing file wins.
pub fn discover(start_dir: &Path, label: Option<&str>) -> ConfigResult<PathBuf> {
    let stem = config_basename(label);
    let mut dir = start_dir.to_path_buf();

    for _ in 0..SEARCH_LEVELS {
        if let Some(found) = find_in_dir(&dir, &stem) {
            return Ok(found);
        }
        if let Some(found) = find_in_dir(&dir.join(SEARCH_SUBDIR), &stem) {
            return Ok(found);
        }
        let parent = match dir.parent() {
            Some(p) => p.to_path_buf(),
            None => break,
        };
        dir = parent;
    }
    Err(ConfigError::NotFound)
}

/// Locate the config file using environment variables.
///
/// `DB_CONFIG` names the file directly; if unset or missing, the search
/// runs from the current directory with the `DB_LABEL` suffix.
pub fn discover_from_env() -> ConfigResult<PathBuf> {
    if let Ok(path) = env::var(ENV_DB_CONFIG) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Ok(path);
        }
        warn!(path = %path.display(), "{} points at a missing file, falling back to search", ENV_DB_CONFIG);
    }

    let cwd = env::current_dir()?;
    let label = env::var(ENV_DB_LABEL).ok();
    discover(&cwd, label.as_deref())
}

/// Discover and decode the config file in one step.
pub fn load_from_env() -> ConfigResult<ConnectionDescriptor> {
    let path = discover_from_env()?;
    load(path)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::descriptor::DriverKind;
    use std::fs;

    const JSON_CONFIG: &str = r#"{
        "host": "localhost",
        "port": 3306,
        "name": "app",
        "type": "mysql",
        "user": "app",
        "password": "secret",
        "parameters": {"charset": "utf8mb4"}
    }"#;

    const YAML_CONFIG: &str = "\
host: localhost
port: 3306
name: app
type: mysql
user: app
password: secret
parameters:
  charset: utf8mb4
";

    #[test]
    fn test_load_json_and_yaml_agree() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("database.json");
        let yaml_path = dir.path().join("database.yaml");
        fs::write(&json_path, JSON_CONFIG).unwrap();
        fs::write(&yaml_path, YAML_CONFIG).unwrap();

        let from_json = load(&json_path).unwrap();
        let from_yaml = load(&yaml_path).unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json.driver, DriverKind::Mysql);
        assert_eq!(from_json.parameters.get("charset").unwrap(), "utf8mb4");
    }

    #[test]
    fn test_load_unknown_extension_defaults_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.conf");
        fs::write(&path, JSON_CONFIG).unwrap();
        assert!(load(&path).is_ok());
    }

    #[test]
    fn test_load_malformed_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(&path, "not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.is_decode());

        let missing = load(dir.path().join("absent.json")).unwrap_err();
        assert!(missing.is_decode());
    }

    #[test]
    fn test_discover_walks_upward_into_config_subdir() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a/b");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir_all(root.path().join("config")).unwrap();
        fs::write(root.path().join("config/database.yaml"), YAML_CONFIG).unwrap();

        // two levels up, inside config/
        let found = discover(&deep, None).unwrap();
        assert_eq!(found, root.path().join("config/database.yaml"));
    }

    #[test]
    fn test_discover_prefers_nearest_and_json_first() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a");
        fs::create_dir_all(&deep).unwrap();
        fs::write(root.path().join("database.yaml"), YAML_CONFIG).unwrap();
        fs::write(deep.join("database.yaml"), YAML_CONFIG).unwrap();
        fs::write(deep.join("database.json"), JSON_CONFIG).unwrap();

        let found = discover(&deep, None).unwrap();
        assert_eq!(found, deep.join("database.json"));
    }

    #[test]
    fn test_discover_label_suffix() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("database-staging.yml"), YAML_CONFIG).unwrap();

        assert!(discover(root.path(), None).is_err());
        let found = discover(root.path(), Some("staging")).unwrap();
        assert_eq!(found, root.path().join("database-staging.yml"));
    }

    #[test]
    fn test_discover_not_found() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover(root.path(), None),
            Err(ConfigError::NotFound)
        ));
    }
}
