//! Persisted user settings layered over compiled-in defaults.
//!
//! Overrides live in a TOML file at
//! `~/.config/langzeitarchiv-manager/config.toml`, shaped as nested tables that
//! mirror the dotted keys:
//!
//! ```toml
//! [pack]
//! redundancy_percent = 20
//! default_format = "iso"
//! ```
//!
//! Reads never fail: a missing or unparsable file is treated as having no
//! overrides. Concurrent writers are not coordinated; the last write wins.

mod tree;
mod value;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::{debug, warn};

pub use tree::flatten;
pub use value::ConfigValue;

use crate::config::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::SettingsError;

/// Dotted-key settings store backed by a single TOML file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Location of the override file.
    path: PathBuf,

    /// Compiled-in defaults; never modified after construction.
    defaults: Table,
}

impl Settings {
    /// Opens the store at the per-user location.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoHomeDir`] when the home directory is unknown.
    pub fn open() -> Result<Self, SettingsError> {
        let home = home_dir()?;
        let path = home.join(".config").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        Ok(Self::at(path, &home))
    }

    /// Opens a store whose override file lives at `path`; defaults that refer to
    /// the user's home directory are resolved against `home`.
    pub fn at(path: impl Into<PathBuf>, home: &Path) -> Self {
        Self { path: path.into(), defaults: tree::defaults(home) }
    }

    /// Location of the override file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the override at `key`, falling back to the compiled-in default.
    pub fn get(&self, key: &str) -> Option<Value> {
        let overrides = self.load_overrides();
        tree::lookup(&overrides, key).or_else(|| tree::lookup(&self.defaults, key)).cloned()
    }

    /// Coerces `raw` and persists it as an override at `key`.
    ///
    /// # Errors
    ///
    /// Fails for malformed keys (empty, or with an empty segment) and when the
    /// file cannot be written.
    pub fn set(&self, key: &str, raw: &str) -> Result<ConfigValue, SettingsError> {
        let value = ConfigValue::parse(raw);
        let mut overrides = self.load_overrides();

        if !tree::insert(&mut overrides, key, value.clone().into()) {
            return Err(SettingsError::InvalidKey(key.to_owned()));
        }

        self.save_overrides(&overrides)?;
        debug!(key, %value, "stored config override");
        Ok(value)
    }

    /// Returns the defaults with every override merged on top.
    pub fn list_all(&self) -> Table {
        tree::merge(&self.defaults, &self.load_overrides())
    }

    fn load_overrides(&self) -> Table {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Table::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read config file, ignoring overrides");
                return Table::new();
            }
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "config file is not valid TOML, ignoring overrides");
            Table::new()
        })
    }

    fn save_overrides(&self, overrides: &Table) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io { path: dir.to_path_buf(), source })?;
        }

        let content = toml::to_string_pretty(overrides)?;
        fs::write(&self.path, content).map_err(|source| SettingsError::Io { path: self.path.clone(), source })
    }
}

/// Resolves the user's home directory.
///
/// # Errors
///
/// Returns [`SettingsError::NoHomeDir`] when the platform reports none.
pub fn home_dir() -> Result<PathBuf, SettingsError> {
    dirs::home_dir().ok_or(SettingsError::NoHomeDir)
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(raw: &str, home: &Path) -> PathBuf {
    match raw.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) if rest.starts_with('/') || rest.starts_with(std::path::MAIN_SEPARATOR) => home.join(&rest[1..]),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn store() -> (TempDir, Settings) {
        let dir = tempdir().unwrap();
        let settings = Settings::at(dir.path().join("lam_config").join("config.toml"), Path::new("/home/archivist"));
        (dir, settings)
    }

    #[test]
    fn test_get_default_redundancy() {
        let (_dir, settings) = store();
        assert_eq!(settings.get("pack.redundancy_percent"), Some(Value::Integer(15)));
    }

    #[test]
    fn test_get_default_format() {
        let (_dir, settings) = store();
        assert_eq!(settings.get("pack.default_format"), Some(Value::String("tar".into())));
    }

    #[test]
    fn test_get_unknown_key_returns_none() {
        let (_dir, settings) = store();
        assert_eq!(settings.get("nonexistent.key"), None);
    }

    #[test]
    fn test_set_and_get_string() {
        let (_dir, settings) = store();
        settings.set("pack.default_format", "iso").unwrap();
        assert_eq!(settings.get("pack.default_format"), Some(Value::String("iso".into())));
    }

    #[test]
    fn test_set_and_get_int() {
        let (_dir, settings) = store();
        assert_eq!(settings.set("pack.redundancy_percent", "20").unwrap(), ConfigValue::Integer(20));
        assert_eq!(settings.get("pack.redundancy_percent"), Some(Value::Integer(20)));
    }

    #[test]
    fn test_set_and_get_decimal() {
        let (_dir, settings) = store();
        settings.set("pack.ratio", "3.5").unwrap();
        assert_eq!(settings.get("pack.ratio"), Some(Value::Float(3.5)));
    }

    #[test]
    fn test_set_creates_config_dir() {
        let (dir, settings) = store();
        settings.set("pack.redundancy_percent", "10").unwrap();
        assert!(dir.path().join("lam_config").join("config.toml").exists());
    }

    #[test]
    fn test_set_keeps_other_overrides() {
        let (_dir, settings) = store();
        settings.set("pack.redundancy_percent", "25").unwrap();
        settings.set("pack.par2_volumes", "4").unwrap();
        assert_eq!(settings.get("pack.redundancy_percent"), Some(Value::Integer(25)));
        assert_eq!(settings.get("pack.par2_volumes"), Some(Value::Integer(4)));
    }

    #[test]
    fn test_set_rejects_malformed_key() {
        let (_dir, settings) = store();
        assert!(matches!(settings.set("pack..x", "1"), Err(SettingsError::InvalidKey(_))));
        assert!(!settings.path().exists());
    }

    #[test]
    fn test_persisted_file_is_nested_toml() {
        let (_dir, settings) = store();
        settings.set("pack.default_format", "dmg").unwrap();

        let written = fs::read_to_string(settings.path()).unwrap();
        let parsed: Table = toml::from_str(&written).unwrap();
        assert_eq!(parsed["pack"]["default_format"].as_str(), Some("dmg"));
    }

    #[test]
    fn test_list_all_contains_defaults() {
        let (_dir, settings) = store();
        let data = settings.list_all();
        assert_eq!(data["pack"]["redundancy_percent"].as_integer(), Some(15));
        assert_eq!(data["pack"]["par2_volumes"].as_integer(), Some(1));
    }

    #[test]
    fn test_list_all_reflects_user_setting() {
        let (_dir, settings) = store();
        settings.set("pack.redundancy_percent", "30").unwrap();
        let data = settings.list_all();
        assert_eq!(data["pack"]["redundancy_percent"].as_integer(), Some(30));
        assert_eq!(data["pack"]["default_format"].as_str(), Some("tar"));
    }

    #[test]
    fn test_unparsable_file_means_no_overrides() {
        let (_dir, settings) = store();
        fs::create_dir_all(settings.path().parent().unwrap()).unwrap();
        fs::write(settings.path(), "this is = = not toml [").unwrap();

        assert_eq!(settings.get("pack.redundancy_percent"), Some(Value::Integer(15)));
        assert_eq!(settings.list_all(), tree::defaults(Path::new("/home/archivist")));
    }

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/home/archivist");
        assert_eq!(expand_tilde("~", home), PathBuf::from("/home/archivist"));
        assert_eq!(expand_tilde("~/LAM/out", home), PathBuf::from("/home/archivist/LAM/out"));
        assert_eq!(expand_tilde("/srv/out", home), PathBuf::from("/srv/out"));
        assert_eq!(expand_tilde("~other/x", home), PathBuf::from("~other/x"));
    }
}
