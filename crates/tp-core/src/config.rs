//! Active configuration: discovery, memoization and explicit installation.
//!
//! The configuration is discovered once per process by walking the current
//! directory and its ancestors. In each directory the first existing file of
//! [`CONFIG_FILE_NAMES`] wins:
//!
//! - `thermoprops.json` / `thermoprops.yaml` / `thermoprops.yml` must hold a
//!   top-level `thermoprops` table; malformed content is an error.
//! - `Cargo.toml` may carry `[package.metadata.thermoprops]` or
//!   `[workspace.metadata.thermoprops]`; anything missing or malformed there
//!   falls back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::units::UnitsSystem;
use crate::{TpError, TpResult};

/// Candidate file names, in lookup order within one directory.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "thermoprops.json",
    "thermoprops.yaml",
    "thermoprops.yml",
    "Cargo.toml",
];

const SECTION: &str = "thermoprops";

static ACTIVE: RwLock<Option<Configuration>> = RwLock::new(None);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    pub units_system: UnitsSystem,
}

impl Configuration {
    pub fn new(units_system: UnitsSystem) -> Self {
        Self { units_system }
    }

    /// Active configuration, discovered from the current directory on first
    /// use and memoized until [`Configuration::reset`].
    pub fn build() -> TpResult<Configuration> {
        if let Some(config) = *read_active() {
            return Ok(config);
        }
        let mut active = write_active();
        if let Some(config) = *active {
            return Ok(config);
        }
        let config = ConfigurationBuilder::from_current_dir()?.build()?;
        debug!(units_system = %config.units_system, "configuration discovered");
        *active = Some(config);
        Ok(config)
    }

    /// Forgets the memoized configuration; the next `build` rediscovers it.
    pub fn reset() {
        *write_active() = None;
    }

    /// Replaces the active configuration.
    pub fn install(config: Configuration) {
        debug!(units_system = %config.units_system, "configuration installed");
        *write_active() = Some(config);
    }
}

fn read_active() -> RwLockReadGuard<'static, Option<Configuration>> {
    ACTIVE.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_active() -> RwLockWriteGuard<'static, Option<Configuration>> {
    ACTIVE.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Deserialize)]
struct ConfigFile {
    thermoprops: Configuration,
}

/// Locates and parses a configuration file starting from a directory.
#[derive(Clone, Debug)]
pub struct ConfigurationBuilder {
    start_dir: PathBuf,
}

impl ConfigurationBuilder {
    pub fn discover(start_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
        }
    }

    pub fn from_current_dir() -> TpResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| TpError::Io {
            path: PathBuf::from("."),
            reason: e.to_string(),
        })?;
        Ok(Self::discover(cwd))
    }

    /// First configuration file found walking up from the start directory.
    pub fn config_file(&self) -> Option<PathBuf> {
        self.start_dir.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    pub fn build(&self) -> TpResult<Configuration> {
        let Some(path) = self.config_file() else {
            debug!(start_dir = %self.start_dir.display(), "no configuration file, using defaults");
            return Ok(Configuration::default());
        };
        debug!(path = %path.display(), "loading configuration");
        if is_cargo_manifest(&path) {
            return Ok(load_cargo_manifest(&path));
        }
        load_named_file(&path)
    }
}

fn is_cargo_manifest(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == "Cargo.toml")
}

fn load_named_file(path: &Path) -> TpResult<Configuration> {
    let text = fs::read_to_string(path).map_err(|e| TpError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let invalid = |reason: String| TpError::Config {
        path: path.to_path_buf(),
        reason,
    };
    let file: ConfigFile = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?,
        _ => serde_yaml::from_str(&text).map_err(|e| invalid(e.to_string()))?,
    };
    Ok(file.thermoprops)
}

fn load_cargo_manifest(path: &Path) -> Configuration {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable manifest, using defaults");
            return Configuration::default();
        }
    };
    let manifest: toml::Value = match toml::from_str(&text) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "malformed manifest, using defaults");
            return Configuration::default();
        }
    };
    let section = ["package", "workspace"].into_iter().find_map(|table| {
        manifest
            .get(table)
            .and_then(|t| t.get("metadata"))
            .and_then(|m| m.get(SECTION))
    });
    match section.cloned().map(Configuration::deserialize) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            debug!(path = %path.display(), error = %e, "invalid metadata section, using defaults");
            Configuration::default()
        }
        None => Configuration::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitConverter;
    use std::sync::Mutex;

    // Tests touching the process-wide configuration run one at a time.
    static GLOBAL: Mutex<()> = Mutex::new(());

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "thermoprops-config-{tag}-{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&path);
            fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        fn write(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn json_file_is_loaded() {
        let dir = ScratchDir::new("json");
        dir.write("thermoprops.json", r#"{"thermoprops": {"units_system": "SI"}}"#);
        let config = ConfigurationBuilder::discover(&dir.0).build().unwrap();
        assert_eq!(config.units_system, UnitsSystem::SI);
    }

    #[test]
    fn yaml_file_is_loaded() {
        let dir = ScratchDir::new("yaml");
        dir.write("thermoprops.yaml", "thermoprops:\n  units_system: SIWithCelsius\n");
        let config = ConfigurationBuilder::discover(&dir.0).build().unwrap();
        assert_eq!(config.units_system, UnitsSystem::SIWithCelsius);
    }

    #[test]
    fn malformed_named_file_is_an_error() {
        let dir = ScratchDir::new("malformed");
        let path = dir.write(
            "thermoprops.json",
            r#"{"thermoprops": {"units_system": "Imperial"}}"#,
        );
        let err = ConfigurationBuilder::discover(&dir.0).build().unwrap_err();
        assert!(matches!(&err, TpError::Config { path: p, .. } if *p == path));
        assert!(err.to_string().contains("Invalid thermoprops configuration!"));
    }

    #[test]
    fn named_file_without_section_is_an_error() {
        let dir = ScratchDir::new("nosection");
        dir.write("thermoprops.yml", "units_system: SI\n");
        assert!(ConfigurationBuilder::discover(&dir.0).build().is_err());
    }

    #[test]
    fn cargo_manifest_metadata_is_loaded() {
        let dir = ScratchDir::new("cargo");
        dir.write(
            "Cargo.toml",
            concat!(
                "[package]\nname = \"demo\"\n\n",
                "[package.metadata.thermoprops]\nunits_system = \"SIWithCelsius\"\n",
            ),
        );
        let config = ConfigurationBuilder::discover(&dir.0).build().unwrap();
        assert_eq!(config.units_system, UnitsSystem::SIWithCelsius);
    }

    #[test]
    fn cargo_manifest_problems_fall_back_to_defaults() {
        let dir = ScratchDir::new("cargo-bad");
        dir.write(
            "Cargo.toml",
            "[workspace.metadata.thermoprops]\nunits_system = 42\n",
        );
        let config = ConfigurationBuilder::discover(&dir.0).build().unwrap();
        assert_eq!(config, Configuration::default());

        dir.write("Cargo.toml", "this is = = not toml");
        let config = ConfigurationBuilder::discover(&dir.0).build().unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn named_file_wins_over_manifest_and_ancestors_are_searched() {
        let dir = ScratchDir::new("ancestors");
        dir.write("Cargo.toml", "[package]\nname = \"demo\"\n");
        let named = dir.write("thermoprops.json", r#"{"thermoprops": {"units_system": "SI"}}"#);
        let child = dir.0.join("nested").join("deeper");
        fs::create_dir_all(&child).unwrap();

        let builder = ConfigurationBuilder::discover(&child);
        assert_eq!(builder.config_file(), Some(named));
        assert_eq!(builder.build().unwrap().units_system, UnitsSystem::SI);
    }

    #[test]
    fn install_and_reset_drive_the_active_converter() {
        let _guard = GLOBAL.lock().unwrap_or_else(PoisonError::into_inner);

        Configuration::install(Configuration::new(UnitsSystem::SI));
        assert_eq!(Configuration::build().unwrap().units_system, UnitsSystem::SI);
        assert_eq!(
            UnitConverter::active().unwrap().units_system(),
            UnitsSystem::SI
        );

        Configuration::install(Configuration::new(UnitsSystem::SIWithCelsius));
        assert_eq!(
            UnitConverter::active().unwrap().temperature_to_si(0.0),
            273.15
        );

        Configuration::reset();
        let rediscovered = Configuration::build().unwrap();
        assert_eq!(
            rediscovered,
            ConfigurationBuilder::from_current_dir().unwrap().build().unwrap()
        );
    }
}
