//! # Configuration Loading
//!
//! Layers configuration from defaults, a TOML file and environment variables,
//! then deserializes the merged table into the caller's settings type.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::{HashMap, HashSet},
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "TOPICAST";

/// Configuration loader with support for multiple sources
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
    file_names: Vec<String>,
    explicit_file: Option<PathBuf>,
    env_prefix: String,
    string_keys: HashSet<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    #[must_use]
    pub fn new() -> Self {
        Self {
            search_paths: vec![
                PathBuf::from("."),
                PathBuf::from("./config"),
                dirs::config_dir()
                    .map_or_else(|| PathBuf::from("/etc/topicast"), |dir| dir.join("topicast")),
            ],
            file_names: vec!["topicast.toml".to_string(), "config.toml".to_string()],
            explicit_file: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            string_keys: HashSet::new(),
        }
    }

    /// Add a search path for configuration files
    #[must_use]
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.as_ref().to_string();
        self
    }

    /// Use this file instead of searching. The file must exist.
    #[must_use]
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Always treat an environment override for `key` (dotted path) as a string.
    #[must_use]
    pub fn with_string_key<S: AsRef<str>>(mut self, key: S) -> Self {
        self.string_keys.insert(key.as_ref().to_lowercase());
        self
    }

    /// Load configuration from all available sources
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if a file cannot be read or the merged
    /// table does not deserialize into `T`.
    pub fn load<T>(&self) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.load_with_env(env::vars())
    }

    /// Load configuration, taking environment overrides from `vars` instead of
    /// the process environment.
    ///
    /// # Errors
    /// Same as [`ConfigLoader::load`].
    pub fn load_with_env<T, I>(&self, vars: I) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
        I: IntoIterator<Item = (String, String)>,
    {
        info!("Loading configuration from multiple sources");

        let mut config_value = toml::Value::try_from(T::default())
            .map_err(|e| Error::configuration(format!("Failed to serialize default config: {e}")))?;

        debug!("Applied default configuration");

        if let Some(config_path) = self.find_config_file()? {
            let file_config = self.load_config_file(&config_path)?;
            config_value = self.merge_config(config_value, file_config);
            info!("Loaded configuration file: {}", config_path.display());
        } else {
            debug!("No configuration file found in search paths");
        }

        config_value = self.apply_env_vars(config_value, vars);
        debug!("Applied environment variables");

        let config = config_value
            .try_into::<T>()
            .map_err(|e| Error::configuration(format!("Failed to deserialize config: {e}")))?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file, without environment overrides
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the file cannot be read or parsed.
    pub fn load_from_file<T, P>(&self, path: P) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        info!("Loading configuration from file: {}", path.display());

        let defaults = toml::Value::try_from(T::default())
            .map_err(|e| Error::configuration(format!("Failed to serialize default config: {e}")))?;
        let file_config = self.load_config_file(path)?;

        self.merge_config(defaults, file_config)
            .try_into::<T>()
            .map_err(|e| Error::configuration(format!("Failed to parse config file: {e}")))
    }

    /// Deserialize configuration from a TOML string
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the content is not valid TOML for `T`.
    pub fn load_from_str<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Save configuration to a TOML file
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if serialization or the write fails.
    pub fn save_to_file<T: Serialize, P: AsRef<Path>>(&self, config: &T, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| Error::configuration(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path.as_ref(), toml_string).map_err(|e| {
            Error::configuration(format!(
                "Failed to write config to {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        info!("Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Get the effective search paths being used
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Get the environment prefix being used
    #[must_use]
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Find the first available configuration file
    fn find_config_file(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.explicit_file {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            return Ok(Some(path.clone()));
        }

        for search_path in &self.search_paths {
            for file_name in &self.file_names {
                let config_path = search_path.join(file_name);
                if config_path.is_file() {
                    debug!("Found config file: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }
        }

        Ok(None)
    }

    /// Load configuration from a TOML file
    fn load_config_file(&self, path: &Path) -> Result<toml::Value> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str::<toml::Table>(&content).map(toml::Value::Table).map_err(|e| {
            Error::configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Merge two TOML configuration values
    #[allow(clippy::only_used_in_recursion)]
    fn merge_config(&self, mut base: toml::Value, override_value: toml::Value) -> toml::Value {
        let override_table = match override_value {
            toml::Value::Table(table) => table,
            other => return other,
        };
        let toml::Value::Table(base_table) = &mut base else {
            return toml::Value::Table(override_table);
        };

        for (key, value) in override_table {
            match base_table.get_mut(&key) {
                Some(existing_value) if existing_value.is_table() && value.is_table() => {
                    let existing = std::mem::replace(
                        existing_value,
                        toml::Value::Table(toml::map::Map::new()),
                    );
                    *existing_value = self.merge_config(existing, value);
                },
                Some(existing_value) => *existing_value = value,
                None => {
                    base_table.insert(key, value);
                },
            }
        }

        base
    }

    /// Apply environment variables to configuration
    fn apply_env_vars<I>(&self, mut config: toml::Value, vars: I) -> toml::Value
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env_vars = self.collect_env_vars(vars);

        for (key, value) in env_vars {
            let parts: Vec<&str> = key.split('.').collect();
            let parsed_value = self.parse_env_value(&key, &value);
            if !Self::set_nested_value(&mut config, &parts, parsed_value) {
                warn!("Ignoring environment override for {key}: parent is not a table");
            }
        }

        config
    }

    /// Collect all relevant environment variables
    fn collect_env_vars<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", self.env_prefix);

        let env_vars: HashMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_lowercase().replace('_', "."), value))
            })
            .collect();

        debug!("Collected {} environment variables", env_vars.len());
        env_vars
    }

    /// Set a nested value in the TOML configuration
    fn set_nested_value(config: &mut toml::Value, parts: &[&str], value: toml::Value) -> bool {
        let toml::Value::Table(table) = config else {
            return false;
        };

        match parts {
            [] => true,
            [last] => {
                table.insert((*last).to_string(), value);
                true
            },
            [current, remaining @ ..] => {
                let entry = table
                    .entry((*current).to_string())
                    .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
                Self::set_nested_value(entry, remaining, value)
            },
        }
    }

    /// Parse environment variable value to appropriate TOML type
    fn parse_env_value(&self, key: &str, value: &str) -> toml::Value {
        if self.string_keys.contains(key) {
            return toml::Value::String(value.to_string());
        }

        if let Ok(bool_val) = value.parse::<bool>() {
            return toml::Value::Boolean(bool_val);
        }

        if let Ok(int_val) = value.parse::<i64>() {
            return toml::Value::Integer(int_val);
        }

        if let Ok(float_val) = value.parse::<f64>() {
            return toml::Value::Float(float_val);
        }

        toml::Value::String(value.to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default)]
        verbose: bool,
        #[serde(default)]
        service: ServiceSection,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ServiceSection {
        name: String,
        port: i64,
    }

    impl Default for ServiceSection {
        fn default() -> Self {
            Self { name: "default".to_string(), port: 80 }
        }
    }

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    fn isolated_loader(dir: &TempDir) -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        loader.search_paths = vec![dir.path().to_path_buf()];
        loader
    }

    #[test]
    fn test_config_loader_creation() {
        let loader = ConfigLoader::new();
        assert!(!loader.search_paths().is_empty());
        assert_eq!(loader.env_prefix(), "TOPICAST");
    }

    #[test]
    fn test_config_loader_with_path_and_prefix() {
        let loader = ConfigLoader::new().with_path("/custom/path").with_env_prefix("TEST");
        assert!(loader.search_paths().contains(&PathBuf::from("/custom/path")));
        assert_eq!(loader.env_prefix(), "TEST");
    }

    #[test]
    fn test_defaults_without_sources() {
        let dir = TempDir::new().unwrap();
        let loaded: Sample = isolated_loader(&dir).load_with_env(no_env()).unwrap();
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("topicast.toml"), "[service]\nport = 8080\n").unwrap();

        let loaded: Sample = isolated_loader(&dir).load_with_env(no_env()).unwrap();
        assert_eq!(loaded.service.port, 8080);
        assert_eq!(loaded.service.name, "default");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[service]\nname = \"file\"\n").unwrap();

        let vars = vec![
            ("TOPICAST_SERVICE_NAME".to_string(), "env".to_string()),
            ("TOPICAST_VERBOSE".to_string(), "true".to_string()),
            ("OTHER_SERVICE_PORT".to_string(), "1".to_string()),
        ];
        let loaded: Sample = isolated_loader(&dir).load_with_env(vars).unwrap();

        assert_eq!(loaded.service.name, "env");
        assert_eq!(loaded.service.port, 80);
        assert!(loaded.verbose);
    }

    #[test]
    fn test_string_key_keeps_numeric_text() {
        let dir = TempDir::new().unwrap();
        let vars = vec![("TOPICAST_SERVICE_NAME".to_string(), "12345".to_string())];

        let loaded: Sample = isolated_loader(&dir)
            .with_string_key("service.name")
            .load_with_env(vars.clone())
            .unwrap();
        assert_eq!(loaded.service.name, "12345");

        let result: Result<Sample> = isolated_loader(&dir).load_with_env(vars);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let loader = ConfigLoader::new().with_file("/nonexistent/topicast.toml");
        let result: Result<Sample> = loader.load_with_env(no_env());
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[service\nport = ").unwrap();

        let result: Result<Sample> = ConfigLoader::new().load_from_file(&path);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_merge_config() {
        let loader = ConfigLoader::new();
        let base: toml::Value = toml::from_str::<toml::Table>("a = 1\n[t]\nx = 1\ny = 2\n")
            .map(toml::Value::Table)
            .unwrap();
        let over: toml::Value = toml::from_str::<toml::Table>("b = 2\n[t]\ny = 3\n")
            .map(toml::Value::Table)
            .unwrap();

        let merged = loader.merge_config(base, over);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(2));
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn test_parse_env_value() {
        let loader = ConfigLoader::new();

        assert_eq!(loader.parse_env_value("k", "true"), toml::Value::Boolean(true));
        assert_eq!(loader.parse_env_value("k", "42"), toml::Value::Integer(42));
        assert_eq!(loader.parse_env_value("k", "3.5"), toml::Value::Float(3.5));
        assert_eq!(loader.parse_env_value("k", "hello"), toml::Value::String("hello".to_string()));
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.toml");
        let loader = ConfigLoader::new();

        let original = Sample {
            verbose: true,
            service: ServiceSection { name: "saved".to_string(), port: 9000 },
        };
        loader.save_to_file(&original, &path).unwrap();

        let loaded: Sample = loader.load_from_file(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
