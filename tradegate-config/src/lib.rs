// Configuration management for Tradegate
//
// Sources are merged into one flat key space; later loads override earlier
// ones, so the usual order is file, then .env, then process environment.

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Main configuration manager
#[derive(Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::default(),
            env_prefix: Some(prefix.into()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Value>>> {
        self.config.read().map_err(|_| ConfigError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Value>>> {
        self.config.write().map_err(|_| ConfigError::LockPoisoned)
    }

    fn extend(&self, values: impl IntoIterator<Item = (String, Value)>) -> Result<()> {
        self.write()?.extend(values);
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(self.env_prefix.clone());
        self.extend(loader.load()?)
    }

    /// Load from an explicit variable list, filtered by this manager's prefix
    pub fn load_vars<I>(&self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let loader = EnvLoader::new(self.env_prefix.clone());
        self.extend(loader.load_from(vars))
    }

    /// Load a .env file into the process environment, then load the environment
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                // A missing default .env is not an error.
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Load configuration from a file, picking the format from its extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let loader = ConfigLoader::auto(path.as_ref())?;
        self.load_value(loader.load_file(path)?)
    }

    /// Merge the top-level keys of a parsed document
    pub fn load_value(&self, data: Value) -> Result<()> {
        match data {
            Value::Object(map) => self.extend(map),
            other => Err(ConfigError::ParseError(format!(
                "expected a table at the document root, found {}",
                other
            ))),
        }
    }

    /// Set a configuration value
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.write()?.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .read()?
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value).map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Check if a key exists
    pub fn has(&self, key: &str) -> bool {
        self.read().map(|c| c.contains_key(key)).unwrap_or(false)
    }

    /// Get all configuration keys
    pub fn keys(&self) -> Vec<String> {
        self.read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Merge configuration from another manager
    pub fn merge(&self, other: &ConfigManager) -> Result<()> {
        let snapshot: Vec<(String, Value)> = other
            .read()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.extend(snapshot)
    }

    /// Deserialize every key into `T` and validate it
    ///
    /// Fields missing from the store fall back to `T`'s serde defaults.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let json_value = Value::Object(
            self.read()?
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        let validated: T = serde_json::from_value(json_value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        validated.validate()?;

        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default = "default_ttl")]
        ttl: u64,
        role: String,
    }

    fn default_ttl() -> u64 {
        60
    }

    impl Validate for Sample {
        fn validate(&self) -> Result<()> {
            ConfigValidator::not_empty(&self.role, "role")
        }
    }

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("test_key", "test_value").unwrap();

        let value: String = manager.get("test_key").unwrap();
        assert_eq!(value, "test_value");
        assert!(manager.has("test_key"));
        assert!(!manager.has("missing"));
    }

    #[test]
    fn test_get_or_default() {
        let manager = ConfigManager::new();
        let value: u64 = manager.get_or("missing_key", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_vars_override_file_values() {
        let manager = ConfigManager::with_prefix("APP");
        manager
            .load_value(serde_json::json!({"ttl": 30, "role": "admin"}))
            .unwrap();
        manager
            .load_vars(vec![("APP_TTL".to_string(), "90".to_string())])
            .unwrap();

        let sample: Sample = manager.load_validated().unwrap();
        assert_eq!(sample.ttl, 90);
        assert_eq!(sample.role, "admin");
    }

    #[test]
    fn test_load_validated_applies_defaults_and_rules() {
        let manager = ConfigManager::new();
        manager.set("role", "").unwrap();
        assert!(matches!(
            manager.load_validated::<Sample>(),
            Err(ConfigError::ValidationError(_))
        ));

        manager.set("role", "ops").unwrap();
        let sample: Sample = manager.load_validated().unwrap();
        assert_eq!(sample.ttl, 60);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "role = \"staff\"\nttl = 15").unwrap();

        let manager = ConfigManager::new();
        manager.load_file(file.path()).unwrap();

        let sample: Sample = manager.load_validated().unwrap();
        assert_eq!(sample.role, "staff");
        assert_eq!(sample.ttl, 15);
    }

    #[test]
    fn test_non_table_root_is_rejected() {
        let manager = ConfigManager::new();
        assert!(manager.load_value(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_merge() {
        let base = ConfigManager::new();
        let overrides = ConfigManager::new();
        base.set("role", "admin").unwrap();
        overrides.set("role", "staff").unwrap();

        base.merge(&overrides).unwrap();
        assert_eq!(base.get::<String>("role").unwrap(), "staff");
        assert_eq!(base.keys(), vec!["role".to_string()]);
    }
}
