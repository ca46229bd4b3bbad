//! Collector configuration.

use crate::collector::BATCH_SIZE;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the catalog list file.
pub const ENV_LIST_PATH: &str = "SDKBASE_LIST_PATH";
/// Environment variable naming the in-progress checkpoint file.
pub const ENV_CHECKPOINT_PATH: &str = "SDKBASE_CHECKPOINT_PATH";
/// Environment variable naming the finalized collection file.
pub const ENV_COLLECTION_PATH: &str = "SDKBASE_COLLECTION_PATH";
/// Optional environment variable overriding the batch size.
pub const ENV_BATCH_SIZE: &str = "SDKBASE_BATCH_SIZE";

/// Where a collector keeps its three stores and how much work one
/// `collect()` call may do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Authoritative catalog fetched from the vendor
    pub list_path: PathBuf,
    /// Partially collected records
    pub checkpoint_path: PathBuf,
    /// Last fully completed collection
    pub collection_path: PathBuf,
    /// Maximum items processed per `collect()` call
    pub batch_size: usize,
}

impl CollectorConfig {
    pub fn new(
        list_path: impl Into<PathBuf>,
        checkpoint_path: impl Into<PathBuf>,
        collection_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            list_path: list_path.into(),
            checkpoint_path: checkpoint_path.into(),
            collection_path: collection_path.into(),
            batch_size: BATCH_SIZE,
        }
    }

    /// Conventional layout for a collector called `name` inside `dir`:
    /// `<name>_list.json`, `<name>_collection_tmp.json` and
    /// `<name>_collection.json`.
    pub fn in_dir(dir: impl AsRef<Path>, name: &str) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(format!("{}_list.json", name)),
            dir.join(format!("{}_collection_tmp.json", name)),
            dir.join(format!("{}_collection.json", name)),
        )
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a `.env` file if one exists, then read the environment.
    pub fn from_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let list_path = required(ENV_LIST_PATH)?;
        let checkpoint_path = required(ENV_CHECKPOINT_PATH)?;
        let collection_path = required(ENV_COLLECTION_PATH)?;

        let batch_size = match lookup(ENV_BATCH_SIZE) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBatchSize(raw.clone()))?,
            None => BATCH_SIZE,
        };

        let config =
            Self::new(list_path, checkpoint_path, collection_path).with_batch_size(batch_size);
        config.validate()?;
        Ok(config)
    }

    /// Check that the batch size is usable and that no two stores share a path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size.to_string()));
        }

        let paths = [
            &self.list_path,
            &self.checkpoint_path,
            &self.collection_path,
        ];
        for (i, path) in paths.iter().enumerate() {
            if paths[i + 1..].contains(path) {
                return Err(ConfigError::SharedPath((*path).clone()));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid batch size: {0:?}")]
    InvalidBatchSize(String),

    #[error("stores must not share a path: {}", .0.display())]
    SharedPath(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn full_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_LIST_PATH, "/data/items_list.json"),
            (ENV_CHECKPOINT_PATH, "/data/items_tmp.json"),
            (ENV_COLLECTION_PATH, "/data/items.json"),
        ]
    }

    #[test]
    fn in_dir_layout() {
        let config = CollectorConfig::in_dir("/data", "students");
        assert_eq!(config.list_path, PathBuf::from("/data/students_list.json"));
        assert_eq!(
            config.checkpoint_path,
            PathBuf::from("/data/students_collection_tmp.json")
        );
        assert_eq!(
            config.collection_path,
            PathBuf::from("/data/students_collection.json")
        );
        assert_eq!(config.batch_size, BATCH_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_lookup_with_defaults() {
        let config = CollectorConfig::from_lookup(lookup_from(&full_vars())).unwrap();
        assert_eq!(config.list_path, PathBuf::from("/data/items_list.json"));
        assert_eq!(config.batch_size, 200);
    }

    #[test]
    fn from_lookup_batch_size_override() {
        let mut vars = full_vars();
        vars.push((ENV_BATCH_SIZE, " 50 "));

        let config = CollectorConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.batch_size, 50);
    }

    #[test]
    fn from_lookup_missing_variable() {
        let vars: Vec<_> = full_vars()
            .into_iter()
            .filter(|(k, _)| *k != ENV_CHECKPOINT_PATH)
            .collect();

        let err = CollectorConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_CHECKPOINT_PATH));
        assert_eq!(
            err.to_string(),
            "SDKBASE_CHECKPOINT_PATH environment variable is required"
        );
    }

    #[test]
    fn from_lookup_rejects_bad_batch_size() {
        for raw in ["zero", "-3", "0"] {
            let mut vars = full_vars();
            vars.push((ENV_BATCH_SIZE, raw));

            let result = CollectorConfig::from_lookup(lookup_from(&vars));
            assert!(
                matches!(result, Err(ConfigError::InvalidBatchSize(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn validate_rejects_shared_paths() {
        let config = CollectorConfig::new("a.json", "b.json", "a.json");
        assert_eq!(
            config.validate(),
            Err(ConfigError::SharedPath(PathBuf::from("a.json")))
        );

        let config = CollectorConfig::new("a.json", "b.json", "b.json");
        assert!(config.validate().is_err());
    }
}
