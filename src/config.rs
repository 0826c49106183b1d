//! Application-level configuration loading: which storage backend to use and which collection
//! holds the plate records.

use std::{env, fmt, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PLATE_REGISTRY_CONFIG_PATH";
/// Collection (or CouchDB database) holding plate records when none is configured.
pub const DEFAULT_COLLECTION: &str = "vehicles";

/// Storage backend the supervisor connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MongoDB, configured through `MONGO_URI` and `MONGO_DB`.
    Mongo,
    /// CouchDB, configured through the `COUCH_*` variables.
    Couch,
    /// Process-local store; records are lost on restart.
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        if cfg!(feature = "mongo-store") {
            StoreBackend::Mongo
        } else if cfg!(feature = "couch-store") {
            StoreBackend::Couch
        } else {
            StoreBackend::Memory
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreBackend::Mongo => "mongo",
            StoreBackend::Couch => "couch",
            StoreBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    collection: String,
    store: StoreBackend,
}

impl AppConfig {
    /// Build a configuration explicitly, bypassing the file lookup.
    pub fn new(collection: impl Into<String>, store: StoreBackend) -> Self {
        Self {
            collection: collection.into(),
            store,
        }
    }

    /// Load the application configuration from disk, falling back to the built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        collection = %app_config.collection,
                        store = %app_config.store,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Name of the collection plate records are written to and read from.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Storage backend selected for this process.
    pub fn store(&self) -> StoreBackend {
        self.store
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION, StoreBackend::default())
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    collection: Option<String>,
    #[serde(default)]
    store: Option<StoreBackend>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let collection = value
            .collection
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_owned());
        Self::new(collection, value.store.unwrap_or_default())
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
