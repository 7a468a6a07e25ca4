use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, Logging, Server, Storage, StorageBackend};

/// Prefix for environment variable overrides, e.g. `CRYPTO__SERVER__PORT=9000`.
const ENV_PREFIX: &str = "CRYPTO";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the application configuration from the given file.
///
/// The file is read first and `CRYPTO__*` environment variables are layered on
/// top of it. The result is deserialized into our strongly-typed `Config` struct
/// and validated before it is returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("symbols")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.storage.backend == StorageBackend::Csv && config.storage.path.is_none() {
        return Err(ConfigError::ValidationError(
            "storage.path must be set when storage.backend is \"csv\"".to_string(),
        ));
    }
    Ok(())
}
