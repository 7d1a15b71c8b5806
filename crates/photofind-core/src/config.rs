/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`, optionally override
/// [`Config::validate`], and call `Config::from_env()` once at startup.
/// The resulting struct is passed explicitly to whatever needs it.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Checks invariants serde cannot express (non-empty secrets, ranges).
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Load from an explicit set of `(KEY, value)` pairs.
    fn try_from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::from_iter(vars)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load from the process environment.
    fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_iter(std::env::vars())
    }

    /// # Panics
    ///
    /// Panics if any required env var is missing, cannot be deserialized, or
    /// fails [`Config::validate`].
    fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"))
    }
}
