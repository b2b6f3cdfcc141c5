use serde::Deserialize;

/// Connection settings for the hosted backend.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend, e.g. `https://project.example.co`.
    pub backend_url: String,
    /// Public API key sent with every request.
    pub backend_api_key: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }
}
