use crate::fomo::rotator::RotatorConfig;

/// Runtime configuration, read from the environment (a `.env` file is
/// honoured). There is deliberately no CLI surface.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// When set, records live in sqlite instead of the in-memory mock store.
    pub database_url: Option<String>,
    /// Simulated per-operation latency on the mock store, so the UI's
    /// loading states stay exercised during local development.
    pub mock_latency: bool,
    pub rotator: RotatorConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned()),
            database_url: dotenv::var("DATABASE_URL").ok(),
            mock_latency: dotenv::var("MOCK_LATENCY")
                .map(|v| !matches!(v.as_str(), "0" | "false" | "off"))
                .unwrap_or(true),
            rotator: RotatorConfig::default(),
        }
    }
}
