use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Root of the annotated image tree (default: `Inspections`).
    pub inspections_root: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default       |
    /// |------------------------|---------------|
    /// | `HOST`                 | `0.0.0.0`     |
    /// | `PORT`                 | `8000`        |
    /// | `INSPECTIONS_ROOT`     | `Inspections` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let inspections_root =
            PathBuf::from(std::env::var("INSPECTIONS_ROOT").unwrap_or_else(|_| "Inspections".into()));

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            inspections_root,
            request_timeout_secs,
        }
    }
}
