use serde::Deserialize;

/// Configuration options for the catalog server, loaded from `config/*.yaml`
/// and `APP_*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Secret used to sign flash-message cookies. At least 64 bytes.
    pub secret: String,
    /// Glob Tera loads templates from.
    pub templates_dir: String,
}
