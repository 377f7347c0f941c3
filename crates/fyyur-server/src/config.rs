use std::env;
use std::net::SocketAddr;

use fyyur_core::page::DEFAULT_PER_PAGE;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub questions_per_page: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind = env::var("FYYUR_BIND")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "invalid FYYUR_BIND, using default");
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        Self {
            bind,
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
            questions_per_page: env::var("QUESTIONS_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &u64| *n > 0)
                .unwrap_or(DEFAULT_PER_PAGE),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
