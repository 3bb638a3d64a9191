//! Server bind address and storage backend selection.
//!
//! - `HOST` (default `0.0.0.0`) and `PORT` (default `3000`)
//! - `DATABASE_URL`: PostgreSQL connection string. When unset the server
//!   keeps its data in memory.

use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_has_no_database() {
        assert!(ServerConfig::default().database_url.is_none());
    }
}
