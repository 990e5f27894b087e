// src/config.rs
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3030;

#[derive(Clone, Debug)]
pub struct Config {
    /// Absent means every non-preflight request fails with a configuration error.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: non_blank(env::var("DATABASE_URL").ok()),
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_port(env::var("PORT").ok()),
        }
    }

    pub fn with_database_url(database_url: Option<String>) -> Self {
        Self {
            database_url: non_blank(database_url),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_port(value: Option<String>) -> u16 {
    match value {
        None => DEFAULT_PORT,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(port = %raw, "PORT is not a valid number, using {}", DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}
