//! Environment-driven settings for both binaries. Call `dotenvy::dotenv()`
//! first so a local `.env` file is honoured.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_TUI_LOG: &str = "todo-tui.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let addr = lookup("TODO_SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let addr = addr.parse::<SocketAddr>().with_context(|| format!("invalid TODO_SERVER_ADDR `{addr}`"))?;
        Ok(Self { database_url, addr })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: lookup("TODO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            log_file: lookup("TODO_TUI_LOG").unwrap_or_else(|| DEFAULT_TUI_LOG.to_string()).into(),
        }
    }
}
