//! Connection configuration

use serde::{Deserialize, Serialize};

use crate::platform::PlatformKind;
use crate::Result;

/// Configuration for a [`Connection`](crate::Connection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Database family.
    pub driver: PlatformKind,
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Database name, or the file path for SQLite.
    pub database: String,
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    /// Pool size.
    pub max_connections: u32,
    /// Keep the text of the last executed statement.
    pub store_last_built_query: bool,
    /// Log every statement at info level and keep the last one.
    pub debug: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            driver: PlatformKind::Mysql,
            host: "localhost".to_string(),
            port: None,
            username: None,
            password: None,
            database: String::new(),
            url: None,
            max_connections: 5,
            store_last_built_query: false,
            debug: false,
        }
    }
}

impl ConnectionConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the database family.
    pub fn driver(mut self, driver: PlatformKind) -> Self {
        self.driver = driver;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set user name and password.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Use a complete connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn store_last_built_query(mut self, enabled: bool) -> Self {
        self.store_last_built_query = enabled;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Whether the last statement text is retained.
    pub fn keeps_last_statement(&self) -> bool {
        self.store_last_built_query || self.debug
    }

    /// The sqlx connection URL.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.driver == PlatformKind::Sqlite {
            return if self.database.is_empty() {
                "sqlite::memory:".to_string()
            } else {
                format!("sqlite://{}", self.database)
            };
        }

        let mut url = format!("{}://", self.driver.scheme());
        if let Some(username) = &self.username {
            url.push_str(username);
            if let Some(password) = &self.password {
                url.push(':');
                url.push_str(password);
            }
            url.push('@');
        }
        url.push_str(&self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        if !self.database.is_empty() {
            url.push('/');
            url.push_str(&self.database);
        }
        url
    }
}
