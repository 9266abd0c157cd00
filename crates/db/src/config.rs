//! Connection configuration.
//!
//! A run takes its database credentials either from `DB_*` environment
//! variables or from a complete connection string. Both resolve to a
//! [`ConnectionDescriptor`].

use std::fmt;

use tracing::debug;
use url::Url;

pub const DEFAULT_PORT: &str = "5432";

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set or empty")]
    MissingVar(&'static str),
    #[error("DB_PORT is not a valid port: {0:?}")]
    InvalidPort(String),
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),
}

/// Snapshot of the `DB_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct DbEnv {
    pub user: Option<String>,
    pub pass: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub name: Option<String>,
    pub sslmode: Option<String>,
}

impl DbEnv {
    /// Capture the variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture the variables through an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            user: lookup("DB_USER"),
            pass: lookup("DB_PASS"),
            host: lookup("DB_HOST"),
            port: lookup("DB_PORT"),
            name: lookup("DB_NAME"),
            sslmode: lookup("DB_SSLMODE"),
        }
    }

    fn resolve(&self) -> Result<ConnectionDescriptor, ConfigError> {
        let user = required("DB_USER", &self.user)?;
        let pass = required("DB_PASS", &self.pass)?;
        let host = required("DB_HOST", &self.host)?;
        let name = required("DB_NAME", &self.name)?;

        let port = match self.port.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PORT,
        };
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.to_string()))?;

        let mut url = Url::parse(&format!("postgresql://{}:{}", host, port))
            .map_err(|e| ConfigError::InvalidConnectionString(format!("DB_HOST {:?}: {}", host, e)))?;
        url.set_username(user)
            .and_then(|_| url.set_password(Some(pass)))
            .map_err(|_| ConfigError::InvalidConnectionString("cannot set credentials".into()))?;
        url.set_path(&format!("/{}", name));
        if let Some(mode) = self.sslmode.as_deref().filter(|m| !m.is_empty()) {
            url.query_pairs_mut().append_pair("sslmode", mode);
        }

        Ok(ConnectionDescriptor { url })
    }
}

fn required<'a>(key: &'static str, value: &'a Option<String>) -> Result<&'a str, ConfigError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

/// Where a run gets its database credentials from.
#[derive(Debug, Clone)]
pub enum ConnectionSource {
    /// Assemble the connection from `DB_*` variables.
    Environment(DbEnv),
    /// Use a complete `postgresql://` connection string.
    ConnectionString(String),
}

impl ConnectionSource {
    /// Resolve into a connection descriptor.
    ///
    /// Credentials are not checked here; a bad password only surfaces when
    /// connecting.
    pub fn resolve(&self) -> Result<ConnectionDescriptor, ConfigError> {
        let descriptor = match self {
            ConnectionSource::Environment(env) => env.resolve()?,
            ConnectionSource::ConnectionString(raw) => ConnectionDescriptor::parse(raw)?,
        };
        debug!("Resolved database connection {}", descriptor);
        Ok(descriptor)
    }
}

/// A resolved PostgreSQL connection string.
///
/// `Display` and `Debug` redact the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    url: Url,
}

impl ConnectionDescriptor {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidConnectionString(e.to_string()))?;
        match url.scheme() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(ConfigError::InvalidConnectionString(format!(
                    "unsupported scheme {:?}",
                    other
                )))
            }
        }
        Ok(Self { url })
    }

    /// The full connection string, including the password.
    pub fn connection_string(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn database(&self) -> &str {
        self.url.path().trim_start_matches('/')
    }

    /// The connection string with the password replaced by `***`.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        if url.password().is_some() {
            let _ = url.set_password(Some("***"));
        }
        url.to_string()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionDescriptor")
            .field(&self.redacted())
            .finish()
    }
}
