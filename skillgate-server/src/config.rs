//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use skillgate_auth::{AuthConfig, ConfigError, DEFAULT_TIMESTAMP_TOLERANCE_SECS};

use crate::fetcher::DEFAULT_FETCH_TIMEOUT;

/// Address to listen on when `SKILLGATE_LISTEN` is unset.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket the HTTP server binds.
    pub listen: SocketAddr,
    /// Validated authentication parameters.
    pub auth: AuthConfig,
    /// Path of the certificate cache database; `None` disables caching.
    pub cache_db: Option<PathBuf>,
    /// Bound on one chain fetch.
    pub fetch_timeout: Duration,
}

/// Errors resolving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("SKILLGATE_APP_ID must be set to this skill's application id")]
    MissingAppId,

    #[error("invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),

    #[error(transparent)]
    Auth(#[from] ConfigError),
}

impl ServerConfig {
    /// Resolve configuration from process environment variables.
    ///
    /// `SKILLGATE_APP_ID` is required. `SKILLGATE_TIME_TOLERANCE_SECS`
    /// (default 60), `SKILLGATE_CACHE_DB`, `SKILLGATE_LISTEN`
    /// (default `127.0.0.1:8080`) and `SKILLGATE_FETCH_TIMEOUT_SECS`
    /// (default 10) are optional.
    ///
    /// # Errors
    ///
    /// `ServerConfigError` on a missing app id or any unparseable value;
    /// tolerance bounds are enforced by [`AuthConfig`].
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServerConfigError> {
        let app_id = lookup("SKILLGATE_APP_ID")
            .filter(|v| !v.is_empty())
            .ok_or(ServerConfigError::MissingAppId)?;

        let tolerance_secs = match lookup("SKILLGATE_TIME_TOLERANCE_SECS") {
            Some(raw) => raw.parse::<i64>().map_err(|e| {
                ServerConfigError::InvalidVar("SKILLGATE_TIME_TOLERANCE_SECS", e.to_string())
            })?,
            None => DEFAULT_TIMESTAMP_TOLERANCE_SECS,
        };
        let auth = AuthConfig::with_tolerance(app_id, tolerance_secs)?;

        let listen_raw = lookup("SKILLGATE_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen: SocketAddr = listen_raw
            .parse()
            .map_err(|_| ServerConfigError::InvalidVar("SKILLGATE_LISTEN", listen_raw.clone()))?;

        let cache_db = lookup("SKILLGATE_CACHE_DB")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let fetch_timeout = match lookup("SKILLGATE_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ServerConfigError::InvalidVar("SKILLGATE_FETCH_TIMEOUT_SECS", e.to_string())
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_FETCH_TIMEOUT,
        };

        Ok(Self {
            listen,
            auth,
            cache_db,
            fetch_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn minimal_configuration_uses_defaults() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("SKILLGATE_APP_ID", "amzn1.test")])).unwrap();

        assert_eq!(config.auth.application_id(), "amzn1.test");
        assert_eq!(config.auth.timestamp_tolerance_secs(), 60);
        assert_eq!(config.listen, DEFAULT_LISTEN.parse().unwrap());
        assert_eq!(config.cache_db, None);
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn missing_app_id_is_an_error_not_a_wildcard() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[])),
            Err(ServerConfigError::MissingAppId)
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[("SKILLGATE_APP_ID", "")])),
            Err(ServerConfigError::MissingAppId)
        ));
    }

    #[test]
    fn tolerance_above_platform_ceiling_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            ("SKILLGATE_APP_ID", "amzn1.test"),
            ("SKILLGATE_TIME_TOLERANCE_SECS", "151"),
        ]));
        assert!(matches!(result, Err(ServerConfigError::Auth(_))));
    }

    #[test]
    fn explicit_values_are_honored() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("SKILLGATE_APP_ID", "amzn1.test"),
            ("SKILLGATE_TIME_TOLERANCE_SECS", "150"),
            ("SKILLGATE_LISTEN", "0.0.0.0:9443"),
            ("SKILLGATE_CACHE_DB", "/var/lib/skillgate/chains.db"),
            ("SKILLGATE_FETCH_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.auth.timestamp_tolerance_secs(), 150);
        assert_eq!(config.listen, "0.0.0.0:9443".parse().unwrap());
        assert_eq!(
            config.cache_db.as_deref(),
            Some(std::path::Path::new("/var/lib/skillgate/chains.db"))
        );
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            ("SKILLGATE_APP_ID", "amzn1.test"),
            ("SKILLGATE_TIME_TOLERANCE_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(ServerConfigError::InvalidVar(_, _))));
    }
}
