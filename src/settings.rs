//! Runtime settings.
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional config file, `WEARWATCH_*` environment variables, and CLI flags
//! (applied by the binary).
//!
//! ```toml
//! endpoint = "http://pdm-gateway:5000"
//! connect_timeout = "5s"
//! request_timeout = "30s"
//! log_file = "/var/log/wearwatch.log"
//! ```
//!
//! The poll interval and window size are fixed and cannot be configured.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::source::{HttpHistorySource, DEFAULT_ENDPOINT};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Base URL of the prediction service.
    pub endpoint: String,
    /// TCP connect timeout, e.g. "5s". Unset means the client default.
    #[serde(default)]
    pub connect_timeout: Option<String>,
    /// Deadline for a whole `/history` request. Unset means no deadline.
    #[serde(default)]
    pub request_timeout: Option<String>,
    /// File to write logs to. Logging is off without one.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: None,
            request_timeout: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().set_default("endpoint", DEFAULT_ENDPOINT)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("WEARWATCH"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parsed connect timeout.
    pub fn connect_timeout(&self) -> Result<Option<Duration>> {
        self.connect_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
    }

    /// Parsed request timeout.
    pub fn request_timeout(&self) -> Result<Option<Duration>> {
        self.request_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()
    }

    /// Build the HTTP history source these settings describe.
    pub fn http_source(&self) -> Result<HttpHistorySource> {
        let mut builder = HttpHistorySource::builder().endpoint(self.endpoint.clone());
        if let Some(timeout) = self.connect_timeout()? {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout()? {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.endpoint, "http://localhost:5000");
        assert_eq!(settings.connect_timeout().unwrap(), None);
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(
            r#"
            endpoint = "http://pdm-gateway:5000"
            connect_timeout = "250ms"
            request_timeout = "2s"
            log_file = "/tmp/wearwatch.log"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.endpoint, "http://pdm-gateway:5000");
        assert_eq!(
            settings.connect_timeout().unwrap(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(
            settings.request_timeout().unwrap(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/wearwatch.log")));
    }

    #[test]
    fn test_load_partial_file_keeps_default_endpoint() {
        let file = toml_file(r#"connect_timeout = "5s""#);

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.connect_timeout, Some("5s".to_string()));
        assert!(!settings.endpoint.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/wearwatch.toml"))).is_err());
    }

    #[test]
    fn test_bad_timeout() {
        let settings = Settings {
            connect_timeout: Some("soon".to_string()),
            ..Settings::default()
        };
        assert!(settings.connect_timeout().is_err());
        assert!(settings.http_source().is_err());
    }

    #[test]
    fn test_http_source_from_settings() {
        let settings = Settings {
            endpoint: "http://pdm-gateway:5000/".to_string(),
            connect_timeout: Some("1s".to_string()),
            request_timeout: Some("100ms".to_string()),
            ..Settings::default()
        };

        let source = settings.http_source().unwrap();

        assert_eq!(source.endpoint(), "http://pdm-gateway:5000");
    }
}
