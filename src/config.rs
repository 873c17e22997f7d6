//! Configuration management for the `VoiceRelay` service
//!
//! Configuration is read once from the process environment (optionally seeded
//! from a `.env` file) and validated before the server starts. Missing API
//! keys abort startup.

use crate::VoiceRelayError;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_SESSION_URL: &str = "OPENAI_REALTIME_SESSION_URL";
pub const ENV_SERPER_API_KEY: &str = "SERPER_API_KEY";

/// Root configuration structure for the `VoiceRelay` service
#[derive(Debug, Clone)]
pub struct VoiceRelayConfig {
    /// Listener settings
    pub server: ServerConfig,
    /// Realtime speech API (session minting)
    pub realtime: RealtimeConfig,
    /// Open-Meteo endpoints
    pub weather: WeatherConfig,
    /// Serper search API
    pub search: SearchConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// `.env` file the environment was seeded from, if any
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Serve HTTPS when both files are configured
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Clone)]
pub struct RealtimeConfig {
    pub api_key: String,
    /// Full URL of the realtime session endpoint
    pub session_url: String,
    pub model: String,
}

/// Open-Meteo needs no key; both URLs are overridable for self-hosted mirrors.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub forecast_days: u8,
}

#[derive(Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Timeout for every outbound request, in seconds
    pub timeout_seconds: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Log format (pretty or json)
    pub format: String,
    /// Export spans over OTLP/HTTP
    pub otlp: bool,
}

// API keys are kept out of Debug output so config dumps are safe to log.
impl std::fmt::Debug for RealtimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeConfig")
            .field("api_key", &"<redacted>")
            .field("session_url", &self.session_url)
            .field("model", &self.model)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_realtime_model() -> String {
    "gpt-4o-realtime-preview-2024-12-17".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_forecast_days() -> u8 {
    7
}

fn default_search_base_url() -> String {
    "https://google.serper.dev".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("VoiceRelay/{}", crate::VERSION)
}

fn default_log_filter() -> String {
    "voicerelay=info,tower_http=info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl VoiceRelayConfig {
    /// Load configuration from `.env` (if present) and the process environment.
    ///
    /// Runs before logging is up, so the `.env` path is kept in
    /// [`VoiceRelayConfig::env_file`] for the caller to report.
    pub fn from_env() -> Result<Self> {
        let env_file = dotenvy::dotenv().ok();
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.env_file = env_file;
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).ok_or_else(|| {
                VoiceRelayError::config(format!("{key} not found in environment variables")).into()
            })
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let realtime_api_key = required(ENV_OPENAI_API_KEY)?;
        let search_api_key = required(ENV_SERPER_API_KEY)?;
        let session_url = required(ENV_SESSION_URL)?;

        let port = match optional("VOICERELAY_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid VOICERELAY_PORT: {raw}"))?,
            None => default_port(),
        };

        let timeout_seconds = match optional("VOICERELAY_HTTP_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("Invalid VOICERELAY_HTTP_TIMEOUT_SECONDS: {raw}"))?,
            None => default_timeout(),
        };

        let forecast_days = match optional("VOICERELAY_FORECAST_DAYS") {
            Some(raw) => raw
                .parse::<u8>()
                .with_context(|| format!("Invalid VOICERELAY_FORECAST_DAYS: {raw}"))?,
            None => default_forecast_days(),
        };

        let tls = match (
            optional("VOICERELAY_TLS_CERT"),
            optional("VOICERELAY_TLS_KEY"),
        ) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => {
                return Err(VoiceRelayError::config(
                    "VOICERELAY_TLS_CERT and VOICERELAY_TLS_KEY must be set together",
                )
                .into());
            }
        };

        let config = Self {
            server: ServerConfig {
                host: optional("VOICERELAY_HOST").unwrap_or_else(default_host),
                port,
                tls,
            },
            realtime: RealtimeConfig {
                api_key: realtime_api_key,
                session_url,
                model: optional("VOICERELAY_REALTIME_MODEL").unwrap_or_else(default_realtime_model),
            },
            weather: WeatherConfig {
                geocoding_url: optional("VOICERELAY_GEOCODING_URL")
                    .unwrap_or_else(default_geocoding_url),
                forecast_url: optional("VOICERELAY_FORECAST_URL")
                    .unwrap_or_else(default_forecast_url),
                forecast_days,
            },
            search: SearchConfig {
                api_key: search_api_key,
                base_url: optional("VOICERELAY_SEARCH_URL").unwrap_or_else(default_search_base_url),
            },
            http: HttpConfig {
                timeout_seconds,
                user_agent: default_user_agent(),
            },
            logging: LoggingConfig {
                filter: default_log_filter(),
                format: optional("VOICERELAY_LOG_FORMAT").unwrap_or_else(default_log_format),
                otlp: optional("OTEL_EXPORTER_OTLP_ENDPOINT").is_some(),
            },
            env_file: None,
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration with the given keys and every other setting defaulted
    #[must_use]
    pub fn with_keys(realtime_api_key: &str, session_url: &str, search_api_key: &str) -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                tls: None,
            },
            realtime: RealtimeConfig {
                api_key: realtime_api_key.to_string(),
                session_url: session_url.to_string(),
                model: default_realtime_model(),
            },
            weather: WeatherConfig {
                geocoding_url: default_geocoding_url(),
                forecast_url: default_forecast_url(),
                forecast_days: default_forecast_days(),
            },
            search: SearchConfig {
                api_key: search_api_key.to_string(),
                base_url: default_search_base_url(),
            },
            http: HttpConfig {
                timeout_seconds: default_timeout(),
                user_agent: default_user_agent(),
            },
            logging: LoggingConfig {
                filter: default_log_filter(),
                format: default_log_format(),
                otlp: false,
            },
            env_file: None,
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_api_keys(&self) -> Result<()> {
        if self.realtime.api_key.trim().is_empty() {
            return Err(VoiceRelayError::config(format!("{ENV_OPENAI_API_KEY} cannot be empty")).into());
        }
        if self.search.api_key.trim().is_empty() {
            return Err(VoiceRelayError::config(format!("{ENV_SERPER_API_KEY} cannot be empty")).into());
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(VoiceRelayError::config("HTTP timeout must be at least 1 second").into());
        }

        if self.http.timeout_seconds > 300 {
            return Err(VoiceRelayError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if !(1..=16).contains(&self.weather.forecast_days) {
            return Err(
                VoiceRelayError::config("Forecast days must be between 1 and 16").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(VoiceRelayError::config("VOICERELAY_HOST cannot be empty").into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(VoiceRelayError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Realtime session URL", &self.realtime.session_url),
            ("Geocoding URL", &self.weather.geocoding_url),
            ("Forecast URL", &self.weather.forecast_url),
            ("Search base URL", &self.search.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(VoiceRelayError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Resolve the listen address. `host` may be an IP literal or a hostname
    /// such as `localhost`; the first resolved address wins.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self.server.host.as_str();
        let port = self.server.port;
        tokio::net::lookup_host((host, port))
            .await
            .with_context(|| format!("Invalid listen address {host}:{port}"))?
            .next()
            .ok_or_else(|| {
                VoiceRelayError::config(format!("{host}:{port} did not resolve to any address"))
                    .into()
            })
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn required_env() -> HashMap<String, String> {
        env(&[
            (ENV_OPENAI_API_KEY, "sk-test"),
            (ENV_SERPER_API_KEY, "serper-test"),
            (
                ENV_SESSION_URL,
                "https://api.openai.com/v1/realtime/sessions",
            ),
        ])
    }

    fn load(vars: &HashMap<String, String>) -> Result<VoiceRelayConfig> {
        VoiceRelayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_from_minimal_env() {
        let config = load(&required_env()).unwrap();
        assert_eq!(config.server.port, 8888);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.tls.is_none());
        assert_eq!(config.realtime.model, "gpt-4o-realtime-preview-2024-12-17");
        assert_eq!(
            config.weather.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1/search"
        );
        assert_eq!(config.weather.forecast_days, 7);
        assert_eq!(config.search.base_url, "https://google.serper.dev");
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert!(!config.logging.otlp);
        assert!(config.env_file.is_none());
    }

    #[rstest]
    #[case(ENV_OPENAI_API_KEY)]
    #[case(ENV_SERPER_API_KEY)]
    #[case(ENV_SESSION_URL)]
    fn test_missing_required_key_fails(#[case] missing: &str) {
        let mut vars = required_env();
        vars.remove(missing);
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains(missing));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut vars = required_env();
        vars.insert(ENV_SERPER_API_KEY.to_string(), "  ".to_string());
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_overrides_are_applied() {
        let mut vars = required_env();
        vars.extend(env(&[
            ("VOICERELAY_PORT", "9000"),
            ("VOICERELAY_HTTP_TIMEOUT_SECONDS", "5"),
            ("VOICERELAY_SEARCH_URL", "http://127.0.0.1:4000"),
            ("VOICERELAY_LOG_FORMAT", "json"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318"),
        ]));
        let config = load(&vars).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.search.base_url, "http://127.0.0.1:4000");
        assert_eq!(config.logging.format, "json");
        assert!(config.logging.otlp);
    }

    #[rstest]
    #[case("VOICERELAY_PORT", "not-a-port", "Invalid VOICERELAY_PORT")]
    #[case("VOICERELAY_HTTP_TIMEOUT_SECONDS", "0", "at least 1 second")]
    #[case("VOICERELAY_HTTP_TIMEOUT_SECONDS", "500", "cannot exceed 300")]
    #[case("VOICERELAY_FORECAST_DAYS", "30", "between 1 and 16")]
    #[case("VOICERELAY_LOG_FORMAT", "xml", "Invalid log format")]
    #[case("VOICERELAY_GEOCODING_URL", "ftp://example.com", "HTTP or HTTPS")]
    #[case("VOICERELAY_TLS_CERT", "/etc/cert.pem", "must be set together")]
    fn test_invalid_values_rejected(#[case] key: &str, #[case] value: &str, #[case] expected: &str) {
        let mut vars = required_env();
        vars.insert(key.to_string(), value.to_string());
        let err = load(&vars).unwrap_err();
        assert!(
            format!("{err:#}").contains(expected),
            "expected '{expected}' in '{err:#}'"
        );
    }

    #[test]
    fn test_tls_pair_is_loaded() {
        let mut vars = required_env();
        vars.extend(env(&[
            ("VOICERELAY_TLS_CERT", "/etc/relay/cert.pem"),
            ("VOICERELAY_TLS_KEY", "/etc/relay/key.pem"),
        ]));
        let tls = load(&vars).unwrap().server.tls.unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("/etc/relay/cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("/etc/relay/key.pem"));
    }

    #[test]
    fn test_debug_output_redacts_keys() {
        let config = VoiceRelayConfig::with_keys("sk-secret", "https://example.com", "serper-secret");
        let dump = format!("{config:?}");
        assert!(!dump.contains("sk-secret"));
        assert!(!dump.contains("serper-secret"));
        assert!(dump.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_socket_addr() {
        let mut config = VoiceRelayConfig::with_keys("k", "https://example.com", "k");
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 8080;
        assert_eq!(config.socket_addr().await.unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_blank_host_rejected() {
        let mut config = VoiceRelayConfig::with_keys("k", "https://example.com", "k");
        config.server.host = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("VOICERELAY_HOST cannot be empty"));
    }

    #[tokio::test]
    async fn test_socket_addr_accepts_hostname() {
        let mut config = VoiceRelayConfig::with_keys("k", "https://example.com", "k");
        config.server.host = "localhost".to_string();
        config.server.port = 8080;
        let addr = config.socket_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }
}
