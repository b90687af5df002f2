use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

pub const DEFAULT_FUJI_SERVER_URL: &str = "http://fuji:1071/fuji/api/v1/evaluate";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentServiceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentServiceConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Basic-auth pair presented to the assessment service.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for the remote FAIR assessment service.
///
/// Built once at startup and handed to
/// [`AssessmentClient::new`](crate::assessment::AssessmentClient::new);
/// nothing reads these values from process state afterwards.
#[derive(Debug, Clone)]
pub struct AssessmentServiceConfig {
    pub endpoint: Url,
    pub credentials: Option<BasicCredentials>,
    pub use_github: bool,
    pub remote_logging: bool,
    pub timeout: Option<Duration>,
}

impl AssessmentServiceConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            credentials: None,
            use_github: true,
            remote_logging: true,
            timeout: None,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(BasicCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    fn from_env() -> Result<Self, ConfigError> {
        let raw_endpoint =
            env::var("FUJI_SERVER_URL").unwrap_or_else(|_| DEFAULT_FUJI_SERVER_URL.to_string());
        let endpoint = Url::parse(raw_endpoint.trim()).map_err(|source| {
            ConfigError::InvalidServiceUrl {
                value: raw_endpoint.clone(),
                source,
            }
        })?;

        let credentials = env::var("FUJI_USERNAME").ok().map(|username| BasicCredentials {
            username,
            password: env::var("FUJI_PASSWORD").unwrap_or_default(),
        });

        let use_github = parse_flag("FUJI_USE_GITHUB", true)?;
        let remote_logging = parse_flag("FUJI_REMOTE_LOGGING", true)?;

        let timeout = match env::var("FUJI_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout)?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            endpoint,
            credentials,
            use_github,
            remote_logging,
            timeout,
        })
    }
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidServiceUrl {
        value: String,
        source: url::ParseError,
    },
    InvalidFlag {
        name: &'static str,
        value: String,
    },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidServiceUrl { value, .. } => {
                write!(f, "FUJI_SERVER_URL '{}' is not a valid URL", value)
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
            ConfigError::InvalidTimeout => {
                write!(f, "FUJI_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidServiceUrl { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidTimeout => None,
        }
    }
}
