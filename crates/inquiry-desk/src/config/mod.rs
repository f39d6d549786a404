use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the inquiry service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
    pub documents: DocumentConfig,
    pub assets: AssetConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig::load(environment)?,
            documents: DocumentConfig {
                output_dir: PathBuf::from(var_or("DOCUMENT_OUTPUT_DIR", "generated_docs")),
            },
            assets: AssetConfig {
                static_dir: PathBuf::from(var_or("FORM_STATIC_DIR", "public")),
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Fixed sender/recipient pair plus the optional SMTP relay.
///
/// Outside production an SMTP host is optional: without one the service only
/// logs the composed messages. Production refuses to start without a relay.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub to: String,
    pub smtp: Option<SmtpConfig>,
}

impl MailConfig {
    fn load(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let from = var_or("MAIL_FROM", "\"Microsite Inquiry\" <inquiries@localhost>");
        let to = var_or("MAIL_TO", "inbox@localhost");

        let smtp = match non_empty_var("SMTP_HOST") {
            Some(host) => {
                let port = var_or("SMTP_PORT", "587")
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidSmtpPort)?;
                let timeout = match non_empty_var("MAIL_TIMEOUT_SECS") {
                    Some(raw) => Some(Duration::from_secs(
                        raw.parse::<u64>()
                            .map_err(|_| ConfigError::InvalidTimeout { value: raw })?,
                    )),
                    None => None,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    username: non_empty_var("SMTP_USERNAME"),
                    password: non_empty_var("SMTP_PASSWORD"),
                    timeout,
                })
            }
            None if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingSmtpHost);
            }
            None => None,
        };

        Ok(Self { from, to, smtp })
    }
}

/// Connection details for the outbound SMTP relay.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where generated meeting briefs land.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub output_dir: PathBuf,
}

/// Static form assets served alongside the API.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub static_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSmtpPort,
    InvalidTimeout { value: String },
    MissingSmtpHost,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout { value } => {
                write!(f, "MAIL_TIMEOUT_SECS must be whole seconds, got '{value}'")
            }
            ConfigError::MissingSmtpHost => {
                write!(f, "SMTP_HOST is required when APP_ENV is production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSmtpPort
            | ConfigError::InvalidTimeout { .. }
            | ConfigError::MissingSmtpHost => None,
        }
    }
}
