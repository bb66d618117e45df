use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::lawyers::verification::DEFAULT_LICENSE_URL_TTL_SECS;
use crate::reviews::SubmissionPolicy;

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
    pub submissions: SubmissionConfig,
    pub admin_seed: Option<AdminSeedConfig>,
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

        let submissions = SubmissionConfig {
            company_requires_verification: flag("APP_COMPANY_REQUIRES_VERIFICATION", false)?,
            interview_requires_verification: flag("APP_INTERVIEW_REQUIRES_VERIFICATION", true)?,
            revise_resets_status: flag("APP_REVISE_RESETS_STATUS", true)?,
            license_url_ttl_secs: match env::var("APP_LICENSE_URL_TTL_SECS") {
                Ok(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTtl)?,
                Err(_) => DEFAULT_LICENSE_URL_TTL_SECS,
            },
        };

        let admin_seed = match (env::var("APP_ADMIN_EMAIL"), env::var("APP_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeedConfig { email, password }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            submissions,
            admin_seed,
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

/// Submission-policy dials and the license-link TTL.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub company_requires_verification: bool,
    pub interview_requires_verification: bool,
    pub revise_resets_status: bool,
    pub license_url_ttl_secs: u64,
}

impl SubmissionConfig {
    pub fn policy(&self) -> SubmissionPolicy {
        SubmissionPolicy {
            company_requires_verification: self.company_requires_verification,
            interview_requires_verification: self.interview_requires_verification,
            revise_resets_status: self.revise_resets_status,
        }
    }
}

/// Admin account seeded into the in-memory adapters at startup.
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: String,
}

fn flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { key: &'static str },
    InvalidTtl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { key } => {
                write!(f, "{key} must be a boolean (true/false)")
            }
            ConfigError::InvalidTtl => {
                write!(f, "APP_LICENSE_URL_TTL_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
