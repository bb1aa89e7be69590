use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::optimizer::OptimizerSettings;
use crate::service::ServiceSettings;
use crate::training::TrainingSettings;

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
    pub engine: RiskEngineConfig,
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
            engine: RiskEngineConfig::load()?,
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

const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(30);

/// Tuning for the route optimizer, the estimator trainer, and mission monitoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskEngineConfig {
    pub optimizer_population: usize,
    pub optimizer_generations: u32,
    pub optimizer_deadline: Option<Duration>,
    pub learning_rate: f64,
    pub training_step_cap: usize,
    /// Seeds the optimizer, trainer, and initial estimator when set.
    pub seed: Option<u64>,
    /// Period between progress sweeps over active missions.
    pub monitor_interval: Duration,
}

impl Default for RiskEngineConfig {
    fn default() -> Self {
        let optimizer = OptimizerSettings::default();
        let training = TrainingSettings::default();
        Self {
            optimizer_population: optimizer.population,
            optimizer_generations: optimizer.generations,
            optimizer_deadline: optimizer.deadline,
            learning_rate: training.learning_rate,
            training_step_cap: training.step_cap,
            seed: None,
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
        }
    }
}

impl RiskEngineConfig {
    fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let optimizer_population =
            parse_var("RISK_OPTIMIZER_POPULATION")?.unwrap_or(defaults.optimizer_population);
        if optimizer_population < 2 {
            return Err(ConfigError::InvalidEngineSetting {
                key: "RISK_OPTIMIZER_POPULATION",
            });
        }
        let optimizer_generations =
            parse_var("RISK_OPTIMIZER_GENERATIONS")?.unwrap_or(defaults.optimizer_generations);
        let optimizer_deadline = parse_var::<u64>("RISK_OPTIMIZER_DEADLINE_MS")?
            .map(Duration::from_millis)
            .or(defaults.optimizer_deadline);

        let learning_rate =
            parse_var::<f64>("RISK_TRAINING_RATE")?.unwrap_or(defaults.learning_rate);
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(ConfigError::InvalidEngineSetting {
                key: "RISK_TRAINING_RATE",
            });
        }
        let training_step_cap =
            parse_var("RISK_TRAINING_STEP_CAP")?.unwrap_or(defaults.training_step_cap);
        if training_step_cap == 0 {
            return Err(ConfigError::InvalidEngineSetting {
                key: "RISK_TRAINING_STEP_CAP",
            });
        }
        let seed = parse_var("RISK_SEED")?;

        let monitor_interval = parse_var::<u64>("RISK_MONITOR_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.monitor_interval);
        if monitor_interval.is_zero() {
            return Err(ConfigError::InvalidEngineSetting {
                key: "RISK_MONITOR_INTERVAL_SECS",
            });
        }

        Ok(Self {
            optimizer_population,
            optimizer_generations,
            optimizer_deadline,
            learning_rate,
            training_step_cap,
            seed,
            monitor_interval,
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            optimizer: OptimizerSettings {
                population: self.optimizer_population,
                generations: self.optimizer_generations,
                deadline: self.optimizer_deadline,
                seed: self.seed,
            },
            training: TrainingSettings {
                learning_rate: self.learning_rate,
                step_cap: self.training_step_cap,
                seed: self.seed,
            },
            estimator_seed: self.seed,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEngineSetting { key }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidEngineSetting { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidEngineSetting { key } => {
                write!(f, "{key} is not a usable value")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidEngineSetting { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
