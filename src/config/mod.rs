mod file_config;

pub use file_config::{FileConfig, FixConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub fault_probability: f64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub fault_probability: f64,
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    match s.to_lowercase().as_str() {
        "none" => Some(RequestsLoggingLevel::None),
        "path" => Some(RequestsLoggingLevel::Path),
        "headers" => Some(RequestsLoggingLevel::Headers),
        "body" => Some(RequestsLoggingLevel::Body),
        _ => None,
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        if let Some(dir) = &frontend_dir_path {
            if !std::path::Path::new(dir).is_dir() {
                bail!("Frontend directory does not exist: {}", dir);
            }
        }

        let fault_probability = file
            .fix
            .and_then(|f| f.fault_probability)
            .unwrap_or(cli.fault_probability);
        if !(0.0..=1.0).contains(&fault_probability) {
            bail!(
                "fault_probability must be within 0.0-1.0, got {}",
                fault_probability
            );
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            fault_probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> CliConfig {
        CliConfig {
            port: 8000,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            frontend_dir_path: None,
            fault_probability: 0.0,
        }
    }

    #[test]
    fn cli_values_apply_without_a_file() {
        let config = AppConfig::resolve(&cli(), None).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.fault_probability, 0.0);
    }

    #[test]
    fn file_values_override_cli() {
        let file = FileConfig {
            port: Some(9000),
            logging_level: Some("none".to_string()),
            fix: Some(FixConfig {
                fault_probability: Some(0.5),
            }),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli(), Some(file)).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.logging_level, RequestsLoggingLevel::None);
        assert_eq!(config.fault_probability, 0.5);
    }

    #[test]
    fn out_of_range_fault_probability_is_rejected() {
        let file = FileConfig {
            fix: Some(FixConfig {
                fault_probability: Some(1.5),
            }),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli(), Some(file)).is_err());
    }

    #[test]
    fn missing_frontend_dir_is_rejected() {
        let mut args = cli();
        args.frontend_dir_path = Some("/definitely/not/here".to_string());
        assert!(AppConfig::resolve(&args, None).is_err());
    }
}
