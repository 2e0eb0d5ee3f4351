use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_city_population")]
    pub city_population: f64,
    #[serde(default)]
    pub standard_budget_unit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_format: Option<OutputFormat>,
    pub city_population: Option<f64>,
    pub standard_budget_unit: Option<f64>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/standard-block/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(format) = overrides.output_format {
            self.output.format = format;
        }
        if let Some(population) = overrides.city_population {
            self.audit.city_population = population;
        }
        if let Some(unit) = overrides.standard_budget_unit {
            self.audit.standard_budget_unit = Some(unit);
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[output]
format = "table"

[server]
host = "127.0.0.1"
port = 3001

[audit]
city_population = 435000.0
# Budget of one standard block, in yen.
# standard_budget_unit = 100000000.0

[logging]
filter = "warn"
"#;
        template.to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            city_population: default_city_population(),
            standard_budget_unit: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_city_population() -> f64 {
    crate::audit::DEFAULT_CITY_POPULATION
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("valid template");
        assert_eq!(parsed.output.format, OutputFormat::Table);
        assert_eq!(parsed.server.port, 3001);
        assert_eq!(parsed.audit.city_population, 435_000.0);
        assert!(parsed.audit.standard_budget_unit.is_none());
        assert_eq!(parsed.logging.filter, "warn");
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::load(Some(&dir.path().join("absent.toml"))).expect("defaults");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn partial_file_and_overrides() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested/config.toml");
        Config::write_template(&path).expect("template written");
        fs::write(&path, "[output]\nformat = \"json\"\n[audit]\nstandard_budget_unit = 5e7\n")
            .expect("config written");

        let mut config = Config::load(Some(&path)).expect("loads");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.audit.standard_budget_unit, Some(50_000_000.0));

        config.apply_overrides(ConfigOverrides {
            output_format: Some(OutputFormat::Csv),
            city_population: Some(1_000.0),
            standard_budget_unit: None,
        });
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.audit.city_population, 1_000.0);
        assert_eq!(config.audit.standard_budget_unit, Some(50_000_000.0));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nport = ").expect("config written");
        let err = Config::load(Some(&path)).expect_err("malformed");
        assert!(err.to_string().contains("failed parsing TOML config"));
    }
}
