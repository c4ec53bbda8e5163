use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Bundled dataset loaded when no upload is active
    pub default_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Rows shown in sample and intensity tables
    pub sample_size: usize,
    /// Words listed per label in the word frequency section
    pub top_words: usize,
    /// Width in characters of the longest text bar
    pub bar_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_directory: String,
    pub file_name: String,
    pub default_format: String, // "csv" or "json"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                default_path: "data/econsult_comments_dataset.csv".to_string(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            dashboard: DashboardConfig {
                sample_size: 10,
                top_words: 15,
                bar_width: 40,
            },
            report: ReportConfig {
                output_directory: "./output".to_string(),
                file_name: "feedback_insights.csv".to_string(),
                default_format: "csv".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default`, `config/local`, the optional explicit file,
    /// and finally `FEEDBACK_*` environment variables (`__` separates sections).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize default configuration: {}", e))?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("FEEDBACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.data.default_path.trim().is_empty() {
            return Err(anyhow::anyhow!("data.default_path cannot be empty"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate dashboard config
        if self.dashboard.sample_size == 0 {
            return Err(anyhow::anyhow!("sample_size must be greater than 0"));
        }
        if self.dashboard.top_words == 0 {
            return Err(anyhow::anyhow!("top_words must be greater than 0"));
        }
        if !(10..=200).contains(&self.dashboard.bar_width) {
            return Err(anyhow::anyhow!("bar_width must be between 10 and 200"));
        }

        // Validate report config
        let valid_formats = ["csv", "json"];
        if !valid_formats.contains(&self.report.default_format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid report format: {}. Must be one of: {:?}",
                self.report.default_format,
                valid_formats
            ));
        }
        if self.report.file_name.trim().is_empty() {
            return Err(anyhow::anyhow!("report.file_name cannot be empty"));
        }

        Ok(())
    }

    /// Path of the bundled default dataset
    #[must_use]
    pub fn default_data_path(&self) -> PathBuf {
        PathBuf::from(&self.data.default_path)
    }

    /// Where a report is written when no explicit output path is given
    #[must_use]
    pub fn default_report_path(&self) -> PathBuf {
        Path::new(&self.report.output_directory).join(&self.report.file_name)
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.data.default_path, "data/econsult_comments_dataset.csv");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.dashboard.sample_size, 10);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.dashboard.top_words = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_report_path() {
        let config = AppConfig::default();
        assert_eq!(
            config.default_report_path(),
            Path::new("./output").join("feedback_insights.csv")
        );
    }
}
