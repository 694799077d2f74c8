use crate::core::appender::RetryPolicy;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub sheet: SheetConfig,
    pub retry: Option<RetryConfig>,
    pub idle: Option<IdleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Base URL of the spreadsheet, up to and including its id.
    pub endpoint: String,
    pub worksheet: String,
    /// Bearer token for the provider. Usually written as `${SHEETS_TOKEN}`
    /// in the file and substituted from the environment at load time.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub base_delay_seconds: Option<u64>,
    pub max_delay_seconds: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    pub timeout_seconds: Option<u64>,
    pub check_interval_seconds: Option<u64>,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::Io)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` references with environment values before the
    /// TOML parse, so secrets stay out of the file.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.push(var_name.to_string());
                    String::new()
                }
            }
        });

        if let Some(var) = missing.first() {
            return Err(RelayError::MissingConfig {
                field: format!("environment variable {}", var),
            });
        }

        Ok(result.into_owned())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        let retry = self.retry.as_ref();
        RetryPolicy {
            base_delay: retry
                .and_then(|r| r.base_delay_seconds)
                .map(Duration::from_secs)
                .unwrap_or(defaults.base_delay),
            max_delay: retry
                .and_then(|r| r.max_delay_seconds)
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_delay),
            max_attempts: retry
                .and_then(|r| r.max_attempts)
                .unwrap_or(defaults.max_attempts),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(
            self.idle
                .as_ref()
                .and_then(|i| i.timeout_seconds)
                .unwrap_or(300),
        )
    }

    pub fn idle_check_interval(&self) -> Duration {
        Duration::from_secs(
            self.idle
                .as_ref()
                .and_then(|i| i.check_interval_seconds)
                .unwrap_or(10),
        )
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("sheet.endpoint", &self.sheet.endpoint)?;
        validate_non_empty_string("sheet.worksheet", &self.sheet.worksheet)?;

        if let Some(retry) = &self.retry {
            if let Some(attempts) = retry.max_attempts {
                validate_range("retry.max_attempts", attempts, 1, 100)?;
            }
            if let (Some(base), Some(max)) = (retry.base_delay_seconds, retry.max_delay_seconds) {
                if base > max {
                    return Err(RelayError::InvalidConfigValue {
                        field: "retry.base_delay_seconds".to_string(),
                        value: base.to_string(),
                        reason: format!("base delay exceeds max delay ({})", max),
                    });
                }
            }
        }

        if let Some(idle) = &self.idle {
            if let Some(timeout) = idle.timeout_seconds {
                validate_range("idle.timeout_seconds", timeout, 1, 86_400)?;
            }
            if let Some(interval) = idle.check_interval_seconds {
                validate_range("idle.check_interval_seconds", interval, 1, 3_600)?;
            }
        }

        Ok(())
    }
}
