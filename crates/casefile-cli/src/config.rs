//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Default key-value store file.
pub const DEFAULT_SAVE_FILE: &str = "casefile-save.json";

/// Default pause between choosing an option and the scene changing.
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 300;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-line.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Configuration for one run of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalogue manifest; `None` plays the bundled missions.
    pub catalog: Option<PathBuf>,
    /// File holding saved progress and preferences.
    pub save_file: PathBuf,
    /// Debounce window between selection and transition.
    pub feedback_delay: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let catalog = lookup("CASEFILE_CATALOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let save_file = lookup("CASEFILE_SAVE_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE), PathBuf::from);
        let feedback_delay_ms = match lookup("CASEFILE_FEEDBACK_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("CASEFILE_FEEDBACK_DELAY_MS must be a whole number of milliseconds: {e}"))
            })?,
            None => DEFAULT_FEEDBACK_DELAY_MS,
        };
        let log_format = match lookup("CASEFILE_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("" | "pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "CASEFILE_LOG_FORMAT must be `pretty` or `json`, got `{other}`"
                )));
            }
        };

        Ok(Self {
            catalog,
            save_file,
            feedback_delay: Duration::from_millis(feedback_delay_ms),
            log_format,
        })
    }
}
