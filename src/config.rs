use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

use crate::column::ColumnId;
use crate::state::{is_renderable_date_format, DEFAULT_DATE_FORMAT};
use crate::theme::DisplayMode;

pub const DEFAULT_CONFIG_FILE: &str = "tasknest.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid date format {0:?}")]
    DateFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display_mode: DisplayMode,
    pub sample_tasks: bool,
    pub target_column: ColumnId,
    pub date_format: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Dark,
            sample_tasks: true,
            target_column: ColumnId::Todo,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            log_file: None,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub light: bool,
    pub no_samples: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Applies the flags that were given; absent flags keep the file value.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.light {
            self.display_mode = DisplayMode::Light;
        }
        if overrides.no_samples {
            self.sample_tasks = false;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    pub fn from_json(path: &Path, json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()
    }

    /// Rejects date formats chrono cannot render.
    fn validate(self) -> Result<Self, ConfigError> {
        if !is_renderable_date_format(&self.date_format) {
            return Err(ConfigError::DateFormat(self.date_format));
        }
        Ok(self)
    }

    /// Reads `path`. A missing file is an error only when `required` is set;
    /// otherwise defaults are returned.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(path, &json),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
