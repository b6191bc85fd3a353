use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::{Ticker, ValidationError};

/// Environment variable naming the price CSV when `--data` is absent.
pub const DATA_PATH_ENV: &str = "CLOSEVIEW_DATA";
/// File looked up in the working directory when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "Datos.csv";
/// Tickers selected before the user picks any.
pub const DEFAULT_SELECTION: [&str; 2] = ["MA", "V"];
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Runtime configuration shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// CSV file holding the price dataset.
    pub data_path: PathBuf,
    /// Initial ticker selection; entries missing from the dataset are dropped later.
    pub default_selection: Vec<Ticker>,
    /// Envelope schema version stamped on every payload.
    pub schema_version: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::with_data_path(None)
    }
}

impl DashboardConfig {
    /// Resolve configuration, preferring an explicit path over the environment.
    pub fn with_data_path(explicit: Option<PathBuf>) -> Self {
        Self {
            data_path: resolve_data_path(explicit, env::var_os(DATA_PATH_ENV)),
            default_selection: default_selection(),
            schema_version: String::from(SCHEMA_VERSION),
        }
    }

    /// Replace the default selection with caller-supplied tickers.
    ///
    /// Blank entries are skipped, so an empty string clears the selection.
    pub fn with_default_selection<I, S>(mut self, tickers: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.default_selection = tickers
            .into_iter()
            .filter(|ticker| !ticker.as_ref().trim().is_empty())
            .map(|ticker| Ticker::parse(ticker.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }
}

fn resolve_data_path(explicit: Option<PathBuf>, from_env: Option<OsString>) -> PathBuf {
    if let Some(path) = explicit {
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(path) = from_env {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_selection() -> Vec<Ticker> {
    DEFAULT_SELECTION
        .iter()
        .filter_map(|ticker| Ticker::parse(ticker).ok())
        .collect()
}
