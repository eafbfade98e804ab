use color_eyre::eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Looked up in the working directory when no settings file is given.
pub const DEFAULT_SETTINGS_FILE: &str = "algodb.toml";

/// Optional defaults for the command line, in TOML format. Every key may be
/// omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where solution tables are written, one directory per scramble table.
    pub out_dir: PathBuf,
    /// How many progress ticks may queue up before search workers block.
    pub progress_capacity: usize,
    /// Milliseconds between two redraws of the progress bar.
    pub progress_interval: u64,
    pub time_limit_secs: Option<u64>,
    /// Render cubes with coloured stickers when writing to a terminal.
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            out_dir: PathBuf::from("db"),
            progress_capacity: 1000,
            progress_interval: 250,
            time_limit_secs: None,
            color: true,
        }
    }
}

impl Settings {
    /// Read the settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] if it
    /// exists, or fall back to the defaults.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Settings> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => Path::new(DEFAULT_SETTINGS_FILE),
            None => return Ok(Settings::default()),
        };
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read the settings file {}", path.display()))?;
        Settings::from_toml(&text)
            .wrap_err_with(|| format!("Failed to parse the settings file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> color_eyre::Result<Settings> {
        let settings = toml::from_str::<Settings>(text)?;
        if settings.progress_capacity == 0 {
            return Err(eyre!("`progress_capacity` must be at least 1"));
        }
        Ok(settings)
    }

    #[must_use]
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval)
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}
