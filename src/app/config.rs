use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::generators::GeneratorKind;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "maze.toml";

/// Smallest width and height a configured maze can have.
const MIN_SIDE: u32 = 5;
/// Largest width and height a configured maze can have.
const MAX_SIDE: u32 = 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Run configuration as written in the config file.
///
/// Numbers are kept signed here so that out-of-range values can be read and then clamped by
/// [`Config::normalized`] instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: i64,
    pub height: i64,
    #[serde(rename = "type")]
    pub kind: GeneratorKind,
    /// 0 picks a random seed
    pub seed: i64,
    pub animate: bool,
    /// Milliseconds between two snapshots when animating
    pub animation_delay: i64,
    /// Report how long generation took
    pub timer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            kind: GeneratorKind::Dfs,
            seed: 0,
            animate: true,
            animation_delay: 0,
            timer: false,
        }
    }
}

/// A [`Config`] after clamping, ready to drive a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub kind: GeneratorKind,
    pub seed: u64,
    pub animate: bool,
    pub animation_delay: Duration,
    pub timer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().normalized()
    }
}

/// Negative numbers read as 0, numbers past `u32::MAX` saturate.
fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = content.parse::<Config>()?;
        tracing::info!("Loaded config from {path:?}");
        Ok(config)
    }

    /// Load `path` if given. Otherwise load [`DEFAULT_CONFIG_PATH`] when it exists, or fall
    /// back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Config::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            Config::load(default_path)
        } else {
            tracing::warn!("No config file found at {default_path:?}, using defaults");
            Ok(Config::default())
        }
    }

    /// Clamp the configured values into a usable range.
    ///
    /// Both sides are raised to 5 if either is smaller, each side is capped at 1024, and a side
    /// at least 3 times the other is cut down to twice the other.
    pub fn normalized(&self) -> Settings {
        let mut width = clamp_to_u32(self.width);
        let mut height = clamp_to_u32(self.height);
        if width < MIN_SIDE || height < MIN_SIDE {
            tracing::warn!("Maze size {width}x{height} too small, using {MIN_SIDE}x{MIN_SIDE}");
            width = MIN_SIDE;
            height = MIN_SIDE;
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            tracing::warn!("Maze size {width}x{height} too large, capping sides at {MAX_SIDE}");
            width = width.min(MAX_SIDE);
            height = height.min(MAX_SIDE);
        }
        if height / width >= 3 {
            tracing::warn!("Maze height {height} too large for width {width}, clamping");
            height = 2 * width;
        } else if width / height >= 3 {
            tracing::warn!("Maze width {width} too large for height {height}, clamping");
            width = 2 * height;
        }

        Settings {
            width,
            height,
            kind: self.kind,
            seed: self.seed.max(0).unsigned_abs(),
            animate: self.animate,
            animation_delay: Duration::from_millis(self.animation_delay.max(0).unsigned_abs()),
            timer: self.timer,
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
