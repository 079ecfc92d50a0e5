/// Demo configuration
use crate::error::{DemoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use theater_backend::BackendConfig;
use theater_control::ControlConfig;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "theater.toml";

/// Prefix of environment overrides, e.g. `THEATER_SESSION__TICKS=20`
pub const ENV_PREFIX: &str = "THEATER";

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub control: ControlConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Display name of the participant who opens the session
    #[serde(default = "default_master_name")]
    pub master_name: String,

    /// Participants joining after the master
    #[serde(default = "default_viewers")]
    pub viewers: Vec<String>,

    /// URL the master plays first
    #[serde(default = "default_url")]
    pub url: String,

    /// Length of every simulated media item, in seconds
    #[serde(default = "default_media_duration")]
    pub media_duration: f32,

    /// Simulated time per tick, in seconds
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f32,

    #[serde(default = "default_ticks")]
    pub ticks: u32,

    /// Resolution the video file backend reports
    #[serde(default = "default_video_resolution")]
    pub video_resolution: (u32, u32),

    /// Resolution the stream backend reports
    #[serde(default = "default_stream_resolution")]
    pub stream_resolution: (u32, u32),
}

impl DemoConfig {
    /// Load from `path` (or `theater.toml` if present) and `THEATER_*`
    /// environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Self::environment())
    }

    /// Load from `path` and an explicit environment source
    pub fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(env);

        let config = settings
            .build()
            .map_err(|e| DemoError::Config(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| DemoError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Environment source for `THEATER_SECTION__FIELD` variables
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let session = &self.session;

        if session.master_name.trim().is_empty() {
            return Err(DemoError::Config("master_name must not be empty".to_string()));
        }

        if session.media_duration.is_nan() || session.media_duration <= 0.0 {
            return Err(DemoError::Config(format!(
                "media_duration must be positive, got {}",
                session.media_duration
            )));
        }

        if session.tick_seconds.is_nan() || session.tick_seconds <= 0.0 {
            return Err(DemoError::Config(format!(
                "tick_seconds must be positive, got {}",
                session.tick_seconds
            )));
        }

        Ok(())
    }
}

// Default values
fn default_master_name() -> String {
    "Host".to_string()
}

fn default_viewers() -> Vec<String> {
    vec!["Alice".to_string(), "Bob".to_string()]
}

fn default_url() -> String {
    "https://media.example.com/trailer.mp4".to_string()
}

fn default_media_duration() -> f32 {
    90.0
}

fn default_tick_seconds() -> f32 {
    0.5
}

fn default_ticks() -> u32 {
    12
}

fn default_video_resolution() -> (u32, u32) {
    (1280, 720)
}

fn default_stream_resolution() -> (u32, u32) {
    (1440, 1080)
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            master_name: default_master_name(),
            viewers: default_viewers(),
            url: default_url(),
            media_duration: default_media_duration(),
            tick_seconds: default_tick_seconds(),
            ticks: default_ticks(),
            video_resolution: default_video_resolution(),
            stream_resolution: default_stream_resolution(),
        }
    }
}
