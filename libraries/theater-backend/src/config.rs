//! Backend adapter configuration

use serde::{Deserialize, Serialize};
use theater_core::PlayerMode;

/// Settings for [`VideoPlayerManager`](crate::VideoPlayerManager)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend selected by `start()`
    #[serde(default)]
    pub initial_mode: PlayerMode,

    /// Property-block slot the active backend's frame is bound to
    #[serde(default = "default_texture_property")]
    pub texture_property: String,
}

fn default_texture_property() -> String {
    "_MainTex".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            initial_mode: PlayerMode::default(),
            texture_property: default_texture_property(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.initial_mode, PlayerMode::Video);
        assert_eq!(config.texture_property, "_MainTex");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: BackendConfig = serde_json::from_str(r#"{"initial_mode":"stream"}"#).unwrap();
        assert_eq!(config.initial_mode, PlayerMode::Stream);
        assert_eq!(config.texture_property, "_MainTex");
    }
}
