//! Control surface theme
//!
//! Colors and prompt texts used by the binding. Hosts usually load this from
//! their own configuration file; every field has a default.

use serde::{Deserialize, Serialize};
use theater_core::Color;

/// Placeholder token replaced by the master's display name
pub const MASTER_TOKEN: &str = "{master}";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControlConfig {
    #[serde(default)]
    pub colors: ControlColors,

    #[serde(default)]
    pub prompts: UrlPrompts,

    /// Size of the container the video is fitted into (width, height)
    #[serde(default = "default_screen_fitter_size")]
    pub screen_fitter_size: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControlColors {
    /// Lock graphic and prompt when the viewer may act
    #[serde(default = "default_neutral")]
    pub neutral: Color,

    /// Lock graphic and prompt when the viewer is locked out
    #[serde(default = "default_warning")]
    pub warning: Color,

    #[serde(default = "default_loop_on")]
    pub loop_on: Color,

    #[serde(default = "default_loop_off")]
    pub loop_off: Color,

    /// Background of the selected mode button
    #[serde(default = "default_mode_active")]
    pub mode_active: Color,

    #[serde(default = "default_mode_inactive")]
    pub mode_inactive: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UrlPrompts {
    /// Locked, viewer is owner or privileged
    #[serde(default = "default_locked_prompt")]
    pub locked: String,

    /// Locked, viewer lacks privilege; `{master}` is substituted
    #[serde(default = "default_master_only_prompt")]
    pub master_only: String,

    /// Unlocked
    #[serde(default = "default_unlocked_prompt")]
    pub unlocked: String,
}

impl UrlPrompts {
    /// Master-only prompt naming `master`
    pub fn master_only_for(&self, master: &str) -> String {
        self.master_only.replace(MASTER_TOKEN, master)
    }
}

// Default values
fn default_screen_fitter_size() -> (f32, f32) {
    (1920.0, 1080.0)
}

fn default_neutral() -> Color {
    Color::WHITE
}

fn default_warning() -> Color {
    Color::RED
}

fn default_loop_on() -> Color {
    Color::GREEN
}

fn default_loop_off() -> Color {
    Color::RED
}

fn default_mode_active() -> Color {
    Color::WHITE
}

fn default_mode_inactive() -> Color {
    Color::GRAY
}

fn default_locked_prompt() -> String {
    "Enter Video URL...".to_string()
}

fn default_master_only_prompt() -> String {
    format!("Only the master {MASTER_TOKEN} may add URLs")
}

fn default_unlocked_prompt() -> String {
    "Enter Video URL... (anyone)".to_string()
}

impl Default for ControlColors {
    fn default() -> Self {
        Self {
            neutral: default_neutral(),
            warning: default_warning(),
            loop_on: default_loop_on(),
            loop_off: default_loop_off(),
            mode_active: default_mode_active(),
            mode_inactive: default_mode_inactive(),
        }
    }
}

impl Default for UrlPrompts {
    fn default() -> Self {
        Self {
            locked: default_locked_prompt(),
            master_only: default_master_only_prompt(),
            unlocked: default_unlocked_prompt(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            colors: ControlColors::default(),
            prompts: UrlPrompts::default(),
            screen_fitter_size: default_screen_fitter_size(),
        }
    }
}
