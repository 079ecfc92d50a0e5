//! Widget surface of a control panel
//!
//! [`ControlView`] is what the binding draws into. A panel that lacks a widget
//! leaves the matching setter at its default no-op body, so the binding never
//! has to know which widgets exist.
//!
//! [`PanelView`] is a retained, in-memory panel holding the last value written
//! to every widget. Headless hosts render from its [`PanelState`]; tests read
//! it to see what a viewer would see.
//!
//! Setters are called while the binding holds its display lock. A view may
//! call [`ControlHandler::update`](crate::ControlHandler::update) from a setter
//! (the nested tick is skipped), but must not invoke gesture handlers
//! synchronously.

use crate::fitter::FitScale;
use std::sync::{Arc, Mutex, PoisonError};
use theater_core::Color;

/// Widgets of one viewer's control panel
#[allow(unused_variables)]
pub trait ControlView: Send {
    // Status line
    fn set_status_text(&mut self, text: &str) {}
    fn set_status_shadow_text(&mut self, text: &str) {}

    // Loop, mute and volume
    fn set_loop_color(&mut self, color: Color) {}
    fn set_mute_toggle(&mut self, muted: bool) {}
    fn set_volume_slider(&mut self, volume: f32) {}

    // Progress bar and time labels
    fn set_progress(&mut self, progress: f32) {}
    fn set_elapsed_text(&mut self, text: &str) {}
    fn set_total_text(&mut self, text: &str) {}

    // Lock button and URL field
    fn set_lock_icons(&mut self, locked: bool) {}
    fn set_lock_color(&mut self, color: Color) {}
    fn set_url_placeholder(&mut self, text: &str, color: Color) {}
    fn clear_url_input(&mut self) {}

    // Info panel
    fn set_owner_name(&mut self, name: &str) {}
    fn set_master_name(&mut self, name: &str) {}
    fn set_current_url(&mut self, url: &str) {}
    fn set_previous_url(&mut self, url: &str) {}

    // Play/pause/stop buttons
    fn set_play_visible(&mut self, visible: bool) {}
    fn set_pause_stop_visible(&mut self, visible: bool) {}
    fn set_pause_icon_visible(&mut self, visible: bool) {}
    fn set_stop_icon_visible(&mut self, visible: bool) {}

    // Video/stream mode
    fn set_video_controls_visible(&mut self, visible: bool) {}
    fn set_stream_controls_visible(&mut self, visible: bool) {}
    fn set_mode_button_colors(&mut self, video: Color, stream: Color) {}

    // Render surface
    fn set_screen_fitter_scale(&mut self, scale: FitScale) {}

    // Error panel
    fn set_error_visible(&mut self, visible: bool) {}
    fn set_error_message(&mut self, message: &str) {}
    fn set_error_retry_visible(&mut self, visible: bool) {}
}

/// Last value written to every widget
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    pub status_text: String,
    pub status_shadow_text: String,
    pub loop_color: Option<Color>,
    pub muted: bool,
    pub volume: f32,
    pub progress: f32,
    pub elapsed_text: String,
    pub total_text: String,
    pub locked_icon: bool,
    pub lock_color: Option<Color>,
    pub url_placeholder: String,
    pub url_placeholder_color: Option<Color>,
    pub url_input_clears: usize,
    pub owner_name: String,
    pub master_name: String,
    pub current_url: String,
    pub previous_url: String,
    pub play_visible: bool,
    pub pause_stop_visible: bool,
    pub pause_icon_visible: bool,
    pub stop_icon_visible: bool,
    pub video_controls_visible: bool,
    pub stream_controls_visible: bool,
    pub mode_button_colors: Option<(Color, Color)>,
    pub screen_fitter_scale: FitScale,
    pub error_visible: bool,
    pub error_message: String,
    pub error_retry_visible: bool,

    /// Total widget writes, for spotting redundant redraws
    pub writes: usize,
}

/// Retained in-memory panel
///
/// Cloning shares the underlying state, so a host can keep a handle while the
/// binding owns the boxed view.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    state: Arc<Mutex<PanelState>>,
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every widget's current value
    pub fn state(&self) -> PanelState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, f: impl FnOnce(&mut PanelState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
        state.writes += 1;
    }
}

impl ControlView for PanelView {
    fn set_status_text(&mut self, text: &str) {
        self.write(|s| s.status_text = text.to_string());
    }

    fn set_status_shadow_text(&mut self, text: &str) {
        self.write(|s| s.status_shadow_text = text.to_string());
    }

    fn set_loop_color(&mut self, color: Color) {
        self.write(|s| s.loop_color = Some(color));
    }

    fn set_mute_toggle(&mut self, muted: bool) {
        self.write(|s| s.muted = muted);
    }

    fn set_volume_slider(&mut self, volume: f32) {
        self.write(|s| s.volume = volume);
    }

    fn set_progress(&mut self, progress: f32) {
        self.write(|s| s.progress = progress);
    }

    fn set_elapsed_text(&mut self, text: &str) {
        self.write(|s| s.elapsed_text = text.to_string());
    }

    fn set_total_text(&mut self, text: &str) {
        self.write(|s| s.total_text = text.to_string());
    }

    fn set_lock_icons(&mut self, locked: bool) {
        self.write(|s| s.locked_icon = locked);
    }

    fn set_lock_color(&mut self, color: Color) {
        self.write(|s| s.lock_color = Some(color));
    }

    fn set_url_placeholder(&mut self, text: &str, color: Color) {
        self.write(|s| {
            s.url_placeholder = text.to_string();
            s.url_placeholder_color = Some(color);
        });
    }

    fn clear_url_input(&mut self) {
        self.write(|s| s.url_input_clears += 1);
    }

    fn set_owner_name(&mut self, name: &str) {
        self.write(|s| s.owner_name = name.to_string());
    }

    fn set_master_name(&mut self, name: &str) {
        self.write(|s| s.master_name = name.to_string());
    }

    fn set_current_url(&mut self, url: &str) {
        self.write(|s| s.current_url = url.to_string());
    }

    fn set_previous_url(&mut self, url: &str) {
        self.write(|s| s.previous_url = url.to_string());
    }

    fn set_play_visible(&mut self, visible: bool) {
        self.write(|s| s.play_visible = visible);
    }

    fn set_pause_stop_visible(&mut self, visible: bool) {
        self.write(|s| s.pause_stop_visible = visible);
    }

    fn set_pause_icon_visible(&mut self, visible: bool) {
        self.write(|s| s.pause_icon_visible = visible);
    }

    fn set_stop_icon_visible(&mut self, visible: bool) {
        self.write(|s| s.stop_icon_visible = visible);
    }

    fn set_video_controls_visible(&mut self, visible: bool) {
        self.write(|s| s.video_controls_visible = visible);
    }

    fn set_stream_controls_visible(&mut self, visible: bool) {
        self.write(|s| s.stream_controls_visible = visible);
    }

    fn set_mode_button_colors(&mut self, video: Color, stream: Color) {
        self.write(|s| s.mode_button_colors = Some((video, stream)));
    }

    fn set_screen_fitter_scale(&mut self, scale: FitScale) {
        self.write(|s| s.screen_fitter_scale = scale);
    }

    fn set_error_visible(&mut self, visible: bool) {
        self.write(|s| s.error_visible = visible);
    }

    fn set_error_message(&mut self, message: &str) {
        self.write(|s| s.error_message = message.to_string());
    }

    fn set_error_retry_visible(&mut self, visible: bool) {
        self.write(|s| s.error_retry_visible = visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let panel = PanelView::new();
        let mut boxed: Box<dyn ControlView> = Box::new(panel.clone());

        boxed.set_owner_name("Host");
        boxed.set_url_placeholder("Paste", Color::RED);

        let state = panel.state();
        assert_eq!(state.owner_name, "Host");
        assert_eq!(state.url_placeholder_color, Some(Color::RED));
        assert_eq!(state.writes, 2);
    }

    #[test]
    fn missing_widgets_are_noops() {
        struct StatusOnly(String);

        impl ControlView for StatusOnly {
            fn set_status_text(&mut self, text: &str) {
                self.0 = text.to_string();
            }
        }

        let mut view = StatusOnly(String::new());
        view.set_status_text("Loading");
        view.set_lock_icons(true);
        view.set_screen_fitter_scale(FitScale::ONE);

        assert_eq!(view.0, "Loading");
    }
}
