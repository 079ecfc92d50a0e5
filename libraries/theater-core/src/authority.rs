//! Authority protocol
//!
//! The authority is the canonical synchronized player of a session. It owns
//! the [`AuthoritySnapshot`](crate::AuthoritySnapshot), enforces privilege and
//! replicates state between participants. This crate does not implement it;
//! it fixes the two surfaces the rest of the workspace talks through:
//!
//! - [`Authority`]: queries and commands consumed by control bindings
//! - [`ControlCallbacks`]: display pushes the authority sends to every
//!   registered binding
//!
//! Implementations must not hold internal locks while calling into
//! registered [`ControlCallbacks`], since bindings query the authority back
//! from inside those callbacks.

use crate::events::VideoError;
use crate::types::{Participant, PlayerId, PlayerMode, VideoUrl};
use std::sync::Weak;

/// Query and command surface of the canonical player
///
/// Commands never fail loudly. An authority that rejects a command (for
/// example a URL change while locked by someone else) simply leaves its state
/// unchanged; viewers pick up the unchanged state on their next refresh.
pub trait Authority: Send + Sync {
    // ========================================================================
    // Queries
    // ========================================================================

    fn status_text(&self) -> String;

    fn is_looping(&self) -> bool;

    fn is_paused(&self) -> bool;

    fn is_locked(&self) -> bool;

    fn is_muted(&self) -> bool;

    /// Output volume in `[0, 1]`
    fn volume(&self) -> f32;

    /// Backend currently selected
    fn player_mode(&self) -> PlayerMode;

    /// Whether the primary (video file) backend is selected
    fn is_in_video_mode(&self) -> bool {
        self.player_mode().is_video()
    }

    /// Whether `player` may lock and unlock the player
    fn is_privileged_user(&self, player: PlayerId) -> bool;

    /// Whether the local participant may issue locked commands right now
    fn can_control_video_player(&self) -> bool;

    /// Participant whose commands are canonical
    fn owner(&self) -> Option<Participant>;

    /// Room authority
    fn master(&self) -> Option<Participant>;

    // ========================================================================
    // Commands
    // ========================================================================

    /// Make the local participant the owner
    fn take_ownership(&self);

    fn set_locked(&self, locked: bool);

    fn set_looping(&self, looping: bool);

    fn set_paused(&self, paused: bool);

    /// Set output volume; the authority clamps to `[0, 1]`
    fn set_volume(&self, volume: f32);

    fn set_muted(&self, muted: bool);

    /// Seek to a fraction of the media duration, `[0, 1]`
    fn seek_to(&self, progress: f32);

    /// Load and play a URL
    fn play_video(&self, url: VideoUrl);

    /// Reload the current media
    fn reload(&self);

    /// Select the primary backend
    fn set_to_video_player(&self);

    /// Select the secondary backend
    fn set_to_stream_player(&self);

    // ========================================================================
    // Binding registry
    // ========================================================================

    /// Start pushing display updates to `handler`
    fn register_control_handler(&self, handler: Weak<dyn ControlCallbacks>);

    /// Stop pushing to `handler`; unknown handlers are ignored
    fn unregister_control_handler(&self, handler: &Weak<dyn ControlCallbacks>);
}

/// Display surface a control binding exposes to its authority
///
/// Every method is an idempotent push of one state dimension. Only display
/// state changes; none of these issue commands back to the authority.
pub trait ControlCallbacks: Send + Sync {
    /// A backend reported the resolution of the loaded media
    fn on_fetch_video_resolution(&self, width: u32, height: u32);

    fn set_status_text(&self, text: &str);

    fn set_paused(&self, paused: bool);

    fn set_locked(&self, locked: bool);

    /// Elapsed playback time in seconds
    fn set_elapsed_time(&self, seconds: f32);

    /// Media duration in seconds
    fn set_total_time(&self, seconds: f32);

    /// Ownership moved to another participant
    fn on_video_player_owner_transferred(&self);

    /// A participant left the session
    fn on_player_left(&self, player: &Participant);

    fn set_muted(&self, _muted: bool) {}

    fn set_volume(&self, _volume: f32) {}

    fn set_player_mode(&self, _mode: PlayerMode) {}

    fn set_video_urls(&self, _current: &VideoUrl, _previous: &VideoUrl) {}

    /// Show or clear the error panel
    fn set_error(&self, _error: Option<VideoError>) {}
}
