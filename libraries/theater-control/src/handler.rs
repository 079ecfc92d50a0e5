//! Control & display binding
//!
//! One [`ControlHandler`] per viewer panel. It pulls authority state into the
//! panel once per tick, turns gestures into authority commands and accepts
//! display pushes from the authority through [`ControlCallbacks`].
//!
//! # Locking
//!
//! - `target` (which authority, plus a rebind generation) is only held long
//!   enough to clone the `Arc`
//! - `display` (the view and local display state) is held while writing
//!   widgets, never while issuing authority commands
//!
//! Lock order is `display` then `target`. Authority commands run with no lock
//! held, so an authority may push callbacks synchronously from inside a
//! command.

use crate::{
    config::ControlConfig,
    fitter::{FitScale, ScreenFitter},
    format::format_duration,
    lock::LockDisplay,
    view::ControlView,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
    Weak,
};
use theater_core::{
    Authority, ControlCallbacks, Participant, PlayerMode, Resolution, SessionContext, VideoError,
    VideoUrl,
};
use tracing::{debug, info};

/// Authority currently driven by a handler
struct Target {
    authority: Arc<dyn Authority>,

    /// Bumped on every rebind so in-flight refreshes can detect it
    generation: u64,
}

/// Display state owned by the handler
struct Display {
    view: Box<dyn ControlView>,
    current_status_text: String,
    fitter: ScreenFitter,
    last_known: Resolution,

    /// Whole second last written to the elapsed label
    last_time: Option<u64>,

    total_seconds: f32,
}

impl Display {
    /// Status line and its drop shadow, always identical
    fn show_status(&mut self, text: &str) {
        self.current_status_text = text.to_string();
        self.view.set_status_text(text);
        self.view.set_status_shadow_text(text);
    }
}

/// Re-entrancy guard for the refresh loop
struct FetchGuard<'a>(&'a AtomicBool);

impl<'a> FetchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn same_authority(a: &Arc<dyn Authority>, b: &Arc<dyn Authority>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Per-viewer binding between a control panel and an authority
pub struct ControlHandler {
    session: SessionContext,
    config: ControlConfig,
    target: RwLock<Target>,
    display: Mutex<Display>,
    dragging_slider: AtomicBool,
    fetching: AtomicBool,
    registered: AtomicBool,
    self_ref: Weak<ControlHandler>,
}

impl ControlHandler {
    /// Bind `view` to `authority` for the local participant of `session`
    ///
    /// Registers with the authority and draws owner, master and lock state
    /// before returning.
    pub fn new(
        session: SessionContext,
        authority: Arc<dyn Authority>,
        view: Box<dyn ControlView>,
        config: ControlConfig,
    ) -> Arc<Self> {
        let fitter = ScreenFitter::new(config.screen_fitter_size);

        let handler = Arc::new_cyclic(|self_ref| Self {
            session,
            config,
            target: RwLock::new(Target {
                authority,
                generation: 0,
            }),
            display: Mutex::new(Display {
                view,
                current_status_text: String::new(),
                fitter,
                last_known: Resolution::default(),
                last_time: None,
                total_seconds: 0.0,
            }),
            dragging_slider: AtomicBool::new(false),
            fetching: AtomicBool::new(false),
            registered: AtomicBool::new(false),
            self_ref: self_ref.clone(),
        });

        let authority = handler.authority();
        authority.register_control_handler(handler.callbacks_handle());
        handler.registered.store(true, Ordering::Release);
        info!(
            session = %handler.session.session_id,
            player = %handler.session.local_id(),
            "Control handler registered"
        );

        handler.update_master();
        handler.update_video_owner();
        handler
    }

    /// Session this handler belongs to
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Authority currently driven
    pub fn authority(&self) -> Arc<dyn Authority> {
        self.read_target().authority.clone()
    }

    /// Whether a refresh tick is in flight
    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::Acquire)
    }

    /// Whether the seek slider is being dragged by the owner
    pub fn is_dragging_slider(&self) -> bool {
        self.dragging_slider.load(Ordering::Acquire)
    }

    /// Status text last pushed or pulled
    pub fn current_status_text(&self) -> String {
        self.lock_display().current_status_text.clone()
    }

    /// Resolution last reported by the authority
    pub fn last_known_resolution(&self) -> Resolution {
        self.lock_display().last_known
    }

    // ========================================================================
    // Refresh loop
    // ========================================================================

    /// Pull authority state into the panel, once per UI tick
    ///
    /// Returns `false` when the tick was skipped: a refresh was already in
    /// flight, the panel was mid-draw, or the handler was rebound while this
    /// one was pulling. Skipped
    /// ticks are not queued; the next tick catches up.
    pub fn update(&self) -> bool {
        let Some(_guard) = FetchGuard::acquire(&self.fetching) else {
            return false;
        };

        let (authority, generation) = {
            let target = self.read_target();
            (target.authority.clone(), target.generation)
        };

        let status = authority.status_text();
        let looping = authority.is_looping();
        let muted = authority.is_muted();
        let volume = authority.volume();

        let mut display = match self.display.try_lock() {
            Ok(display) => display,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                debug!("Display busy, skipping tick");
                return false;
            }
        };
        if self.read_target().generation != generation {
            debug!("Handler rebound during refresh, discarding tick");
            return false;
        }

        display.show_status(&status);
        display.view.set_loop_color(if looping {
            self.config.colors.loop_on
        } else {
            self.config.colors.loop_off
        });
        display.view.set_mute_toggle(muted);
        display.view.set_volume_slider(volume);
        true
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// URL entered in the input field
    ///
    /// The authority decides whether a locked player accepts it.
    pub fn on_url_input(&self, url: &str) {
        self.authority().play_video(VideoUrl::new(url));
        self.lock_display().view.clear_url_input();
    }

    /// Play, pause or stop button
    pub fn on_play_button_press(&self) {
        let authority = self.authority();
        authority.set_paused(!authority.is_paused());
    }

    /// Lock button; privileged participants only
    pub fn on_lock_button_press(&self) {
        let authority = self.authority();
        if !authority.is_privileged_user(self.session.local_id()) {
            debug!(player = %self.session.local_id(), "Lock toggle declined, not privileged");
            return;
        }

        authority.take_ownership();
        authority.set_locked(!authority.is_locked());
    }

    /// Loop button; anyone may claim ownership to toggle it
    pub fn on_loop_button_pressed(&self) {
        let authority = self.authority();
        authority.take_ownership();
        authority.set_looping(!authority.is_looping());
    }

    pub fn on_reload_button_pressed(&self) {
        self.authority().reload();
    }

    /// Seek slider grabbed; only the owner may seek
    pub fn on_seek_slider_begin_drag(&self) {
        if self.is_local_owner(self.authority().as_ref()) {
            self.dragging_slider.store(true, Ordering::Release);
        } else {
            debug!(player = %self.session.local_id(), "Seek drag declined, not owner");
        }
    }

    pub fn on_seek_slider_end_drag(&self) {
        self.dragging_slider.store(false, Ordering::Release);
    }

    /// Seek slider moved to `value` out of `max_value`
    ///
    /// Ignored unless the owner is dragging, so progress updates written by
    /// the handler itself are never mistaken for seeks. The fraction sent is
    /// clamped to `[0, 1]`.
    pub fn on_seek_slider_changed(&self, value: f32, max_value: f32) {
        if !self.is_dragging_slider() {
            return;
        }

        if !max_value.is_finite() || max_value <= 0.0 || value.is_nan() {
            debug!(value, max_value, "Ignoring seek with unusable slider range");
            return;
        }

        self.authority().seek_to((value / max_value).clamp(0.0, 1.0));
    }

    pub fn on_volume_changed(&self, volume: f32) {
        self.authority().set_volume(volume);
    }

    pub fn on_mute_toggled(&self, muted: bool) {
        self.authority().set_muted(muted);
    }

    pub fn on_loop_toggled(&self, looping: bool) {
        self.authority().set_looping(looping);
    }

    /// Select the primary backend
    pub fn set_to_video_player(&self) {
        self.authority().set_to_video_player();
    }

    /// Select the secondary backend
    pub fn set_to_stream_player(&self) {
        self.authority().set_to_stream_player();
    }

    /// Mode button; switches to whichever backend is not active
    pub fn on_video_player_mode_button_pressed(&self) {
        match self.authority().player_mode().toggled() {
            PlayerMode::Video => self.set_to_video_player(),
            PlayerMode::Stream => self.set_to_stream_player(),
        }
    }

    // ========================================================================
    // Binding lifecycle
    // ========================================================================

    /// Drive a different authority
    ///
    /// Rebinding to the current authority does nothing. Otherwise the swap,
    /// status clear and drag reset happen under the display lock, so no
    /// refresh tick sees a half-rebound handler.
    pub fn set_controlled_video_player(&self, authority: Arc<dyn Authority>) {
        let previous = {
            let mut display = self.lock_display();
            let previous = {
                let mut target = self.write_target();
                if same_authority(&target.authority, &authority) {
                    return;
                }
                target.generation += 1;
                std::mem::replace(&mut target.authority, authority.clone())
            };

            self.dragging_slider.store(false, Ordering::Release);
            display.show_status("");
            display.last_time = None;
            previous
        };

        let handle = self.callbacks_handle();
        previous.unregister_control_handler(&handle);
        authority.register_control_handler(handle);
        self.registered.store(true, Ordering::Release);
        info!(session = %self.session.session_id, "Control handler rebound to new authority");

        self.update_video_owner();
        self.update_master();
    }

    /// Unregister from the authority; called on UI teardown and from `Drop`
    pub fn shutdown(&self) {
        if !self.registered.swap(false, Ordering::AcqRel) {
            return;
        }

        self.authority()
            .unregister_control_handler(&self.callbacks_handle());
        debug!(session = %self.session.session_id, "Control handler unregistered");
    }

    /// Restore the render surface scale from before the first fit
    pub fn reset_screen_fitter(&self) {
        let mut display = self.lock_display();
        let scale = display.fitter.reset();
        display.view.set_screen_fitter_scale(scale);
    }

    /// Change the container size used for aspect fitting and refit
    pub fn set_screen_fitter_size(&self, size: (f32, f32)) {
        let mut display = self.lock_display();
        display.fitter.set_size(size);
        let last_known = display.last_known;
        if let Some(scale) = display.fitter.fit(last_known) {
            display.view.set_screen_fitter_scale(scale);
        }
    }

    /// Current render surface scale
    pub fn screen_fitter_scale(&self) -> FitScale {
        self.lock_display().fitter.current()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn callbacks_handle(&self) -> Weak<dyn ControlCallbacks> {
        self.self_ref.clone()
    }

    fn is_local_owner(&self, authority: &dyn Authority) -> bool {
        authority
            .owner()
            .is_some_and(|owner| self.session.is_local(&owner))
    }

    fn update_video_owner(&self) {
        let authority = self.authority();
        if let Some(owner) = authority.owner() {
            self.lock_display().view.set_owner_name(&owner.display_name);
        }

        self.set_locked(authority.is_locked());
    }

    fn update_master(&self) {
        if let Some(master) = self.authority().master() {
            self.lock_display().view.set_master_name(&master.display_name);
        }
    }

    fn read_target(&self) -> RwLockReadGuard<'_, Target> {
        self.target.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_target(&self) -> RwLockWriteGuard<'_, Target> {
        self.target.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_display(&self) -> MutexGuard<'_, Display> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ControlCallbacks for ControlHandler {
    fn on_fetch_video_resolution(&self, width: u32, height: u32) {
        let resolution = Resolution::new(width, height);
        let mut display = self.lock_display();
        display.last_known = resolution;

        match display.fitter.fit(resolution) {
            Some(scale) => display.view.set_screen_fitter_scale(scale),
            None => debug!(width, height, "Ignoring degenerate video resolution"),
        }
    }

    fn set_status_text(&self, text: &str) {
        let mut display = self.lock_display();
        display.show_status(text);
        display.last_time = None;
    }

    fn set_paused(&self, paused: bool) {
        let video_mode = self.authority().is_in_video_mode();

        let mut display = self.lock_display();
        display.view.set_pause_icon_visible(video_mode);
        display.view.set_stop_icon_visible(!video_mode);
        display.view.set_play_visible(paused);
        display.view.set_pause_stop_visible(!paused);
    }

    fn set_locked(&self, locked: bool) {
        let authority = self.authority();
        let privileged = locked
            && (self.is_local_owner(authority.as_ref()) || authority.can_control_video_player());
        let master = authority
            .master()
            .or_else(|| authority.owner())
            .map(|p| p.display_name)
            .unwrap_or_default();

        let lock = LockDisplay::resolve(locked, privileged, &master, &self.config);

        let mut display = self.lock_display();
        display.view.set_lock_icons(lock.locked);
        display.view.set_lock_color(lock.color);
        display.view.set_url_placeholder(&lock.placeholder, lock.color);
    }

    fn set_elapsed_time(&self, seconds: f32) {
        let whole = if seconds.is_finite() && seconds > 0.0 {
            seconds as u64
        } else {
            0
        };

        let mut display = self.lock_display();
        if display.last_time == Some(whole) {
            return;
        }
        display.last_time = Some(whole);

        display.view.set_elapsed_text(&format_duration(seconds));
        if display.total_seconds > 0.0 && !self.is_dragging_slider() {
            let progress = (seconds / display.total_seconds).clamp(0.0, 1.0);
            display.view.set_progress(progress);
        }
    }

    fn set_total_time(&self, seconds: f32) {
        let mut display = self.lock_display();
        display.total_seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        display.view.set_total_text(&format_duration(seconds));
    }

    fn on_video_player_owner_transferred(&self) {
        self.update_video_owner();
    }

    fn on_player_left(&self, player: &Participant) {
        debug!(player = %player.id, "Participant left, refreshing master");
        self.update_master();
    }

    fn set_muted(&self, muted: bool) {
        self.lock_display().view.set_mute_toggle(muted);
    }

    fn set_volume(&self, volume: f32) {
        self.lock_display().view.set_volume_slider(volume);
    }

    fn set_player_mode(&self, mode: PlayerMode) {
        let colors = &self.config.colors;
        let (video, stream) = match mode {
            PlayerMode::Video => (colors.mode_active, colors.mode_inactive),
            PlayerMode::Stream => (colors.mode_inactive, colors.mode_active),
        };

        let mut display = self.lock_display();
        display.view.set_video_controls_visible(mode.is_video());
        display.view.set_stream_controls_visible(!mode.is_video());
        display.view.set_mode_button_colors(video, stream);
    }

    fn set_video_urls(&self, current: &VideoUrl, previous: &VideoUrl) {
        let mut display = self.lock_display();
        display.view.set_current_url(current.as_str());
        display.view.set_previous_url(previous.as_str());
    }

    fn set_error(&self, error: Option<VideoError>) {
        let mut display = self.lock_display();
        display.view.set_error_visible(error.is_some());
        display
            .view
            .set_error_message(error.map(VideoError::message).unwrap_or_default());
        display
            .view
            .set_error_retry_visible(error.is_some_and(VideoError::is_retryable));
    }
}

impl Drop for ControlHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ControlHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlHandler")
            .field("session", &self.session)
            .field("dragging_slider", &self.is_dragging_slider())
            .field("fetching", &self.is_fetching())
            .finish_non_exhaustive()
    }
}
