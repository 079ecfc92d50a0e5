//! In-memory session authority
//!
//! [`Room`] holds the canonical snapshot of one session and owns the backend
//! adapter. Every participant talks to it through a [`Seat`], which is the
//! [`Authority`] a viewer's control binding is bound to; the seat knows who
//! the local participant is, so privilege checks happen per seat.
//!
//! The room never holds its state lock while calling the adapter or pushing
//! to bindings. Bindings query the seat back from inside pushes, and the
//! adapter may relay backend events synchronously.

use crate::config::SessionSettings;
use crate::error::Result;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use theater_backend::VideoPlayerManager;
use theater_core::{
    Authority, AuthoritySnapshot, ControlCallbacks, CoreError, Participant, PlayerEvent, PlayerId,
    PlayerMode, Resolution, SessionId, VideoError, VideoEventReceiver, VideoUrl,
};
use tracing::{debug, info, warn};

struct RoomState {
    snapshot: AuthoritySnapshot,
    participants: Vec<Participant>,
    moderators: HashSet<PlayerId>,
    elapsed: f32,
    error: Option<VideoError>,
}

impl RoomState {
    fn is_privileged(&self, player: PlayerId) -> bool {
        self.snapshot.master.id == player || self.moderators.contains(&player)
    }

    fn can_control(&self, player: PlayerId) -> bool {
        !self.snapshot.is_locked || self.snapshot.owner.id == player || self.is_privileged(player)
    }

    fn effective_volume(&self) -> f32 {
        if self.snapshot.is_muted {
            0.0
        } else {
            self.snapshot.volume
        }
    }
}

/// Canonical player of one session
pub struct Room {
    session_id: SessionId,
    settings: SessionSettings,
    state: Mutex<RoomState>,
    handlers: Mutex<Vec<Weak<dyn ControlCallbacks>>>,
    manager: VideoPlayerManager,
}

impl Room {
    /// Open a session mastered by `master`, playing through `manager`
    ///
    /// Starts the adapter; fails if it has no backend for its initial mode.
    pub fn open(
        master: Participant,
        manager: VideoPlayerManager,
        settings: SessionSettings,
    ) -> Result<Arc<Self>> {
        let mut snapshot = AuthoritySnapshot::new(master.clone());
        snapshot.player_mode = manager.player_mode();

        let room = Arc::new_cyclic(|room: &Weak<Room>| {
            let receiver: Weak<dyn VideoEventReceiver> = room.clone();
            manager.set_receiver(receiver);

            Self {
                session_id: SessionId::generate(),
                settings,
                state: Mutex::new(RoomState {
                    snapshot,
                    participants: vec![master],
                    moderators: HashSet::new(),
                    elapsed: 0.0,
                    error: None,
                }),
                handlers: Mutex::new(Vec::new()),
                manager,
            }
        });

        room.manager.start()?;
        info!(session = %room.session_id, "Room opened");
        Ok(room)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Authority as seen by `participant`
    pub fn seat(self: &Arc<Self>, participant: Participant) -> Arc<Seat> {
        Arc::new(Seat {
            room: self.clone(),
            local: participant,
        })
    }

    /// Copy of the canonical state
    pub fn snapshot(&self) -> AuthoritySnapshot {
        self.lock_state().snapshot.clone()
    }

    /// Last backend error, cleared when new media loads
    pub fn error(&self) -> Option<VideoError> {
        self.lock_state().error
    }

    pub fn elapsed(&self) -> f32 {
        self.lock_state().elapsed
    }

    pub fn manager(&self) -> &VideoPlayerManager {
        &self.manager
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.lock_state().participants.clone()
    }

    /// Number of live registered bindings
    pub fn registered(&self) -> usize {
        self.lock_handlers()
            .iter()
            .filter(|h| h.strong_count() > 0)
            .count()
    }

    pub fn join(&self, participant: Participant) {
        info!(player = %participant.id, name = %participant.display_name, "Participant joined");
        let mut state = self.lock_state();
        if !state.participants.iter().any(|p| p.id == participant.id) {
            state.participants.push(participant);
        }
    }

    /// Let `player` lock and unlock the room
    pub fn promote(&self, player: PlayerId) -> Result<()> {
        let mut state = self.lock_state();
        if !state.participants.iter().any(|p| p.id == player) {
            return Err(CoreError::ParticipantNotFound(player).into());
        }
        state.moderators.insert(player);
        Ok(())
    }

    /// Remove `player`, handing ownership and mastership on if they held them
    pub fn leave(&self, player: PlayerId) -> Result<()> {
        let (left, owner_changed) = {
            let mut state = self.lock_state();
            let Some(index) = state.participants.iter().position(|p| p.id == player) else {
                return Err(CoreError::ParticipantNotFound(player).into());
            };
            let left = state.participants.remove(index);
            state.moderators.remove(&player);

            if state.snapshot.master.id == player {
                if let Some(next) = state.participants.first().cloned() {
                    info!(player = %next.id, "Master left, promoting next participant");
                    state.snapshot.master = next;
                }
            }

            let owner_changed = state.snapshot.owner.id == player;
            if owner_changed {
                state.snapshot.owner = state.snapshot.master.clone();
            }
            (left, owner_changed)
        };

        info!(player = %left.id, name = %left.display_name, "Participant left");
        self.push(|h| h.on_player_left(&left));
        if owner_changed {
            self.push(|h| h.on_video_player_owner_transferred());
        }
        Ok(())
    }

    /// Advance the simulation by `seconds`
    ///
    /// Forwards queued backend events first, then moves the playhead.
    /// Returns the number of backend events forwarded.
    pub fn tick(&self, seconds: f32) -> usize {
        let forwarded = self.manager.pump_events();

        let update = {
            let mut state = self.lock_state();
            if state.snapshot.is_paused || state.snapshot.current_url.is_empty() {
                None
            } else {
                let duration = self.settings.media_duration;
                state.elapsed += seconds;
                let mut ended = false;
                if state.elapsed >= duration {
                    if state.snapshot.is_looping {
                        state.elapsed = 0.0;
                    } else {
                        state.elapsed = duration;
                        state.snapshot.is_paused = true;
                        state.snapshot.status_text = "Ended".to_string();
                        ended = true;
                    }
                }
                Some((state.elapsed, ended))
            }
        };

        if let Some((elapsed, ended)) = update {
            self.push(|h| h.set_elapsed_time(elapsed));
            if ended {
                debug!("Media ended");
                self.push(|h| {
                    h.set_paused(true);
                    h.set_status_text("Ended");
                });
            }
        }

        forwarded
    }

    /// Push to every live binding, with no lock held
    fn push(&self, f: impl Fn(&dyn ControlCallbacks)) {
        let live: Vec<_> = {
            let mut handlers = self.lock_handlers();
            handlers.retain(|h| h.strong_count() > 0);
            handlers.iter().filter_map(Weak::upgrade).collect()
        };

        for handler in live {
            f(handler.as_ref());
        }
    }

    fn set_status(&self, status: &str) {
        self.lock_state().snapshot.status_text = status.to_string();
        self.push(|h| h.set_status_text(status));
    }

    fn resolution_for(&self, mode: PlayerMode) -> (u32, u32) {
        match mode {
            PlayerMode::Video => self.settings.video_resolution,
            PlayerMode::Stream => self.settings.stream_resolution,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_handlers(&self) -> MutexGuard<'_, Vec<Weak<dyn ControlCallbacks>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VideoEventReceiver for Room {
    fn on_video_event(&self, event: PlayerEvent) {
        debug!(event = event.name(), "Backend event");

        match event {
            PlayerEvent::Ready => {
                let (width, height) = {
                    let mut state = self.lock_state();
                    state.error = None;
                    let (width, height) = self.resolution_for(state.snapshot.player_mode);
                    state.snapshot.last_known_resolution = Resolution::new(width, height);
                    (width, height)
                };
                let duration = self.settings.media_duration;

                self.push(|h| {
                    h.set_error(None);
                    h.on_fetch_video_resolution(width, height);
                    h.set_total_time(duration);
                });
                self.set_status("Ready");
            }
            PlayerEvent::Start | PlayerEvent::Play => {
                self.lock_state().snapshot.is_paused = false;
                self.push(|h| h.set_paused(false));
                self.set_status("Playing");
            }
            PlayerEvent::Pause => {
                self.lock_state().snapshot.is_paused = true;
                self.push(|h| h.set_paused(true));
                self.set_status("Paused");
            }
            PlayerEvent::Stop => {
                {
                    let mut state = self.lock_state();
                    state.snapshot.is_paused = true;
                    state.elapsed = 0.0;
                }
                self.push(|h| {
                    h.set_paused(true);
                    h.set_elapsed_time(0.0);
                });
                self.set_status("Stopped");
            }
            PlayerEvent::Loop => {
                self.lock_state().elapsed = 0.0;
                self.push(|h| h.set_elapsed_time(0.0));
            }
            PlayerEvent::End => {
                self.lock_state().snapshot.is_paused = true;
                self.push(|h| h.set_paused(true));
                self.set_status("Ended");
            }
            PlayerEvent::Error(error) => {
                {
                    let mut state = self.lock_state();
                    state.error = Some(error);
                    state.snapshot.is_paused = true;
                }
                warn!(%error, "Backend reported an error");
                self.push(|h| {
                    h.set_error(Some(error));
                    h.set_paused(true);
                });
                self.set_status(error.message());
            }
        }
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("session_id", &self.session_id)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

/// One participant's view of a [`Room`]
pub struct Seat {
    room: Arc<Room>,
    local: Participant,
}

impl Seat {
    pub fn local(&self) -> &Participant {
        &self.local
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Whether the local participant may control the player; declines are logged
    fn gated(&self, op: &'static str) -> bool {
        let allowed = self.room.lock_state().can_control(self.local.id);
        if !allowed {
            debug!(op, player = %self.local.id, "Declined, player locked by another participant");
        }
        allowed
    }

    fn apply_volume(&self) {
        let volume = self.room.lock_state().effective_volume();
        self.room.manager.set_audio_volume(volume);
    }

    fn switch_mode(&self, mode: PlayerMode) {
        if !self.gated("set_player_mode") {
            return;
        }

        if !self.room.manager.set_player_mode(mode) {
            return;
        }

        let current = {
            let mut state = self.room.lock_state();
            state.snapshot.player_mode = mode;
            state.elapsed = 0.0;
            state.snapshot.current_url.clone()
        };

        self.room.push(|h| h.set_player_mode(mode));
        if !current.is_empty() {
            self.room.manager.set_video_url(&current);
            self.room.manager.play_video();
        }
    }
}

impl Authority for Seat {
    fn status_text(&self) -> String {
        self.room.lock_state().snapshot.status_text.clone()
    }

    fn is_looping(&self) -> bool {
        self.room.lock_state().snapshot.is_looping
    }

    fn is_paused(&self) -> bool {
        self.room.lock_state().snapshot.is_paused
    }

    fn is_locked(&self) -> bool {
        self.room.lock_state().snapshot.is_locked
    }

    fn is_muted(&self) -> bool {
        self.room.lock_state().snapshot.is_muted
    }

    fn volume(&self) -> f32 {
        self.room.lock_state().snapshot.volume
    }

    fn player_mode(&self) -> PlayerMode {
        self.room.lock_state().snapshot.player_mode
    }

    fn is_privileged_user(&self, player: PlayerId) -> bool {
        self.room.lock_state().is_privileged(player)
    }

    fn can_control_video_player(&self) -> bool {
        self.room.lock_state().can_control(self.local.id)
    }

    fn owner(&self) -> Option<Participant> {
        Some(self.room.lock_state().snapshot.owner.clone())
    }

    fn master(&self) -> Option<Participant> {
        Some(self.room.lock_state().snapshot.master.clone())
    }

    fn take_ownership(&self) {
        let changed = {
            let mut state = self.room.lock_state();
            if !state.can_control(self.local.id) {
                debug!(player = %self.local.id, "Ownership claim declined, room locked");
                return;
            }
            let changed = state.snapshot.owner.id != self.local.id;
            state.snapshot.owner = self.local.clone();
            changed
        };

        if changed {
            info!(player = %self.local.id, "Ownership transferred");
            self.room.push(|h| h.on_video_player_owner_transferred());
        }
    }

    fn set_locked(&self, locked: bool) {
        {
            let mut state = self.room.lock_state();
            if !state.is_privileged(self.local.id) {
                debug!(player = %self.local.id, "Lock change declined, not privileged");
                return;
            }
            state.snapshot.is_locked = locked;
        }

        info!(locked, player = %self.local.id, "Lock changed");
        self.room.push(|h| h.set_locked(locked));
    }

    fn set_looping(&self, looping: bool) {
        if self.gated("set_looping") {
            self.room.lock_state().snapshot.is_looping = looping;
        }
    }

    fn set_paused(&self, paused: bool) {
        if !self.gated("set_paused") {
            return;
        }

        if paused {
            self.room.manager.pause_video();
        } else {
            self.room.manager.play_video();
        }
    }

    fn set_volume(&self, volume: f32) {
        if !self.gated("set_volume") {
            return;
        }

        let volume = {
            let mut state = self.room.lock_state();
            state.snapshot.set_volume(volume);
            state.snapshot.volume
        };
        self.apply_volume();
        self.room.push(|h| h.set_volume(volume));
    }

    fn set_muted(&self, muted: bool) {
        if !self.gated("set_muted") {
            return;
        }

        self.room.lock_state().snapshot.is_muted = muted;
        self.apply_volume();
        self.room.push(|h| h.set_muted(muted));
    }

    fn seek_to(&self, progress: f32) {
        if !self.gated("seek_to") {
            return;
        }
        if progress.is_nan() {
            debug!("Ignoring seek to NaN");
            return;
        }

        let seconds = progress.clamp(0.0, 1.0) * self.room.settings.media_duration;
        self.room.lock_state().elapsed = seconds;
        self.room.manager.set_video_time(seconds);
        self.room.push(|h| h.set_elapsed_time(seconds));
    }

    fn play_video(&self, url: VideoUrl) {
        if url.is_empty() {
            debug!("Ignoring empty URL");
            return;
        }
        if !self.gated("play_video") {
            return;
        }

        let (current, previous) = {
            let mut state = self.room.lock_state();
            state.snapshot.push_url(url.clone());
            state.elapsed = 0.0;
            state.error = None;
            (
                state.snapshot.current_url.clone(),
                state.snapshot.previous_url.clone(),
            )
        };

        info!(url = %url, player = %self.local.id, "Loading URL");
        self.room.push(|h| h.set_video_urls(&current, &previous));
        self.room.set_status("Loading");
        self.room.manager.set_video_url(&url);
        self.room.manager.play_video();
    }

    fn reload(&self) {
        let current = self.room.lock_state().snapshot.current_url.clone();
        if current.is_empty() {
            return;
        }

        info!(url = %current, "Reloading");
        self.room.manager.set_video_url(&current);
        self.room.manager.play_video();
    }

    fn set_to_video_player(&self) {
        self.switch_mode(PlayerMode::Video);
    }

    fn set_to_stream_player(&self) {
        self.switch_mode(PlayerMode::Stream);
    }

    fn register_control_handler(&self, handler: Weak<dyn ControlCallbacks>) {
        self.room.lock_handlers().push(handler);
    }

    fn unregister_control_handler(&self, handler: &Weak<dyn ControlCallbacks>) {
        self.room
            .lock_handlers()
            .retain(|h| !Weak::ptr_eq(h, handler));
    }
}
