//! Shared fakes for binding tests
//!
//! `FakeAuthority` records every command in call order and pushes display
//! updates to registered bindings synchronously, without holding its own
//! locks, the way a real authority must.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Once, OnceLock, Weak};
use theater_control::{ControlConfig, ControlHandler, ControlView, FitScale, PanelView};
use theater_core::{
    Authority, AuthoritySnapshot, Color, ControlCallbacks, Participant, PlayerId, PlayerMode,
    SessionContext, VideoUrl,
};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn host() -> Participant {
    Participant::new(PlayerId::new(1), "Host")
}

pub fn guest() -> Participant {
    Participant::new(PlayerId::new(2), "Guest")
}

/// Command as seen by the authority
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TakeOwnership,
    SetLocked(bool),
    SetLooping(bool),
    SetPaused(bool),
    SetVolume(f32),
    SetMuted(bool),
    SeekTo(f32),
    PlayVideo(String),
    Reload,
    SetToVideoPlayer,
    SetToStreamPlayer,
}

struct FakeState {
    snapshot: AuthoritySnapshot,
    privileged: HashSet<PlayerId>,
    can_control: bool,
}

pub struct FakeAuthority {
    /// Participant issuing commands through this authority
    local: Participant,
    state: Mutex<FakeState>,
    calls: Mutex<Vec<Call>>,
    handlers: Mutex<Vec<Weak<dyn ControlCallbacks>>>,
}

impl FakeAuthority {
    /// Session mastered and owned by `master`, viewed from `local`
    pub fn new(master: Participant, local: Participant) -> Arc<Self> {
        let mut privileged = HashSet::new();
        privileged.insert(master.id);

        Arc::new(Self {
            local,
            state: Mutex::new(FakeState {
                snapshot: AuthoritySnapshot::new(master),
                privileged,
                can_control: false,
            }),
            calls: Mutex::new(Vec::new()),
            handlers: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn registered(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> AuthoritySnapshot {
        self.read(|s| s.snapshot.clone())
    }

    pub fn edit(&self, f: impl FnOnce(&mut AuthoritySnapshot)) {
        f(&mut self.state.lock().unwrap().snapshot);
    }

    pub fn set_can_control(&self, can_control: bool) {
        self.state.lock().unwrap().can_control = can_control;
    }

    pub fn grant_privilege(&self, player: PlayerId) {
        self.state.lock().unwrap().privileged.insert(player);
    }

    /// Push to every live binding with no lock held
    pub fn push(&self, f: impl Fn(&dyn ControlCallbacks)) {
        let live: Vec<_> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        for handler in live {
            f(handler.as_ref());
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read<T>(&self, f: impl FnOnce(&FakeState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }
}

impl Authority for FakeAuthority {
    fn status_text(&self) -> String {
        self.read(|s| s.snapshot.status_text.clone())
    }

    fn is_looping(&self) -> bool {
        self.read(|s| s.snapshot.is_looping)
    }

    fn is_paused(&self) -> bool {
        self.read(|s| s.snapshot.is_paused)
    }

    fn is_locked(&self) -> bool {
        self.read(|s| s.snapshot.is_locked)
    }

    fn is_muted(&self) -> bool {
        self.read(|s| s.snapshot.is_muted)
    }

    fn volume(&self) -> f32 {
        self.read(|s| s.snapshot.volume)
    }

    fn player_mode(&self) -> PlayerMode {
        self.read(|s| s.snapshot.player_mode)
    }

    fn is_privileged_user(&self, player: PlayerId) -> bool {
        self.read(|s| s.privileged.contains(&player))
    }

    fn can_control_video_player(&self) -> bool {
        self.read(|s| s.can_control)
    }

    fn owner(&self) -> Option<Participant> {
        Some(self.read(|s| s.snapshot.owner.clone()))
    }

    fn master(&self) -> Option<Participant> {
        Some(self.read(|s| s.snapshot.master.clone()))
    }

    fn take_ownership(&self) {
        self.record(Call::TakeOwnership);
        let local = self.local.clone();
        self.edit(|s| s.owner = local);
        self.push(|h| h.on_video_player_owner_transferred());
    }

    fn set_locked(&self, locked: bool) {
        self.record(Call::SetLocked(locked));
        self.edit(|s| s.is_locked = locked);
        self.push(|h| h.set_locked(locked));
    }

    fn set_looping(&self, looping: bool) {
        self.record(Call::SetLooping(looping));
        self.edit(|s| s.is_looping = looping);
    }

    fn set_paused(&self, paused: bool) {
        self.record(Call::SetPaused(paused));
        self.edit(|s| s.is_paused = paused);
        self.push(|h| h.set_paused(paused));
    }

    fn set_volume(&self, volume: f32) {
        self.record(Call::SetVolume(volume));
        self.edit(|s| s.set_volume(volume));
    }

    fn set_muted(&self, muted: bool) {
        self.record(Call::SetMuted(muted));
        self.edit(|s| s.is_muted = muted);
    }

    fn seek_to(&self, progress: f32) {
        self.record(Call::SeekTo(progress));
    }

    fn play_video(&self, url: VideoUrl) {
        self.record(Call::PlayVideo(url.as_str().to_string()));
        self.edit(|s| s.push_url(url));
    }

    fn reload(&self) {
        self.record(Call::Reload);
    }

    fn set_to_video_player(&self) {
        self.record(Call::SetToVideoPlayer);
        self.edit(|s| s.player_mode = PlayerMode::Video);
    }

    fn set_to_stream_player(&self) {
        self.record(Call::SetToStreamPlayer);
        self.edit(|s| s.player_mode = PlayerMode::Stream);
    }

    fn register_control_handler(&self, handler: Weak<dyn ControlCallbacks>) {
        self.handlers.lock().unwrap().push(handler);
    }

    fn unregister_control_handler(&self, handler: &Weak<dyn ControlCallbacks>) {
        self.handlers
            .lock()
            .unwrap()
            .retain(|h| !Weak::ptr_eq(h, handler));
    }
}

/// Binding for `local` on a fresh panel
pub fn bind(
    authority: &Arc<FakeAuthority>,
    local: Participant,
) -> (Arc<ControlHandler>, PanelView) {
    init_tracing();
    let panel = PanelView::new();
    let handler = ControlHandler::new(
        SessionContext::new(local),
        authority.clone(),
        Box::new(panel.clone()),
        ControlConfig::default(),
    );
    (handler, panel)
}

/// Panel that re-enters the refresh loop while drawing the status line
///
/// Records `(writes_before, writes_after, ticked)` for every nested call.
#[derive(Clone, Default)]
pub struct ReentrantView {
    pub inner: PanelView,
    pub handler: Arc<OnceLock<Weak<ControlHandler>>>,
    pub nested: Arc<Mutex<Vec<(usize, usize, bool)>>>,
}

impl ControlView for ReentrantView {
    fn set_status_text(&mut self, text: &str) {
        self.inner.set_status_text(text);

        if let Some(handler) = self.handler.get().and_then(Weak::upgrade) {
            let before = self.inner.state().writes;
            let ticked = handler.update();
            let after = self.inner.state().writes;
            self.nested.lock().unwrap().push((before, after, ticked));
        }
    }

    fn set_status_shadow_text(&mut self, text: &str) {
        self.inner.set_status_shadow_text(text);
    }

    fn set_loop_color(&mut self, color: Color) {
        self.inner.set_loop_color(color);
    }

    fn set_mute_toggle(&mut self, muted: bool) {
        self.inner.set_mute_toggle(muted);
    }

    fn set_volume_slider(&mut self, volume: f32) {
        self.inner.set_volume_slider(volume);
    }

    fn set_screen_fitter_scale(&mut self, scale: FitScale) {
        self.inner.set_screen_fitter_scale(scale);
    }
}
