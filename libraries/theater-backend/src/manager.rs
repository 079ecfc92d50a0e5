//! Backend adapter
//!
//! Owns the interchangeable backends and presents one command surface to the
//! authority. Every mutating command goes to the backend of the current mode
//! and rebinds the output in the same critical section, so no viewer ever
//! samples a stale frame. Lifecycle events flow the other way: backends emit
//! them into a queue that [`VideoPlayerManager::pump_events`] drains into the
//! authority, unchanged and in order.

use crate::{
    backend::{BackendEvent, BackendSet, EventEmitter, VideoBackend},
    config::BackendConfig,
    error::{BackendError, Result},
    output::{AudioSink, OutputBinding, RenderSurface, TextureHandle},
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use theater_core::{PlayerEvent, PlayerMode, VideoEventReceiver, VideoUrl};
use tracing::{debug, info, warn};

struct AdapterState {
    /// Set exactly once by `start()`
    initialized: bool,

    /// Selects the current backend
    mode: PlayerMode,

    backends: BackendSet,

    output: OutputBinding,

    audio_outputs: Vec<Box<dyn AudioSink>>,
}

/// Uniform command surface over the playback backends
pub struct VideoPlayerManager {
    state: Mutex<AdapterState>,
    receiver: RwLock<Option<Weak<dyn VideoEventReceiver>>>,
    events_tx: Sender<BackendEvent>,
    events_rx: Receiver<BackendEvent>,
}

impl VideoPlayerManager {
    /// Create an adapter drawing onto `surface`
    ///
    /// Nothing is forwarded to backends until [`start`](Self::start) runs.
    pub fn new(config: BackendConfig, surface: Box<dyn RenderSurface>) -> Self {
        let (events_tx, events_rx) = unbounded();

        Self {
            state: Mutex::new(AdapterState {
                initialized: false,
                mode: config.initial_mode,
                backends: BackendSet::default(),
                output: OutputBinding::new(surface, config.texture_property),
                audio_outputs: Vec::new(),
            }),
            receiver: RwLock::new(None),
            events_tx,
            events_rx,
        }
    }

    /// Install the backend used for `mode`, builder style
    pub fn with_backend(self, mode: PlayerMode, backend: Box<dyn VideoBackend>) -> Self {
        self.install_backend(mode, backend);
        self
    }

    /// Register an audio sink, builder style
    pub fn with_audio_sink(self, sink: Box<dyn AudioSink>) -> Self {
        self.add_audio_sink(sink);
        self
    }

    /// Install the backend used for `mode`, replacing any previous one
    ///
    /// The backend is attached to the event queue immediately. Replacing the
    /// current backend after start rebinds the output to the new one.
    pub fn install_backend(&self, mode: PlayerMode, mut backend: Box<dyn VideoBackend>) {
        backend.attach(EventEmitter::new(mode, self.events_tx.clone()));
        info!(mode = %mode, backend = backend.name(), "Installing video backend");

        let mut state = self.lock_state();
        let rebind = state.initialized && state.mode == mode;
        let texture = if rebind { backend.texture() } else { None };

        if let Some(mut previous) = state.backends.insert(mode, backend) {
            previous.stop();
        }

        if rebind {
            state.output.refresh(texture);
        }
    }

    /// Add an audio output
    pub fn add_audio_sink(&self, sink: Box<dyn AudioSink>) {
        self.lock_state().audio_outputs.push(sink);
    }

    /// Set the authority events are forwarded to
    pub fn set_receiver(&self, receiver: Weak<dyn VideoEventReceiver>) {
        *self
            .receiver
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(receiver);
    }

    /// Initialize the adapter
    ///
    /// Selects the backend of the configured mode and binds its output.
    /// Runs once; later calls are no-ops.
    pub fn start(&self) -> Result<()> {
        let mut state = self.lock_state();
        if state.initialized {
            return Ok(());
        }

        let AdapterState {
            mode,
            backends,
            output,
            ..
        } = &mut *state;

        let Some(backend) = backends.get_mut(*mode) else {
            warn!(mode = %mode, "Cannot start adapter, backend missing");
            return Err(BackendError::MissingBackend(*mode));
        };

        output.refresh(backend.texture());
        info!(mode = %mode, backend = backend.name(), "Video player manager started");
        state.initialized = true;
        Ok(())
    }

    /// Whether `start()` completed
    pub fn is_initialized(&self) -> bool {
        self.lock_state().initialized
    }

    /// Mode whose backend receives commands
    pub fn player_mode(&self) -> PlayerMode {
        self.lock_state().mode
    }

    /// Texture currently bound to the visible surface
    pub fn bound_texture(&self) -> Option<TextureHandle> {
        self.lock_state().output.bound()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn play_video(&self) {
        self.with_current("play", |backend| backend.play());
    }

    pub fn stop_video(&self) {
        self.with_current("stop", |backend| backend.stop());
    }

    pub fn pause_video(&self) {
        self.with_current("pause", |backend| backend.pause());
    }

    /// Seek the current backend to `seconds`
    pub fn set_video_time(&self, seconds: f32) {
        self.with_current("set_time", |backend| backend.set_time(seconds));
    }

    /// Load `url` in the current backend
    pub fn set_video_url(&self, url: &VideoUrl) {
        self.with_current("set_url", |backend| backend.set_url(url));
    }

    /// Apply `volume` to every audio sink
    ///
    /// The authority clamps before calling; the value is passed through as is.
    pub fn set_audio_volume(&self, volume: f32) {
        let mut state = self.lock_state();
        for sink in &mut state.audio_outputs {
            sink.set_volume(volume);
        }
    }

    /// Switch the backend commands go to
    ///
    /// The outgoing backend is stopped and the output rebound to the
    /// incoming one before the lock is released. Returns whether the current
    /// backend changed. Before `start()` only the mode to start with changes.
    pub fn set_player_mode(&self, mode: PlayerMode) -> bool {
        let mut state = self.lock_state();
        if state.mode == mode {
            return false;
        }

        if !state.backends.contains(mode) {
            warn!(mode = %mode, "No backend installed for mode, keeping current backend");
            return false;
        }

        if !state.initialized {
            debug!(mode = %mode, "Adapter not started, recording initial mode");
            state.mode = mode;
            return true;
        }

        let AdapterState {
            mode: current,
            backends,
            output,
            ..
        } = &mut *state;

        if let Some(outgoing) = backends.get_mut(*current) {
            outgoing.stop();
        }

        *current = mode;
        let texture = backends.get_mut(mode).and_then(|incoming| incoming.texture());
        output.refresh(texture);

        info!(mode = %mode, "Switched video backend");
        true
    }

    // ========================================================================
    // Event forwarding
    // ========================================================================

    /// Forward every queued backend event to the authority
    ///
    /// Returns the number of events forwarded. Events queued while no
    /// authority is attached are dropped.
    pub fn pump_events(&self) -> usize {
        let receiver = self.upgrade_receiver();
        let mut forwarded = 0;

        for BackendEvent { mode, event } in self.events_rx.try_iter() {
            match &receiver {
                Some(receiver) => {
                    debug!(mode = %mode, event = event.name(), "Forwarding backend event");
                    receiver.on_video_event(event);
                    forwarded += 1;
                }
                None => {
                    warn!(mode = %mode, event = event.name(), "No authority attached, dropping backend event");
                }
            }
        }

        forwarded
    }

    fn upgrade_receiver(&self) -> Option<Arc<dyn VideoEventReceiver>> {
        self.receiver
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn with_current(&self, op: &'static str, f: impl FnOnce(&mut dyn VideoBackend)) {
        let mut state = self.lock_state();
        if !state.initialized {
            debug!(op, "Adapter not started, dropping command");
            return;
        }

        let AdapterState {
            mode,
            backends,
            output,
            ..
        } = &mut *state;

        match backends.get_mut(*mode) {
            Some(backend) => {
                f(&mut *backend);
                output.refresh(backend.texture());
            }
            None => debug!(op, mode = %mode, "No current backend, dropping command"),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AdapterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Direct callbacks from backends are relayed the same way as queued ones
impl VideoEventReceiver for VideoPlayerManager {
    fn on_video_event(&self, event: PlayerEvent) {
        match self.upgrade_receiver() {
            Some(receiver) => receiver.on_video_event(event),
            None => warn!(event = event.name(), "No authority attached, dropping backend event"),
        }
    }
}

impl std::fmt::Debug for VideoPlayerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("VideoPlayerManager")
            .field("initialized", &state.initialized)
            .field("mode", &state.mode)
            .field("output", &state.output)
            .field("audio_outputs", &state.audio_outputs.len())
            .finish_non_exhaustive()
    }
}
