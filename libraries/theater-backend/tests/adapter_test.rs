//! Integration tests for the backend adapter
//!
//! Backends, surfaces and sinks are recording fakes; every test checks what
//! actually reached them.

use std::sync::{Arc, Mutex};
use theater_backend::{
    AudioSink, BackendConfig, EventEmitter, PropertyBlock, RenderSurface, TextureHandle,
    VideoBackend, VideoPlayerManager,
};
use theater_core::{PlayerEvent, PlayerMode, VideoError, VideoEventReceiver, VideoUrl};

// ===== Test Helpers =====

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Play,
    Pause,
    Stop,
    SetTime(f32),
    SetUrl(String),
}

/// Backend that records calls and hands out a new texture per URL
#[derive(Clone)]
struct FakeBackend {
    name: &'static str,
    calls: Arc<Mutex<Vec<Call>>>,
    texture: Arc<Mutex<u64>>,
    emitter: Arc<Mutex<Option<EventEmitter>>>,
}

impl FakeBackend {
    fn new(name: &'static str, texture: u64) -> Self {
        Self {
            name,
            calls: Arc::default(),
            texture: Arc::new(Mutex::new(texture)),
            emitter: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn emit(&self, event: PlayerEvent) {
        self.emitter
            .lock()
            .unwrap()
            .as_ref()
            .expect("backend not attached")
            .emit(event);
    }
}

impl VideoBackend for FakeBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn play(&mut self) {
        self.calls.lock().unwrap().push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(Call::Pause);
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push(Call::Stop);
    }

    fn set_time(&mut self, seconds: f32) {
        self.calls.lock().unwrap().push(Call::SetTime(seconds));
    }

    fn set_url(&mut self, url: &VideoUrl) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::SetUrl(url.as_str().to_string()));
        *self.texture.lock().unwrap() += 100;
    }

    fn texture(&self) -> Option<TextureHandle> {
        Some(TextureHandle::new(*self.texture.lock().unwrap()))
    }

    fn attach(&mut self, events: EventEmitter) {
        *self.emitter.lock().unwrap() = Some(events);
    }
}

/// Surface that records every property block it is given
#[derive(Clone, Default)]
struct RecordingSurface {
    writes: Arc<Mutex<Vec<Option<TextureHandle>>>>,
    block: Arc<Mutex<PropertyBlock>>,
}

impl RecordingSurface {
    fn writes(&self) -> Vec<Option<TextureHandle>> {
        self.writes.lock().unwrap().clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn property_block(&self) -> PropertyBlock {
        self.block.lock().unwrap().clone()
    }

    fn set_property_block(&mut self, block: PropertyBlock) {
        self.writes.lock().unwrap().push(block.texture("_MainTex"));
        *self.block.lock().unwrap() = block;
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    volumes: Arc<Mutex<Vec<f32>>>,
}

impl AudioSink for RecordingSink {
    fn set_volume(&mut self, volume: f32) {
        self.volumes.lock().unwrap().push(volume);
    }
}

#[derive(Default)]
struct RecordingReceiver {
    events: Mutex<Vec<PlayerEvent>>,
}

impl VideoEventReceiver for RecordingReceiver {
    fn on_video_event(&self, event: PlayerEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn receiver_handle(receiver: &Arc<RecordingReceiver>) -> std::sync::Weak<dyn VideoEventReceiver> {
    let strong: Arc<dyn VideoEventReceiver> = receiver.clone();
    Arc::downgrade(&strong)
}

struct Rig {
    manager: VideoPlayerManager,
    video: FakeBackend,
    stream: FakeBackend,
    surface: RecordingSurface,
}

fn rig() -> Rig {
    let video = FakeBackend::new("video", 1);
    let stream = FakeBackend::new("stream", 2);
    let surface = RecordingSurface::default();

    let manager = VideoPlayerManager::new(BackendConfig::default(), Box::new(surface.clone()))
        .with_backend(PlayerMode::Video, Box::new(video.clone()))
        .with_backend(PlayerMode::Stream, Box::new(stream.clone()));

    Rig {
        manager,
        video,
        stream,
        surface,
    }
}

// ===== Command Forwarding =====

#[test]
fn test_commands_dropped_until_start() {
    let rig = rig();

    rig.manager.play_video();
    rig.manager.pause_video();
    rig.manager.set_video_url(&VideoUrl::new("https://example.com/a.mp4"));

    assert!(rig.video.calls().is_empty());
    assert!(rig.stream.calls().is_empty());
    assert!(rig.surface.writes().is_empty(), "no output binding before start");
}

#[test]
fn test_start_binds_initial_backend_output() {
    let rig = rig();

    rig.manager.start().unwrap();

    assert!(rig.manager.is_initialized());
    assert_eq!(rig.surface.writes(), vec![Some(TextureHandle::new(1))]);
}

#[test]
fn test_start_runs_once() {
    let rig = rig();

    rig.manager.start().unwrap();
    rig.manager.start().unwrap();

    assert_eq!(rig.surface.writes().len(), 1);
}

#[test]
fn test_every_mutating_command_rebinds_output() {
    let rig = rig();
    rig.manager.start().unwrap();

    rig.manager.set_video_url(&VideoUrl::new("https://example.com/a.mp4"));
    rig.manager.play_video();
    rig.manager.set_video_time(42.5);
    rig.manager.pause_video();
    rig.manager.stop_video();

    assert_eq!(
        rig.video.calls(),
        vec![
            Call::SetUrl("https://example.com/a.mp4".to_string()),
            Call::Play,
            Call::SetTime(42.5),
            Call::Pause,
            Call::Stop,
        ]
    );

    // One write from start plus one per command; the URL change swapped the texture
    let writes = rig.surface.writes();
    assert_eq!(writes.len(), 6);
    assert!(writes[1..].iter().all(|w| *w == Some(TextureHandle::new(101))));
    assert!(rig.stream.calls().is_empty());
}

// ===== Mode Switching =====

#[test]
fn test_mode_switch_rebinds_to_incoming_backend() {
    let rig = rig();
    rig.manager.start().unwrap();

    assert!(rig.manager.set_player_mode(PlayerMode::Stream));
    rig.manager.play_video();

    assert_eq!(rig.manager.player_mode(), PlayerMode::Stream);
    assert_eq!(rig.video.calls(), vec![Call::Stop]);
    assert_eq!(rig.stream.calls(), vec![Call::Play]);
    assert_eq!(rig.manager.bound_texture(), Some(TextureHandle::new(2)));
}

#[test]
fn test_switch_to_active_mode_is_noop() {
    let rig = rig();
    rig.manager.start().unwrap();

    assert!(!rig.manager.set_player_mode(PlayerMode::Video));

    assert!(rig.video.calls().is_empty());
    assert_eq!(rig.surface.writes().len(), 1);
}

#[test]
fn test_switch_to_missing_backend_is_declined() {
    let video = FakeBackend::new("video", 1);
    let surface = RecordingSurface::default();
    let manager = VideoPlayerManager::new(BackendConfig::default(), Box::new(surface.clone()))
        .with_backend(PlayerMode::Video, Box::new(video.clone()));
    manager.start().unwrap();

    assert!(!manager.set_player_mode(PlayerMode::Stream));

    assert_eq!(manager.player_mode(), PlayerMode::Video);
    assert!(video.calls().is_empty(), "current backend must keep playing");
}

#[test]
fn test_mode_chosen_before_start_is_used_by_start() {
    let rig = rig();

    assert!(rig.manager.set_player_mode(PlayerMode::Stream));
    rig.manager.start().unwrap();

    assert_eq!(rig.surface.writes(), vec![Some(TextureHandle::new(2))]);
    assert!(rig.video.calls().is_empty());
}

#[test]
fn test_config_initial_mode() {
    let stream = FakeBackend::new("stream", 2);
    let config = BackendConfig {
        initial_mode: PlayerMode::Stream,
        ..BackendConfig::default()
    };
    let manager = VideoPlayerManager::new(config, Box::new(RecordingSurface::default()))
        .with_backend(PlayerMode::Stream, Box::new(stream.clone()));

    manager.start().unwrap();
    manager.play_video();

    assert_eq!(stream.calls(), vec![Call::Play]);
}

#[test]
fn test_replacing_current_backend_stops_old_and_rebinds() {
    let rig = rig();
    rig.manager.start().unwrap();

    let replacement = FakeBackend::new("video-2", 7);
    rig.manager
        .install_backend(PlayerMode::Video, Box::new(replacement.clone()));
    rig.manager.play_video();

    assert_eq!(rig.video.calls(), vec![Call::Stop]);
    assert_eq!(replacement.calls(), vec![Call::Play]);
    assert_eq!(rig.manager.bound_texture(), Some(TextureHandle::new(7)));
}

// ===== Audio =====

#[test]
fn test_volume_fans_out_to_every_sink() {
    let first = RecordingSink::default();
    let second = RecordingSink::default();
    let manager = VideoPlayerManager::new(BackendConfig::default(), Box::new(RecordingSurface::default()))
        .with_audio_sink(Box::new(first.clone()))
        .with_audio_sink(Box::new(second.clone()));

    manager.set_audio_volume(0.25);
    manager.add_audio_sink(Box::new(RecordingSink::default()));
    manager.set_audio_volume(0.75);

    assert_eq!(*first.volumes.lock().unwrap(), vec![0.25, 0.75]);
    assert_eq!(*second.volumes.lock().unwrap(), vec![0.25, 0.75]);
}

// ===== Event Forwarding =====

#[test]
fn test_events_forwarded_verbatim_in_order() {
    let rig = rig();
    let receiver = Arc::new(RecordingReceiver::default());
    rig.manager.set_receiver(receiver_handle(&receiver));

    rig.video.emit(PlayerEvent::Ready);
    rig.video.emit(PlayerEvent::Start);
    rig.video.emit(PlayerEvent::Play);
    rig.video.emit(PlayerEvent::Play);
    rig.stream.emit(PlayerEvent::Error(VideoError::RateLimited));
    rig.video.emit(PlayerEvent::Loop);
    rig.video.emit(PlayerEvent::Pause);
    rig.video.emit(PlayerEvent::Stop);
    rig.video.emit(PlayerEvent::End);

    assert_eq!(rig.manager.pump_events(), 9);
    assert_eq!(
        *receiver.events.lock().unwrap(),
        vec![
            PlayerEvent::Ready,
            PlayerEvent::Start,
            PlayerEvent::Play,
            PlayerEvent::Play,
            PlayerEvent::Error(VideoError::RateLimited),
            PlayerEvent::Loop,
            PlayerEvent::Pause,
            PlayerEvent::Stop,
            PlayerEvent::End,
        ],
        "no filtering, no deduplication"
    );
}

#[test]
fn test_pump_with_empty_queue_forwards_nothing() {
    let rig = rig();
    let receiver = Arc::new(RecordingReceiver::default());
    rig.manager.set_receiver(receiver_handle(&receiver));

    assert_eq!(rig.manager.pump_events(), 0);
    assert!(receiver.events.lock().unwrap().is_empty());
}

#[test]
fn test_events_dropped_without_receiver() {
    let rig = rig();
    rig.video.emit(PlayerEvent::Ready);

    assert_eq!(rig.manager.pump_events(), 0);

    // Queue was drained; a receiver attached later does not see stale events
    let receiver = Arc::new(RecordingReceiver::default());
    rig.manager.set_receiver(receiver_handle(&receiver));
    assert_eq!(rig.manager.pump_events(), 0);
}

#[test]
fn test_direct_callbacks_are_relayed() {
    let rig = rig();
    let receiver = Arc::new(RecordingReceiver::default());
    rig.manager.set_receiver(receiver_handle(&receiver));

    rig.manager
        .on_video_event(PlayerEvent::Error(VideoError::InvalidUrl));

    assert_eq!(
        *receiver.events.lock().unwrap(),
        vec![PlayerEvent::Error(VideoError::InvalidUrl)]
    );
}

#[test]
fn test_receiver_is_held_weakly() {
    let rig = rig();
    let receiver = Arc::new(RecordingReceiver::default());
    rig.manager.set_receiver(receiver_handle(&receiver));
    drop(receiver);

    rig.video.emit(PlayerEvent::End);
    assert_eq!(rig.manager.pump_events(), 0);
}
