//! Session wiring
//!
//! Builds a room with both simulated backends and binds one control panel
//! per participant.

use crate::authority::{Room, Seat};
use crate::backends::{HeadlessSurface, MeterSink, SimulatedBackend};
use crate::config::DemoConfig;
use crate::error::Result;
use std::sync::Arc;
use theater_backend::VideoPlayerManager;
use theater_control::{ControlHandler, PanelState, PanelView};
use theater_core::{Participant, PlayerId, PlayerMode, SessionContext};
use tracing::{debug, info};

/// One participant with their control panel
pub struct Viewer {
    pub participant: Participant,
    pub seat: Arc<Seat>,
    pub handler: Arc<ControlHandler>,
    pub panel: PanelView,
}

impl Viewer {
    pub fn state(&self) -> PanelState {
        self.panel.state()
    }
}

/// A running session: room, outputs and every participant's panel
pub struct Simulation {
    pub room: Arc<Room>,
    pub viewers: Vec<Viewer>,
    pub surface: HeadlessSurface,
    pub speaker: MeterSink,
    config: DemoConfig,
}

impl Simulation {
    /// Open a room for the configured master and seat every viewer
    pub fn new(config: DemoConfig) -> Result<Self> {
        let surface = HeadlessSurface::new();
        let speaker = MeterSink::new();

        let manager = VideoPlayerManager::new(config.backend.clone(), Box::new(surface.clone()))
            .with_backend(PlayerMode::Video, Box::new(SimulatedBackend::new("video-file", 1000)))
            .with_backend(PlayerMode::Stream, Box::new(SimulatedBackend::new("live-stream", 2000)))
            .with_audio_sink(Box::new(speaker.clone()));

        let master = Participant::new(PlayerId::new(1), config.session.master_name.clone());
        let room = Room::open(master.clone(), manager, config.session.clone())?;

        let mut simulation = Self {
            room,
            viewers: Vec::new(),
            surface,
            speaker,
            config,
        };

        simulation.seat(master);
        let names = simulation.config.session.viewers.clone();
        for (id, name) in (2u32..).zip(names) {
            let participant = Participant::new(PlayerId::new(id), name);
            simulation.room.join(participant.clone());
            simulation.seat(participant);
        }

        info!(
            session = %simulation.room.session_id(),
            viewers = simulation.viewers.len(),
            "Simulation ready"
        );
        Ok(simulation)
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Bind a fresh panel for `participant`
    fn seat(&mut self, participant: Participant) {
        let seat = self.room.seat(participant.clone());
        let panel = PanelView::new();
        let session = SessionContext::join(self.room.session_id().clone(), participant.clone());
        let handler = ControlHandler::new(
            session,
            seat.clone(),
            Box::new(panel.clone()),
            self.config.control.clone(),
        );

        self.viewers.push(Viewer {
            participant,
            seat,
            handler,
            panel,
        });
    }

    /// Viewer with display name `name`
    pub fn viewer(&self, name: &str) -> Option<&Viewer> {
        self.viewers
            .iter()
            .find(|v| v.participant.display_name == name)
    }

    /// Viewer of the current room master
    pub fn master(&self) -> Option<&Viewer> {
        let master = self.room.snapshot().master.id;
        self.viewers.iter().find(|v| v.participant.id == master)
    }

    /// One UI frame: forward backend events, advance time, refresh panels
    pub fn tick(&self) -> usize {
        let forwarded = self.room.tick(self.config.session.tick_seconds);
        for viewer in &self.viewers {
            viewer.handler.update();
        }
        forwarded
    }

    pub fn run(&self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Remove a viewer from the room, tearing down their panel
    ///
    /// Returns `false` if nobody of that name is seated.
    pub fn leave(&mut self, name: &str) -> Result<bool> {
        let Some(index) = self
            .viewers
            .iter()
            .position(|v| v.participant.display_name == name)
        else {
            debug!(name, "No such viewer");
            return Ok(false);
        };

        let viewer = self.viewers.remove(index);
        viewer.handler.shutdown();
        self.room.leave(viewer.participant.id)?;
        Ok(true)
    }
}
