/// Canonical session playback state
use super::{Participant, PlayerMode, Resolution, VideoUrl};
use serde::{Deserialize, Serialize};

/// Everything an authority replicates about the shared player
///
/// Owned and mutated only by the authority. Bindings read it through the
/// `Authority` query methods, never by holding a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoritySnapshot {
    /// Text shown in every viewer's status line
    pub status_text: String,

    pub is_looping: bool,
    pub is_paused: bool,

    /// When locked only privileged participants may change the URL
    pub is_locked: bool,

    pub is_muted: bool,

    /// Output volume, clamped to `[0, 1]`
    pub volume: f32,

    pub current_url: VideoUrl,
    pub previous_url: VideoUrl,

    /// The single participant whose commands are canonical
    pub owner: Participant,

    /// Room authority, may differ from the owner
    pub master: Participant,

    pub player_mode: PlayerMode,

    pub last_known_resolution: Resolution,
}

impl AuthoritySnapshot {
    /// Fresh session state, owned by the master
    pub fn new(master: Participant) -> Self {
        Self {
            status_text: String::new(),
            is_looping: false,
            is_paused: true,
            is_locked: false,
            is_muted: false,
            volume: 0.5,
            current_url: VideoUrl::empty(),
            previous_url: VideoUrl::empty(),
            owner: master.clone(),
            master,
            player_mode: PlayerMode::default(),
            last_known_resolution: Resolution::default(),
        }
    }

    /// Store a volume, clamping it into range
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Replace the current URL, shifting the old one into history
    pub fn push_url(&mut self, url: VideoUrl) {
        self.previous_url = std::mem::replace(&mut self.current_url, url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerId;

    fn master() -> Participant {
        Participant::new(PlayerId::new(1), "Host")
    }

    #[test]
    fn new_snapshot_is_owned_by_master() {
        let snapshot = AuthoritySnapshot::new(master());
        assert_eq!(snapshot.owner, snapshot.master);
        assert!(snapshot.is_paused);
        assert!(!snapshot.is_locked);
    }

    #[test]
    fn volume_is_clamped() {
        let mut snapshot = AuthoritySnapshot::new(master());
        snapshot.set_volume(1.7);
        assert_eq!(snapshot.volume, 1.0);
        snapshot.set_volume(-0.2);
        assert_eq!(snapshot.volume, 0.0);
        snapshot.set_volume(f32::NAN);
        assert_eq!(snapshot.volume, 0.0);
    }

    proptest::proptest! {
        #[test]
        fn volume_always_in_unit_range(volume in proptest::num::f32::ANY) {
            let mut snapshot = AuthoritySnapshot::new(master());
            snapshot.set_volume(volume);
            proptest::prop_assert!((0.0..=1.0).contains(&snapshot.volume));
        }

        #[test]
        fn push_url_remembers_only_the_last(urls in proptest::collection::vec("[a-z]{1,8}", 2..6)) {
            let mut snapshot = AuthoritySnapshot::new(master());
            for url in &urls {
                snapshot.push_url(VideoUrl::new(url.as_str()));
            }
            proptest::prop_assert_eq!(snapshot.current_url.as_str(), urls[urls.len() - 1].as_str());
            proptest::prop_assert_eq!(snapshot.previous_url.as_str(), urls[urls.len() - 2].as_str());
        }
    }

    #[test]
    fn push_url_keeps_history() {
        let mut snapshot = AuthoritySnapshot::new(master());
        snapshot.push_url(VideoUrl::new("a"));
        snapshot.push_url(VideoUrl::new("b"));
        assert_eq!(snapshot.current_url.as_str(), "b");
        assert_eq!(snapshot.previous_url.as_str(), "a");
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut snapshot = AuthoritySnapshot::new(master());
        snapshot.player_mode = PlayerMode::Stream;
        snapshot.status_text = "Playing".to_string();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"player_mode\":\"stream\""));
        let back: AuthoritySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
