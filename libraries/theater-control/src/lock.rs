//! URL prompt selection for the lock state

use crate::config::ControlConfig;
use theater_core::Color;

/// Which URL prompt a viewer sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Locked, but this viewer owns the player or is privileged
    Locked,

    /// Locked and this viewer may not add URLs
    MasterOnly,

    /// Anyone may add URLs
    Unlocked,
}

impl PlaceholderKind {
    /// Exactly one branch per `(locked, privileged)` pair
    pub fn select(locked: bool, privileged: bool) -> Self {
        match (locked, privileged) {
            (true, true) => Self::Locked,
            (true, false) => Self::MasterOnly,
            (false, _) => Self::Unlocked,
        }
    }
}

/// Everything the lock widgets show for one lock state
#[derive(Debug, Clone, PartialEq)]
pub struct LockDisplay {
    pub kind: PlaceholderKind,
    pub locked: bool,
    pub placeholder: String,
    pub color: Color,
}

impl LockDisplay {
    /// Resolve prompt text and color; `master` names the room master
    pub fn resolve(locked: bool, privileged: bool, master: &str, config: &ControlConfig) -> Self {
        let kind = PlaceholderKind::select(locked, privileged);
        let (placeholder, color) = match kind {
            PlaceholderKind::Locked => (config.prompts.locked.clone(), config.colors.neutral),
            PlaceholderKind::MasterOnly => (
                config.prompts.master_only_for(master),
                config.colors.warning,
            ),
            PlaceholderKind::Unlocked => (config.prompts.unlocked.clone(), config.colors.neutral),
        };

        Self {
            kind,
            locked,
            placeholder,
            color,
        }
    }
}
