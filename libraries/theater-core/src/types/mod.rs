mod color;
mod ids;
mod mode;
mod snapshot;

pub use color::Color;
pub use ids::{Participant, PlayerId, SessionId};
pub use mode::{PlayerMode, Resolution, VideoUrl};
pub use snapshot::AuthoritySnapshot;
