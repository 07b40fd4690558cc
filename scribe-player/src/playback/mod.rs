//! Playback coordination over a platform media handle

pub mod command;
pub mod coordinator;
pub mod media;
pub mod simulated;
pub mod types;

pub use command::PlayerCommand;
pub use coordinator::PlaybackCoordinator;
pub use media::{MediaError, MediaHandle, MediaSignal};
pub use simulated::{MediaCall, SimulatedMedia, SimulatedPlatform};
pub use types::{PendingSeekPlay, PlaybackRange};
