//! Test helper modules for scribe-player integration tests
//!
//! Provides reusable test infrastructure components:
//! - PlayerHarness: coordinator wired to a simulated media handle
//! - Transcript fixtures written to temporary files

pub mod fixtures;
pub mod player_harness;

// Re-export commonly used types
pub use fixtures::{sample_result, write_result_file};
pub use player_harness::PlayerHarness;
