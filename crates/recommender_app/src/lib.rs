//! Recommender app: configuration, effect execution and the command-line surface.
pub mod platform;

pub use platform::Orchestrator;
