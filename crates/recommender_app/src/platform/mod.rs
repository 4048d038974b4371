pub mod config;
pub mod effects;
pub mod logging;
pub mod orchestrator;
pub mod render;
pub mod upload;

pub use config::{ConfigError, JobLayout, RecommenderConfig};
pub use effects::EffectRunner;
pub use orchestrator::Orchestrator;
