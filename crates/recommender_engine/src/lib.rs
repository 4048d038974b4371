//! Recommender engine: remote service gateway and background effect execution.
mod engine;
mod gateway;
mod types;
mod wire;

pub use engine::EngineHandle;
pub use gateway::{Gateway, ReqwestGateway};
pub use types::{EngineError, EngineEvent, GatewaySettings, DEFAULT_BASE_URL, DEFAULT_JOB_ROWS};
