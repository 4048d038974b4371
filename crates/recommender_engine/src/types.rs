use std::time::Duration;

use recommender_core::{Analysis, JobCollection, KeywordSet, RequestSeq, ServiceError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_JOB_ROWS: u32 = 60;

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound on postings requested from the job aggregation service.
    pub job_rows: u32,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            job_rows: DEFAULT_JOB_ROWS,
        }
    }
}

/// Completion of one gateway call, tagged with the sequence it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AnalysisCompleted {
        seq: RequestSeq,
        result: Result<Analysis, ServiceError>,
    },
    KeywordsCompleted {
        seq: RequestSeq,
        result: Result<KeywordSet, ServiceError>,
    },
    JobsCompleted {
        seq: RequestSeq,
        result: Result<JobCollection, ServiceError>,
    },
}

impl EngineEvent {
    pub fn seq(&self) -> RequestSeq {
        match self {
            EngineEvent::AnalysisCompleted { seq, .. }
            | EngineEvent::KeywordsCompleted { seq, .. }
            | EngineEvent::JobsCompleted { seq, .. } => *seq,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid service base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("engine thread has stopped")]
    Stopped,
}
