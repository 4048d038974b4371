use std::fmt;

use crate::ServiceError;

/// Issuance order of requests within one stage. Higher is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Analyze,
    ExtractKeywords,
    FetchJobs,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Analyze => write!(f, "analyze"),
            Stage::ExtractKeywords => write!(f, "extract-keywords"),
            Stage::FetchJobs => write!(f, "fetch-jobs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageState<T> {
    Idle,
    /// Waiting on request `seq`. The last successful payload stays visible
    /// until the request resolves.
    InFlight { seq: RequestSeq, previous: Option<T> },
    Succeeded(T),
    Failed(ServiceError),
}

impl<T> Default for StageState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> StageState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// Payload of a completed request, if the last one succeeded.
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Payload worth showing right now, including the one kept during a refresh.
    pub fn displayed(&self) -> Option<&T> {
        match self {
            Self::Succeeded(payload) => Some(payload),
            Self::InFlight { previous, .. } => previous.as_ref(),
            Self::Idle | Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Stage state plus the newest sequence number handed out for it.
///
/// A completion mutates the state only when it carries the newest sequence.
/// Every operation that supersedes outstanding work bumps the sequence, so
/// late answers to abandoned requests fall through as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StageTracker<T> {
    state: StageState<T>,
    latest: RequestSeq,
}

impl<T> Default for StageTracker<T> {
    fn default() -> Self {
        Self {
            state: StageState::Idle,
            latest: RequestSeq::default(),
        }
    }
}

impl<T> StageTracker<T> {
    pub(crate) fn state(&self) -> &StageState<T> {
        &self.state
    }

    pub(crate) fn latest(&self) -> RequestSeq {
        self.latest
    }

    pub(crate) fn begin(&mut self) -> RequestSeq {
        self.latest = self.latest.next();
        let previous = match std::mem::take(&mut self.state) {
            StageState::Succeeded(payload) => Some(payload),
            StageState::InFlight { previous, .. } => previous,
            StageState::Idle | StageState::Failed(_) => None,
        };
        self.state = StageState::InFlight {
            seq: self.latest,
            previous,
        };
        self.latest
    }

    /// Applies a completion. Returns `false` when it was stale and ignored.
    pub(crate) fn resolve(&mut self, seq: RequestSeq, result: Result<T, ServiceError>) -> bool {
        if seq != self.latest || !self.state.is_in_flight() {
            return false;
        }
        self.state = match result {
            Ok(payload) => StageState::Succeeded(payload),
            Err(err) => StageState::Failed(err),
        };
        true
    }

    /// Fails without issuing a request.
    pub(crate) fn reject(&mut self, err: ServiceError) {
        self.latest = self.latest.next();
        self.state = StageState::Failed(err);
    }

    /// Completes without issuing a request.
    pub(crate) fn settle(&mut self, payload: T) {
        self.latest = self.latest.next();
        self.state = StageState::Succeeded(payload);
    }

    /// Back to idle; anything in flight becomes stale.
    pub(crate) fn reset(&mut self) {
        self.latest = self.latest.next();
        self.state = StageState::Idle;
    }

    /// Drops interest in an outstanding request, falling back to whatever was
    /// shown before it started. No-op when nothing is in flight.
    pub(crate) fn abandon(&mut self) {
        if !self.state.is_in_flight() {
            return;
        }
        self.latest = self.latest.next();
        self.state = match std::mem::take(&mut self.state) {
            StageState::InFlight {
                previous: Some(payload),
                ..
            } => StageState::Succeeded(payload),
            _ => StageState::Idle,
        };
    }
}
