use crate::{Analysis, ErrorKind, JobListing, StageState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StageView {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed { kind: ErrorKind, message: String },
}

impl StageView {
    pub(crate) fn from_state<T>(state: &StageState<T>) -> Self {
        match state {
            StageState::Idle => StageView::Idle,
            StageState::InFlight { .. } => StageView::InFlight,
            StageState::Succeeded(_) => StageView::Succeeded,
            StageState::Failed(err) => StageView::Failed {
                kind: err.kind(),
                message: err.user_message(),
            },
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, StageView::InFlight)
    }
}

/// Read-only snapshot handed to observers after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineView {
    pub document_name: Option<String>,
    pub analyze: StageView,
    pub keywords: StageView,
    pub jobs: StageView,
    pub analysis: Option<Analysis>,
    pub keywords_query: Option<String>,
    pub listing: Option<JobListing>,
    /// Whether the "request recommendations" control should be enabled.
    pub can_request: bool,
    pub dirty: bool,
}
