use crate::stage::StageTracker;
use crate::view_model::{PipelineView, StageView};
use crate::{
    aggregate, AggregateOptions, Analysis, DocumentPolicy, JobCollection, KeywordSet, Stage,
    StageState,
};

/// Everything the pipeline knows about the current session.
///
/// Only [`crate::update`] mutates the stage states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    policy: DocumentPolicy,
    aggregate: AggregateOptions,
    document_name: Option<String>,
    pub(crate) analyze: StageTracker<Analysis>,
    pub(crate) keywords: StageTracker<KeywordSet>,
    pub(crate) jobs: StageTracker<JobCollection>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(policy: DocumentPolicy, aggregate: AggregateOptions) -> Self {
        Self {
            policy,
            aggregate,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &DocumentPolicy {
        &self.policy
    }

    pub fn analyze(&self) -> &StageState<Analysis> {
        self.analyze.state()
    }

    pub fn keywords(&self) -> &StageState<KeywordSet> {
        self.keywords.state()
    }

    pub fn jobs(&self) -> &StageState<JobCollection> {
        self.jobs.state()
    }

    pub fn is_stage_in_flight(&self, stage: Stage) -> bool {
        match stage {
            Stage::Analyze => self.analyze().is_in_flight(),
            Stage::ExtractKeywords => self.keywords().is_in_flight(),
            Stage::FetchJobs => self.jobs().is_in_flight(),
        }
    }

    pub fn is_any_in_flight(&self) -> bool {
        [Stage::Analyze, Stage::ExtractKeywords, Stage::FetchJobs]
            .into_iter()
            .any(|stage| self.is_stage_in_flight(stage))
    }

    /// Summary that recommendations would be derived from, if any.
    pub(crate) fn recommendation_summary(&self) -> Option<&str> {
        self.analyze()
            .payload()
            .map(Analysis::summary)
            .filter(|summary| !summary.trim().is_empty())
    }

    pub fn can_request_recommendations(&self) -> bool {
        self.recommendation_summary().is_some()
            && !self.keywords().is_in_flight()
            && !self.jobs().is_in_flight()
    }

    pub fn view(&self) -> PipelineView {
        PipelineView {
            document_name: self.document_name.clone(),
            analyze: StageView::from_state(self.analyze()),
            keywords: StageView::from_state(self.keywords()),
            jobs: StageView::from_state(self.jobs()),
            analysis: self.analyze().displayed().cloned(),
            keywords_query: self.keywords().displayed().map(KeywordSet::to_query),
            listing: self
                .jobs()
                .displayed()
                .map(|raw| aggregate(raw, &self.aggregate)),
            can_request: self.can_request_recommendations(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn set_document_name(&mut self, name: String) {
        self.document_name = Some(name);
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
