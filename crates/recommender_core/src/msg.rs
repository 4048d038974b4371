use crate::{Analysis, Document, JobCollection, KeywordSet, RequestSeq, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a resume for analysis.
    DocumentSubmitted(Document),
    /// User asked for job recommendations.
    RecommendationsRequested,
    /// Gateway finished an analyze request.
    AnalysisCompleted {
        seq: RequestSeq,
        result: Result<Analysis, ServiceError>,
    },
    /// Gateway finished a keyword extraction request.
    KeywordsCompleted {
        seq: RequestSeq,
        result: Result<KeywordSet, ServiceError>,
    },
    /// Gateway finished a job search request.
    JobsCompleted {
        seq: RequestSeq,
        result: Result<JobCollection, ServiceError>,
    },
}
