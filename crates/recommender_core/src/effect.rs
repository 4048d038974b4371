use crate::{Document, KeywordSet, RequestSeq, Stage};

/// Remote work requested by `update`. Each carries the sequence number its
/// completion must echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AnalyzeDocument { seq: RequestSeq, document: Document },
    ExtractKeywords { seq: RequestSeq, summary: String },
    FetchJobs { seq: RequestSeq, keywords: KeywordSet },
}

impl Effect {
    pub fn stage(&self) -> Stage {
        match self {
            Effect::AnalyzeDocument { .. } => Stage::Analyze,
            Effect::ExtractKeywords { .. } => Stage::ExtractKeywords,
            Effect::FetchJobs { .. } => Stage::FetchJobs,
        }
    }

    pub fn seq(&self) -> RequestSeq {
        match self {
            Effect::AnalyzeDocument { seq, .. }
            | Effect::ExtractKeywords { seq, .. }
            | Effect::FetchJobs { seq, .. } => *seq,
        }
    }
}
