use recommender_logging::{rec_debug, rec_info, rec_warn};

use crate::{
    AppState, Document, Effect, JobCollection, KeywordSet, Msg, RequestSeq, ServiceError, Stage,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSubmitted(document) => submit_document(&mut state, document),
        Msg::RecommendationsRequested => request_recommendations(&mut state),
        Msg::AnalysisCompleted { seq, result } => {
            if state.analyze.resolve(seq, result) {
                log_settled(Stage::Analyze, seq, state.analyze().error());
                state.mark_dirty();
            } else {
                log_stale(Stage::Analyze, seq, state.analyze.latest());
            }
            Vec::new()
        }
        Msg::KeywordsCompleted { seq, result } => keywords_completed(&mut state, seq, result),
        Msg::JobsCompleted { seq, result } => {
            if state.jobs.resolve(seq, result) {
                log_settled(Stage::FetchJobs, seq, state.jobs().error());
                state.mark_dirty();
            } else {
                log_stale(Stage::FetchJobs, seq, state.jobs.latest());
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn submit_document(state: &mut AppState, document: Document) -> Vec<Effect> {
    // Keywords and jobs describe the previous document; whatever happens to
    // this upload, they no longer apply.
    state.keywords.reset();
    state.jobs.reset();
    state.set_document_name(document.file_name.clone());
    state.mark_dirty();

    if let Err(err) = state.policy().validate(&document) {
        rec_warn!("Rejected document {:?}: {}", document.file_name, err);
        state.analyze.reject(err);
        return Vec::new();
    }

    let seq = state.analyze.begin();
    rec_info!(
        "analyze {} started for {:?} ({} bytes)",
        seq,
        document.file_name,
        document.len()
    );
    vec![Effect::AnalyzeDocument { seq, document }]
}

fn request_recommendations(state: &mut AppState) -> Vec<Effect> {
    let Some(summary) = state.recommendation_summary().map(ToOwned::to_owned) else {
        rec_debug!("Ignoring recommendation request without a successful analysis");
        return Vec::new();
    };

    // A job search from an earlier request would answer the wrong keywords.
    state.jobs.abandon();
    let seq = state.keywords.begin();
    state.mark_dirty();
    rec_info!("extract-keywords {} started", seq);
    vec![Effect::ExtractKeywords { seq, summary }]
}

fn keywords_completed(
    state: &mut AppState,
    seq: RequestSeq,
    result: Result<KeywordSet, ServiceError>,
) -> Vec<Effect> {
    let keywords = result.as_ref().ok().cloned();
    if !state.keywords.resolve(seq, result) {
        log_stale(Stage::ExtractKeywords, seq, state.keywords.latest());
        return Vec::new();
    }
    state.mark_dirty();
    log_settled(Stage::ExtractKeywords, seq, state.keywords().error());

    match keywords {
        None => Vec::new(),
        Some(keywords) if keywords.is_empty() => {
            rec_info!("No keywords extracted; job search skipped");
            state.jobs.settle(JobCollection::empty());
            Vec::new()
        }
        Some(keywords) => {
            let seq = state.jobs.begin();
            rec_info!("fetch-jobs {} started for {:?}", seq, keywords.to_query());
            vec![Effect::FetchJobs { seq, keywords }]
        }
    }
}

fn log_settled(stage: Stage, seq: RequestSeq, error: Option<&ServiceError>) {
    match error {
        None => rec_info!("{} {} succeeded", stage, seq),
        Some(err) => rec_warn!("{} {} failed: {}", stage, seq, err),
    }
}

fn log_stale(stage: Stage, seq: RequestSeq, latest: RequestSeq) {
    rec_warn!(
        "Discarding stale {} completion {} (latest issued {})",
        stage,
        seq,
        latest
    );
}
