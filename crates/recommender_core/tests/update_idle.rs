use recommender_core::{update, AppState, Msg, RequestSeq, ServiceError, StageState};

#[test]
fn completion_without_request_is_ignored() {
    let state = AppState::new();
    let (mut next, effects) = update(
        state.clone(),
        Msg::AnalysisCompleted {
            seq: RequestSeq::new(7),
            result: Err(ServiceError::unreachable("late")),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn recommendations_without_analysis_are_ignored() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::RecommendationsRequested);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next.keywords(), &StageState::Idle);
    assert_eq!(next.jobs(), &StageState::Idle);
    assert!(!next.view().can_request);
}
