use recommender_core::{
    update, AggregateOptions, Analysis, AppState, Document, DocumentPolicy, Effect, ErrorKind,
    JobCollection, JobListing, JobPosting, KeywordSet, Layout, Msg, RequestSeq, ServiceError,
    SourceGroup, StageState, StageView,
};

fn init_logging() {
    recommender_logging::initialize_for_tests();
}

fn analyzed_state(options: AggregateOptions) -> AppState {
    let state = AppState::with_options(DocumentPolicy::default(), options);
    let doc = Document::new("cv.pdf", "application/pdf", vec![1; 2 * 1024 * 1024]);
    let (state, effects) = update(state, Msg::DocumentSubmitted(doc));
    let seq = effects[0].seq();
    let analysis = Analysis::from_parts(
        Some("Data scientist working on NLP.".into()),
        Some("MLOps tooling".into()),
        Some("- Ship one pipeline".into()),
    )
    .unwrap();
    let (state, _) = update(
        state,
        Msg::AnalysisCompleted {
            seq,
            result: Ok(analysis),
        },
    );
    state
}

fn request(state: AppState) -> (AppState, RequestSeq, String) {
    let (state, effects) = update(state, Msg::RecommendationsRequested);
    match effects.as_slice() {
        [Effect::ExtractKeywords { seq, summary }] => (state, *seq, summary.clone()),
        other => panic!("expected keyword extraction, got {other:?}"),
    }
}

fn keywords_done(
    state: AppState,
    seq: RequestSeq,
    result: Result<KeywordSet, ServiceError>,
) -> (AppState, Vec<Effect>) {
    update(state, Msg::KeywordsCompleted { seq, result })
}

#[test]
fn keywords_are_extracted_before_jobs_are_fetched() {
    init_logging();
    let state = analyzed_state(AggregateOptions::default());

    let (state, kw_seq, summary) = request(state);
    assert_eq!(summary, "Data scientist working on NLP.");
    assert!(state.keywords().is_in_flight());
    assert_eq!(state.jobs(), &StageState::Idle);

    let (state, effects) = keywords_done(
        state,
        kw_seq,
        Ok(KeywordSet::parse("Data Scientist, NLP Engineer\n")),
    );
    let [Effect::FetchJobs { seq: jobs_seq, keywords }] = effects.as_slice() else {
        panic!("expected job fetch, got {effects:?}");
    };
    assert_eq!(keywords.to_query(), "Data Scientist, NLP Engineer");
    assert!(state.jobs().is_in_flight());
    assert_eq!(
        state.view().keywords_query.as_deref(),
        Some("Data Scientist, NLP Engineer")
    );

    let postings = vec![
        JobPosting::new("Data Scientist", "Acme").with_source("Remotive"),
        JobPosting::new("NLP Engineer", "Globex").with_source("WeWorkRemotely"),
    ];
    let (state, effects) = update(
        state,
        Msg::JobsCompleted {
            seq: *jobs_seq,
            result: Ok(JobCollection::Flat(postings)),
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.jobs, StageView::Succeeded);
    let listing = view.listing.expect("listing");
    assert!(listing.postings().any(|p| p.title == "Data Scientist"));
    assert!(view.can_request);
}

#[test]
fn keyword_failure_never_starts_job_search() {
    init_logging();
    let (state, kw_seq, _) = request(analyzed_state(AggregateOptions::default()));

    let (state, effects) = keywords_done(state, kw_seq, Err(ServiceError::server(502, "")));

    assert!(effects.is_empty());
    assert_eq!(state.jobs(), &StageState::Idle);
    assert!(matches!(
        state.view().keywords,
        StageView::Failed {
            kind: ErrorKind::Server,
            ..
        }
    ));
}

#[test]
fn empty_keyword_set_settles_jobs_without_a_request() {
    init_logging();
    let (state, kw_seq, _) = request(analyzed_state(AggregateOptions::default()));

    let (state, effects) = keywords_done(state, kw_seq, Ok(KeywordSet::default()));

    assert!(effects.is_empty());
    assert_eq!(state.keywords(), &StageState::Succeeded(KeywordSet::default()));
    assert_eq!(state.jobs(), &StageState::Succeeded(JobCollection::empty()));
}

#[test]
fn empty_job_result_is_success() {
    init_logging();
    let (state, kw_seq, _) = request(analyzed_state(AggregateOptions::default()));
    let (state, effects) = keywords_done(state, kw_seq, Ok(KeywordSet::parse("Quantum Basket Weaver")));
    let seq = effects[0].seq();

    let (state, _) = update(
        state,
        Msg::JobsCompleted {
            seq,
            result: Ok(JobCollection::Flat(Vec::new())),
        },
    );

    assert_eq!(state.view().jobs, StageView::Succeeded);
    assert_eq!(state.view().listing.map(|l| l.len()), Some(0));
}

#[test]
fn repeated_request_supersedes_previous_job_search() {
    init_logging();
    let (state, kw_seq, _) = request(analyzed_state(AggregateOptions::default()));
    let (state, effects) = keywords_done(state, kw_seq, Ok(KeywordSet::parse("Data Scientist")));
    let old_jobs_seq = effects[0].seq();

    // Second request while the first job search is still out.
    let (state, kw_seq2, _) = request(state);
    assert_eq!(state.jobs(), &StageState::Idle);

    let (state, effects) = update(
        state,
        Msg::JobsCompleted {
            seq: old_jobs_seq,
            result: Ok(JobCollection::Flat(vec![JobPosting::new("Stale", "Old Co")])),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.jobs(), &StageState::Idle);

    let (state, effects) = keywords_done(state, kw_seq2, Ok(KeywordSet::parse("NLP Engineer")));
    let new_jobs_seq = effects[0].seq();
    assert!(new_jobs_seq > old_jobs_seq);
    assert!(state.jobs().is_in_flight());
}

#[test]
fn refresh_keeps_previous_listing_visible() {
    init_logging();
    let (state, kw_seq, _) = request(analyzed_state(AggregateOptions::default()));
    let (state, effects) = keywords_done(state, kw_seq, Ok(KeywordSet::parse("Data Scientist")));
    let (state, _) = update(
        state,
        Msg::JobsCompleted {
            seq: effects[0].seq(),
            result: Ok(JobCollection::Flat(vec![JobPosting::new("Data Scientist", "Acme")])),
        },
    );

    let (state, kw_seq, _) = request(state);
    let (state, _) = keywords_done(state, kw_seq, Ok(KeywordSet::parse("Data Scientist")));

    let view = state.view();
    assert_eq!(view.jobs, StageView::InFlight);
    assert_eq!(view.listing.map(|l| l.len()), Some(1));
    assert!(!view.can_request);
}

#[test]
fn view_uses_configured_layout() {
    init_logging();
    let options = AggregateOptions {
        layout: Layout::Grouped,
        source_order: vec!["naukri".into()],
        expected_sources: vec!["naukri".into(), "linkedin".into()],
    };
    let (state, kw_seq, _) = request(analyzed_state(options));
    let (state, effects) = keywords_done(state, kw_seq, Ok(KeywordSet::parse("Data Scientist")));
    let raw = JobCollection::BySource(vec![SourceGroup::new(
        "linkedin",
        vec![JobPosting::new("Data Scientist", "Initech")],
    )]);
    let (state, _) = update(
        state,
        Msg::JobsCompleted {
            seq: effects[0].seq(),
            result: Ok(raw),
        },
    );

    let Some(JobListing::Grouped(groups)) = state.view().listing else {
        panic!("expected grouped listing");
    };
    let names: Vec<_> = groups.iter().map(|g| g.source.as_deref()).collect();
    assert_eq!(names, vec![Some("naukri"), Some("linkedin")]);
    assert!(groups[0].postings.is_empty());
    assert_eq!(groups[1].postings.len(), 1);
}
