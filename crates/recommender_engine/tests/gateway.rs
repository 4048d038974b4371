use std::time::Duration;

use pretty_assertions::assert_eq;
use recommender_core::{Document, ErrorKind, JobCollection, KeywordSet, ServiceError};
use recommender_engine::{Gateway, GatewaySettings, ReqwestGateway};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> ReqwestGateway {
    ReqwestGateway::new(GatewaySettings {
        base_url: server.uri(),
        ..GatewaySettings::default()
    })
    .expect("gateway")
}

fn resume() -> Document {
    Document::new("cv.pdf", "application/pdf", b"%PDF-1.7 resume".to_vec())
}

#[tokio::test]
async fn analyze_returns_complete_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze/resume"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Data scientist with NLP experience.",
            "gaps": "Needs evidence in: Cloud platforms",
            "roadmap": "- Earn a cloud cert"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analysis = gateway_for(&server)
        .analyze_document(&resume())
        .await
        .expect("analysis");

    assert_eq!(analysis.summary(), "Data scientist with NLP experience.");
    assert_eq!(analysis.gaps(), "Needs evidence in: Cloud platforms");
    assert_eq!(analysis.roadmap(), "- Earn a cloud cert");
}

#[tokio::test]
async fn analyze_missing_field_is_incomplete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze/resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Only a summary",
            "gaps": ""
        })))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .analyze_document(&resume())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompleteResponse);
}

#[tokio::test]
async fn analyze_non_json_success_is_incomplete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze/resume"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .analyze_document(&resume())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompleteResponse);
}

#[tokio::test]
async fn analyze_rejected_document_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze/resume"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Only PDF files are supported"})),
        )
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .analyze_document(&resume())
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::validation("Only PDF files are supported"));
}

#[tokio::test]
async fn analyze_server_failure_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze/resume"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .analyze_document(&resume())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Server { status: 503, .. }));
}

#[tokio::test]
async fn analyze_connection_refused_is_unreachable() {
    // Grab a free port and close it again so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = ReqwestGateway::new(GatewaySettings {
        base_url: format!("http://{addr}"),
        connect_timeout: Duration::from_millis(500),
        ..GatewaySettings::default()
    })
    .unwrap();

    let err = gateway.analyze_document(&resume()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unreachable);
}

#[tokio::test]
async fn slow_service_times_out_as_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/keywords"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"keywords": "late"})),
        )
        .mount(&server)
        .await;

    let gateway = ReqwestGateway::new(GatewaySettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..GatewaySettings::default()
    })
    .unwrap();

    let err = gateway.extract_keywords("A summary").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unreachable);
}

#[tokio::test]
async fn keywords_are_posted_as_json_and_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/keywords"))
        .and(body_json(json!({"summary": "Data scientist working on NLP."})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"keywords": "Data Scientist, NLP Engineer\n"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let keywords = gateway_for(&server)
        .extract_keywords("Data scientist working on NLP.")
        .await
        .expect("keywords");

    assert_eq!(keywords.to_query(), "Data Scientist, NLP Engineer");
}

#[tokio::test]
async fn empty_summary_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/keywords"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway_for(&server).extract_keywords("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn flat_jobs_are_normalized_with_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(query_param("keywords", "Data Scientist, NLP Engineer"))
        .and(query_param("rows", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [
                {"title": "Data Scientist", "companyName": "Acme", "url": "https://jobs.example/1", "source": "Remotive"},
                {"title": "NLP Engineer", "companyName": "Globex", "link": "https://jobs.example/2"}
            ]
        })))
        .mount(&server)
        .await;

    let keywords = KeywordSet::parse("Data Scientist, NLP Engineer");
    let jobs = gateway_for(&server).fetch_jobs(&keywords).await.expect("jobs");

    let JobCollection::Flat(postings) = jobs else {
        panic!("expected flat collection");
    };
    assert_eq!(postings.len(), 2);
    assert_eq!(postings[0].title, "Data Scientist");
    assert_eq!(postings[0].source.as_deref(), Some("Remotive"));
    assert_eq!(postings[1].url.as_deref(), Some("https://jobs.example/2"));
    assert!(postings.iter().all(|p| p.is_actionable()));
}

#[tokio::test]
async fn source_keyed_jobs_keep_every_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "linkedin_jobs": [
                {"title": "Data Scientist", "companyName": "Initech", "link": "https://li.example/1", "location": "Remote"}
            ],
            "naukri_jobs": []
        })))
        .mount(&server)
        .await;

    let jobs = gateway_for(&server)
        .fetch_jobs(&KeywordSet::parse("Data Scientist"))
        .await
        .expect("jobs");

    let JobCollection::BySource(groups) = jobs else {
        panic!("expected source-keyed collection");
    };
    let names: Vec<_> = groups.iter().map(|g| g.source.as_str()).collect();
    assert_eq!(names, vec!["linkedin_jobs", "naukri_jobs"]);
    assert_eq!(groups[0].postings[0].location.as_deref(), Some("Remote"));
    assert!(groups[1].postings.is_empty());
}

#[tokio::test]
async fn empty_job_result_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": []})))
        .mount(&server)
        .await;

    let jobs = gateway_for(&server)
        .fetch_jobs(&KeywordSet::parse("Underwater Basket Weaving"))
        .await
        .expect("jobs");

    assert!(jobs.is_empty());
}

#[tokio::test]
async fn job_search_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "Job search failed: feed timeout"})),
        )
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .fetch_jobs(&KeywordSet::parse("Data Scientist"))
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::server(500, "Job search failed: feed timeout"));
}

#[tokio::test]
async fn health_probe_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    assert_eq!(gateway_for(&server).health().await, Ok(()));
}

#[tokio::test]
async fn health_probe_rejects_other_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "starting"})))
        .mount(&server)
        .await;

    let err = gateway_for(&server).health().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompleteResponse);
}
