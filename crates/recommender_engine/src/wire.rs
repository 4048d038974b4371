//! Service payload shapes and their normalization into core types.
//!
//! Provider-specific field names stop here; nothing past this module sees
//! `link`, `place` or `companyName`.
use recommender_core::{
    Analysis, JobCollection, JobPosting, KeywordSet, ServiceError, SourceGroup,
};
use recommender_logging::{rec_debug, rec_warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_DETAIL_LEN: usize = 300;
const TRUNCATED_MARKER: &str = "...";

#[derive(Debug, Serialize)]
pub(crate) struct KeywordsRequest<'a> {
    pub summary: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    summary: Option<String>,
    gaps: Option<String>,
    roadmap: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthPayload {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordsPayload {
    #[serde(default)]
    keywords: Option<KeywordsField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordsField {
    Joined(String),
    List(Vec<String>),
}

/// One posting as any feed sends it. Feeds differ in which link, company and
/// location fields they fill.
#[derive(Debug, Default, Deserialize)]
struct RawPosting {
    title: Option<String>,
    #[serde(rename = "companyName")]
    company_name: Option<String>,
    company: Option<String>,
    url: Option<String>,
    link: Option<String>,
    location: Option<String>,
    place: Option<String>,
    city: Option<String>,
    source: Option<String>,
}

impl RawPosting {
    fn into_posting(self) -> Option<JobPosting> {
        let title = non_blank(self.title)?;
        let company_name = non_blank(self.company_name).or_else(|| non_blank(self.company))?;
        Some(JobPosting {
            title,
            company_name,
            location: non_blank(self.location)
                .or_else(|| non_blank(self.place))
                .or_else(|| non_blank(self.city)),
            url: non_blank(self.url).or_else(|| non_blank(self.link)),
            source: non_blank(self.source),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub(crate) fn parse_analysis(body: &[u8]) -> Result<Analysis, ServiceError> {
    let payload: AnalysisPayload = serde_json::from_slice(body)
        .map_err(|err| ServiceError::incomplete(format!("malformed analysis payload: {err}")))?;
    Analysis::from_parts(payload.summary, payload.gaps, payload.roadmap)
}

/// The service is healthy only when it says `{"status": "ok"}`.
pub(crate) fn parse_health(body: &[u8]) -> Result<(), ServiceError> {
    let payload: HealthPayload = serde_json::from_slice(body)
        .map_err(|err| ServiceError::incomplete(format!("malformed health payload: {err}")))?;
    match payload.status.as_deref().map(str::trim) {
        Some(status) if status.eq_ignore_ascii_case("ok") => Ok(()),
        Some(status) => Err(ServiceError::incomplete(format!(
            "service reports status {status:?}"
        ))),
        None => Err(ServiceError::incomplete("health payload has no status")),
    }
}

/// A missing `keywords` field means the service found nothing, not an error.
pub(crate) fn parse_keywords(body: &[u8]) -> Result<KeywordSet, ServiceError> {
    let payload: KeywordsPayload = serde_json::from_slice(body)
        .map_err(|err| ServiceError::incomplete(format!("malformed keywords payload: {err}")))?;
    Ok(match payload.keywords {
        Some(KeywordsField::Joined(raw)) => KeywordSet::parse(&raw),
        Some(KeywordsField::List(terms)) => KeywordSet::from_terms(terms),
        None => KeywordSet::default(),
    })
}

/// Accepts `{"jobs": [...]}`, a bare array, or `{"<source>": [...], ...}`.
pub(crate) fn parse_jobs(body: &[u8]) -> Result<JobCollection, ServiceError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ServiceError::incomplete(format!("malformed jobs payload: {err}")))?;

    match value {
        Value::Array(items) => Ok(JobCollection::Flat(normalize_postings(items, "jobs"))),
        Value::Object(mut map) => {
            match map.remove("jobs") {
                Some(Value::Array(items)) => {
                    return Ok(JobCollection::Flat(normalize_postings(items, "jobs")));
                }
                Some(other) => {
                    return Err(ServiceError::incomplete(format!(
                        "jobs field is {}, expected an array",
                        json_type(&other)
                    )));
                }
                None => {}
            }
            let has_fields = !map.is_empty();
            let groups: Vec<SourceGroup> = map
                .into_iter()
                .filter_map(|(source, value)| match value {
                    Value::Array(items) => {
                        let postings = normalize_postings(items, &source);
                        Some(SourceGroup::new(source, postings))
                    }
                    _ => None,
                })
                .collect();
            if groups.is_empty() && has_fields {
                return Err(ServiceError::incomplete("jobs payload contains no posting lists"));
            }
            Ok(JobCollection::BySource(groups))
        }
        other => Err(ServiceError::incomplete(format!(
            "unexpected jobs payload type: {}",
            json_type(&other)
        ))),
    }
}

fn normalize_postings(items: Vec<Value>, list: &str) -> Vec<JobPosting> {
    let total = items.len();
    let postings: Vec<JobPosting> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawPosting>(item) {
            Ok(raw) => raw.into_posting(),
            Err(err) => {
                rec_debug!("Unreadable posting in {:?}: {}", list, err);
                None
            }
        })
        .collect();
    if postings.len() < total {
        rec_warn!(
            "Dropped {} of {} postings in {:?} without a title or company",
            total - postings.len(),
            total,
            list
        );
    }
    postings
}

/// Best-effort human-readable detail from an error response body.
pub(crate) fn error_detail(body: &[u8]) -> String {
    let detail = match serde_json::from_slice::<Value>(body) {
        Ok(value) => match value.get("detail").or_else(|| value.get("error")) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => value.to_string(),
        },
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    };
    truncate(detail)
}

fn truncate(text: String) -> String {
    if text.len() <= MAX_DETAIL_LEN {
        return text;
    }
    let mut end = MAX_DETAIL_LEN;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{TRUNCATED_MARKER}", &text[..end])
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
