use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::ServiceError;

/// Result of analyzing one resume. All three parts are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    summary: String,
    gaps: String,
    roadmap: String,
}

impl Analysis {
    /// Builds an analysis from possibly-missing parts.
    ///
    /// Absent or blank parts are reported together as an incomplete response,
    /// so a partial analysis never exists as a value.
    pub fn from_parts(
        summary: Option<String>,
        gaps: Option<String>,
        roadmap: Option<String>,
    ) -> Result<Self, ServiceError> {
        let mut missing = Vec::new();
        let summary = require(summary, "summary", &mut missing);
        let gaps = require(gaps, "gaps", &mut missing);
        let roadmap = require(roadmap, "roadmap", &mut missing);

        match (summary, gaps, roadmap) {
            (Some(summary), Some(gaps), Some(roadmap)) => Ok(Self {
                summary,
                gaps,
                roadmap,
            }),
            _ => Err(ServiceError::incomplete(format!(
                "missing analysis field(s): {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn gaps(&self) -> &str {
        &self.gaps
    }

    pub fn roadmap(&self) -> &str {
        &self.roadmap
    }
}

fn require(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text),
        _ => {
            missing.push(name);
            None
        }
    }
}

/// Ordered set of distinct search terms derived from an analysis summary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    /// Parses the delimited keyword string returned by the extraction service.
    ///
    /// Newlines are stripped, whitespace inside a term is collapsed, terms are
    /// split on `,` or `;`, and repeats are dropped case-insensitively keeping
    /// the first spelling.
    pub fn parse(raw: &str) -> Self {
        Self::from_terms(raw.split([',', ';']))
    }

    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|term| !term.is_empty())
            .filter(|term| seen.insert(term.to_lowercase()))
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Query string sent to the job aggregation service.
    pub fn to_query(&self) -> String {
        self.terms.join(", ")
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// One recommended role, already normalized from whatever shape its feed used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub title: String,
    pub company_name: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
}

impl JobPosting {
    pub fn new(title: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company_name: company_name.into(),
            location: None,
            url: None,
            source: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the posting links somewhere a user can follow.
    ///
    /// Postings without an absolute http(s) link are still shown, just ranked
    /// as lower value by the presentation layer.
    pub fn is_actionable(&self) -> bool {
        self.url
            .as_deref()
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .is_some_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub source: String,
    pub postings: Vec<JobPosting>,
}

impl SourceGroup {
    pub fn new(source: impl Into<String>, postings: Vec<JobPosting>) -> Self {
        Self {
            source: source.into(),
            postings,
        }
    }
}

/// Job search result in whichever shape the deployment returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCollection {
    /// One list; each posting may carry its own `source` tag.
    Flat(Vec<JobPosting>),
    /// Named lists, one per upstream feed.
    BySource(Vec<SourceGroup>),
}

impl JobCollection {
    pub fn empty() -> Self {
        Self::Flat(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Flat(postings) => postings.len(),
            Self::BySource(groups) => groups.iter().map(|group| group.postings.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobCollection {
    fn default() -> Self {
        Self::empty()
    }
}
