//! Reshapes raw job search results into what the presentation layer lists.
use std::cmp::Ordering;

use crate::{JobCollection, JobPosting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One list per source.
    #[default]
    Grouped,
    /// Everything in one list.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateOptions {
    pub layout: Layout,
    /// Sources listed here come first, in this order. Others follow by name.
    pub source_order: Vec<String>,
    /// Sources that always get a group, even when the search returned none.
    pub expected_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobGroup {
    /// `None` collects postings that arrived without a provenance tag.
    pub source: Option<String>,
    pub postings: Vec<JobPosting>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobListing {
    Grouped(Vec<JobGroup>),
    Flat(Vec<JobPosting>),
}

impl JobListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Grouped(groups) => groups.iter().map(|group| group.postings.len()).sum(),
            Self::Flat(postings) => postings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn postings(&self) -> Box<dyn Iterator<Item = &JobPosting> + '_> {
        match self {
            Self::Grouped(groups) => Box::new(groups.iter().flat_map(|group| group.postings.iter())),
            Self::Flat(postings) => Box::new(postings.iter()),
        }
    }
}

/// Pure reshaping of a job search result; the input is never modified and
/// equal inputs always give equal listings.
///
/// Grouping a flat result keys on each posting's `source` tag. Flattening a
/// source-keyed result concatenates the groups in source order and stamps
/// untagged postings with their group name.
/// A flat result stays in server order when a flat listing is requested.
/// Nothing is deduplicated.
pub fn aggregate(raw: &JobCollection, options: &AggregateOptions) -> JobListing {
    match (raw, options.layout) {
        (JobCollection::Flat(postings), Layout::Flat) => JobListing::Flat(postings.clone()),
        (_, Layout::Grouped) => JobListing::Grouped(ordered_groups(raw, options)),
        (JobCollection::BySource(_), Layout::Flat) => JobListing::Flat(
            ordered_groups(raw, options)
                .into_iter()
                .flat_map(|group| {
                    let name = group.source;
                    group.postings.into_iter().map(move |mut posting| {
                        if posting.source.is_none() {
                            posting.source = name.clone();
                        }
                        posting
                    })
                })
                .collect(),
        ),
    }
}

fn ordered_groups(raw: &JobCollection, options: &AggregateOptions) -> Vec<JobGroup> {
    let mut groups: Vec<JobGroup> = Vec::new();
    match raw {
        JobCollection::Flat(postings) => {
            for posting in postings {
                group_for(&mut groups, posting.source.as_deref())
                    .postings
                    .push(posting.clone());
            }
        }
        JobCollection::BySource(sources) => {
            for source in sources {
                group_for(&mut groups, Some(source.source.as_str()))
                    .postings
                    .extend(source.postings.iter().cloned());
            }
        }
    }

    for expected in &options.expected_sources {
        group_for(&mut groups, Some(expected.as_str()));
    }

    groups.sort_by(|a, b| compare_groups(a, b, &options.source_order));
    groups
}

fn group_for<'a>(groups: &'a mut Vec<JobGroup>, source: Option<&str>) -> &'a mut JobGroup {
    let index = match groups.iter().position(|group| group.source.as_deref() == source) {
        Some(index) => index,
        None => {
            groups.push(JobGroup {
                source: source.map(ToOwned::to_owned),
                postings: Vec::new(),
            });
            groups.len() - 1
        }
    };
    &mut groups[index]
}

fn compare_groups(a: &JobGroup, b: &JobGroup, order: &[String]) -> Ordering {
    sort_key(a, order).cmp(&sort_key(b, order))
}

// Configured sources first, then named sources alphabetically, untagged last.
fn sort_key<'a>(group: &'a JobGroup, order: &[String]) -> (usize, bool, &'a str) {
    let name = group.source.as_deref();
    let position = name
        .and_then(|name| order.iter().position(|configured| configured == name))
        .unwrap_or(order.len());
    (position, name.is_none(), name.unwrap_or(""))
}
