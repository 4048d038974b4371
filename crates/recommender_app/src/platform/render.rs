use std::fmt::Write;

use recommender_core::{JobListing, JobPosting, PipelineView, StageView};

/// Plain-text rendering of a pipeline snapshot.
pub fn render(view: &PipelineView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(view));
    out.push_str(&render_analysis(view));
    out.push_str(&render_recommendations(view));
    out
}

pub fn render_analysis(view: &PipelineView) -> String {
    let mut out = String::new();
    if let Some(analysis) = &view.analysis {
        let _ = writeln!(out, "\n== Summary ==\n{}", analysis.summary());
        let _ = writeln!(out, "\n== Skill gaps ==\n{}", analysis.gaps());
        let _ = writeln!(out, "\n== Roadmap ==\n{}", analysis.roadmap());
    }
    if let StageView::Failed { message, .. } = &view.analyze {
        let _ = writeln!(out, "\nAnalysis failed: {message}");
    }
    out
}

pub fn render_recommendations(view: &PipelineView) -> String {
    let mut out = String::new();
    if let Some(query) = &view.keywords_query {
        let _ = writeln!(out, "\n== Keywords ==\n{query}");
    }
    if let StageView::Failed { message, .. } = &view.keywords {
        let _ = writeln!(out, "\nKeyword extraction failed: {message}");
    }

    match &view.listing {
        Some(listing) if listing.is_empty() => {
            let _ = writeln!(out, "\nNo matching jobs found.");
        }
        Some(listing) => {
            let _ = writeln!(out, "\n== Jobs ({}) ==", listing.len());
            render_listing(&mut out, listing);
        }
        None => {}
    }
    if let StageView::Failed { message, .. } = &view.jobs {
        let _ = writeln!(out, "\nJob search failed: {message}");
    }
    out
}

/// One line summarising every stage.
pub fn status_line(view: &PipelineView) -> String {
    let document = view.document_name.as_deref().unwrap_or("no document");
    format!(
        "{document} | analyze: {} | keywords: {} | jobs: {}",
        stage_label(&view.analyze),
        stage_label(&view.keywords),
        stage_label(&view.jobs)
    )
}

fn stage_label(stage: &StageView) -> String {
    match stage {
        StageView::Idle => "idle".to_string(),
        StageView::InFlight => "working".to_string(),
        StageView::Succeeded => "done".to_string(),
        StageView::Failed { kind, .. } => format!("failed ({kind})"),
    }
}

fn render_listing(out: &mut String, listing: &JobListing) {
    match listing {
        JobListing::Grouped(groups) => {
            for group in groups {
                let name = group.source.as_deref().unwrap_or("other");
                let _ = writeln!(out, "-- {name} ({}) --", group.postings.len());
                if group.postings.is_empty() {
                    let _ = writeln!(out, "   (no postings)");
                }
                for posting in &group.postings {
                    let _ = writeln!(out, "{}", format_posting(posting));
                }
            }
        }
        JobListing::Flat(postings) => {
            if postings.is_empty() {
                let _ = writeln!(out, "   (no postings)");
            }
            for posting in postings {
                let _ = writeln!(out, "{}", format_posting(posting));
            }
        }
    }
}

fn format_posting(posting: &JobPosting) -> String {
    let mut line = format!(" * {} at {}", posting.title, posting.company_name);
    if let Some(location) = &posting.location {
        let _ = write!(line, " ({location})");
    }
    match (&posting.url, posting.is_actionable()) {
        (Some(url), true) => {
            let _ = write!(line, " <{url}>");
        }
        _ => line.push_str(" [no link]"),
    }
    line
}
