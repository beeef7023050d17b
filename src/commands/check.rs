//! Check the collection for documents the site would skip or show badly

use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::content::ContentDocument;
use crate::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The document is left out of the listing
    Error,
    /// The document loads but is missing something the pages display
    Warning,
}

#[derive(Debug, Clone)]
pub struct Problem {
    pub path: PathBuf,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Report {
    /// Documents that loaded
    pub loaded: usize,
    pub problems: Vec<Problem>,
}

impl Report {
    pub fn error_count(&self) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
            .count()
    }
}

/// Scan the collection and collect every problem
pub fn check(site: &Site) -> Report {
    let collection = site.collection();
    let mut report = Report::default();

    for entry in collection.scan() {
        match entry.result {
            Ok(doc) => {
                report.loaded += 1;
                for message in lint(&doc) {
                    report.problems.push(Problem {
                        path: entry.path.clone(),
                        severity: Severity::Warning,
                        message,
                    });
                }
            }
            Err(e) => report.problems.push(Problem {
                path: entry.path,
                severity: Severity::Error,
                message: e.to_string(),
            }),
        }
    }

    report
}

/// Header problems of a loaded document
fn lint(doc: &ContentDocument) -> Vec<String> {
    let mut messages = Vec::new();

    for key in ["title", "description"] {
        if doc.get_str(key).map_or(true, |v| v.trim().is_empty()) {
            messages.push(format!("missing `{}`", key));
        }
    }

    match doc.date() {
        None => messages.push("missing `date`, sorted after dated posts".to_string()),
        Some(date) if !is_calendar_date(date) => messages.push(format!(
            "date {:?} is not YYYY-MM-DD, listing order may not be chronological",
            date
        )),
        Some(_) => {}
    }

    if doc.image().is_some() && doc.image_alt().is_none() {
        messages.push("`image` without `image_alt`, the title is used as alt text".to_string());
    }

    messages
}

/// Only zero-padded `YYYY-MM-DD` dates sort chronologically as strings
fn is_calendar_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

/// Print the report; fails when any document cannot be loaded
pub fn run(site: &Site) -> Result<()> {
    let report = check(site);

    for problem in &report.problems {
        let label = match problem.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}: {}: {}", label, problem.path.display(), problem.message);
    }

    println!(
        "Checked {} documents in {:?}: {} errors, {} warnings",
        report.loaded + report.error_count(),
        site.collection_dir,
        report.error_count(),
        report.problems.len() - report.error_count()
    );

    if report.error_count() > 0 {
        anyhow::bail!(
            "{} documents would be left out of the listing",
            report.error_count()
        );
    }

    Ok(())
}
