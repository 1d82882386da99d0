//! HTML landing page.

use std::fmt::Write;

use crate::api::{DEFAULT_RESULTS_PER_PAGE, MAX_RESULTS_PER_PAGE};
use crate::contributors::ContributorStats;

const TITLE: &str = "Interswellar";

const COLLECTIONS: [&str; 4] = ["stars", "exoplanets", "constellations", "publications"];

/// Row counts per collection, in [`COLLECTIONS`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogTotals {
    pub stars: usize,
    pub exoplanets: usize,
    pub constellations: usize,
    pub publications: usize,
}

impl CatalogTotals {
    fn counts(&self) -> [usize; 4] {
        [
            self.stars,
            self.exoplanets,
            self.constellations,
            self.publications,
        ]
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(totals: &CatalogTotals, stats: &ContributorStats) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <p>A catalog of stars, exoplanets, constellations and the publications that describe them.</p>\n",
        title = TITLE
    );

    html.push_str("<h2>API</h2>\n<ul>\n");
    for (name, count) in COLLECTIONS.iter().zip(totals.counts()) {
        let _ = writeln!(
            html,
            "<li><a href=\"/api/v1/{name}\">/api/v1/{name}</a> ({count})</li>",
        );
    }
    let _ = writeln!(
        html,
        "</ul>\n<p>Collections accept <code>page</code> and <code>results_per_page</code> \
         (default {}, max {}).</p>",
        DEFAULT_RESULTS_PER_PAGE, MAX_RESULTS_PER_PAGE
    );

    html.push_str("<h2>Contributors</h2>\n");
    let contributors = stats.contributors();
    if contributors.is_empty() {
        html.push_str("<p>No contributor statistics available.</p>\n");
    } else {
        html.push_str(
            "<table>\n<thead><tr><th>Contributor</th><th>Commits</th><th>Issues</th></tr></thead>\n<tbody>\n",
        );
        for login in contributors {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(login),
                stats.commits.get(login).copied().unwrap_or(0),
                stats.issues.get(login).copied().unwrap_or(0),
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }
    let _ = write!(
        html,
        "<p>Total commits: {}. Total issues: {}.</p>\n<p><small>Updated {}</small></p>\n</body>\n</html>\n",
        stats.total_commits,
        stats.total_issues,
        stats.fetched_at.format("%Y-%m-%d %H:%M UTC"),
    );
    html
}
