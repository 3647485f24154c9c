//! Header-row detection and column boundary construction.
//!
//! Header labels are clustered from adjacent tokens, matched against the
//! profile's synonyms (substring first, then fuzzy partial ratio), and the
//! line with the most distinct categories becomes the header. Column edges
//! are the midpoints between neighbouring header spans.

use passbook_core::profile::HeaderRules;
use passbook_core::{BankProfile, Category, ColumnLayout, HeaderSpan, Line, Token};
use tracing::{debug, info};

use crate::fuzzy::{accepts, partial_ratio};
use crate::noise::matches_noise_rules;

/// No scanned line matched enough categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderNotFound {
    /// Distinct categories on the best candidate line
    pub best_match: usize,
}

/// Maps header text to a category.
///
/// A synonym contained in the text wins outright, first category in profile
/// order. Otherwise texts longer than three characters are scored against
/// every synonym and the best score is accepted above the fuzzy threshold.
pub fn classify_header_text(text: &str, rules: &HeaderRules) -> Option<Category> {
    let lower = text.to_lowercase();
    for set in &rules.synonyms {
        let hit = set
            .synonyms
            .iter()
            .any(|s| !s.is_empty() && lower.contains(&s.to_lowercase()));
        if hit {
            return Some(set.category);
        }
    }

    if text.chars().count() <= 3 {
        return None;
    }

    let mut best: Option<(Category, u8)> = None;
    for set in &rules.synonyms {
        for syn in &set.synonyms {
            let score = partial_ratio(text, syn);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((set.category, score));
            }
        }
    }
    best.filter(|(_, score)| accepts(*score, rules.fuzzy_threshold))
        .map(|(cat, _)| cat)
}

fn joined(tokens: &[&Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Groups horizontally adjacent tokens into header labels.
fn cluster_tokens<'a>(line: &'a Line, rules: &HeaderRules) -> Vec<Vec<&'a Token>> {
    let mut clusters = Vec::new();
    let mut tokens = line.tokens().iter();
    let Some(first) = tokens.next() else {
        return clusters;
    };
    let mut current = vec![first];

    for tok in tokens {
        let last_x1 = current.last().map(|t| t.x1).unwrap_or(tok.x0);
        let gap = tok.x0 - last_x1;
        let current_text = joined(&current);
        let current_cat = classify_header_text(&current_text, rules);
        let next_cat = classify_header_text(&tok.text, rules);

        let different = matches!((current_cat, next_cat), (Some(a), Some(b)) if a != b);
        let same = matches!((current_cat, next_cat), (Some(a), Some(b)) if a == b);

        let mut allowed = rules.merge_gap;
        if let Some(wide) = rules.wide_merge.as_ref().filter(|_| same) {
            let left = current_text.to_lowercase().contains(&wide.left_marker.to_lowercase());
            let right = tok.text.to_lowercase().contains(&wide.right_marker.to_lowercase());
            if left || right {
                allowed = wide.gap;
            }
        }

        if gap < allowed && !different {
            current.push(tok);
        } else {
            clusters.push(std::mem::replace(&mut current, vec![tok]));
        }
    }
    clusters.push(current);
    clusters
}

/// Printable ASCII only, whitespace collapsed.
fn sanitize(text: &str) -> String {
    let printable: String = text.chars().filter(|c| (' '..='~').contains(c)).collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matched header spans of one line, one per category (union of boxes).
fn header_spans(line: &Line, rules: &HeaderRules) -> Vec<HeaderSpan> {
    let mut spans: Vec<HeaderSpan> = Vec::new();
    for cluster in cluster_tokens(line, rules) {
        let text = sanitize(&joined(&cluster));
        if text.chars().count() < 2 {
            continue;
        }
        let Some(category) = classify_header_text(&text, rules) else {
            continue;
        };
        let x0 = cluster.iter().map(|t| t.x0).fold(f64::INFINITY, f64::min);
        let x1 = cluster.iter().map(|t| t.x1).fold(f64::NEG_INFINITY, f64::max);
        match spans.iter_mut().find(|s| s.category == category) {
            Some(span) => {
                span.x0 = span.x0.min(x0);
                span.x1 = span.x1.max(x1);
            }
            None => spans.push(HeaderSpan { category, x0, x1 }),
        }
    }
    spans
}

/// Whether `line` reads as a repeat of the detected header: its labels
/// name at least `min_categories` of the layout's columns.
pub fn repeats_header(line: &Line, profile: &BankProfile, layout: &ColumnLayout) -> bool {
    let rules = profile.header();
    let hits = header_spans(line, rules)
        .iter()
        .filter(|s| layout.contains(s.category))
        .count();
    hits >= rules.min_categories.min(layout.boundaries.len())
}

/// Locates the header row among the first page's lines and derives columns.
pub fn detect_header(
    lines: &[Line],
    profile: &BankProfile,
    page_width: f64,
) -> Result<ColumnLayout, HeaderNotFound> {
    let rules = profile.header();
    let mut best: Option<(&Line, Vec<HeaderSpan>)> = None;

    for line in lines.iter().take(rules.scan_limit) {
        if matches_noise_rules(&line.text(), profile.noise()) {
            continue;
        }
        let spans = header_spans(line, rules);
        let best_count = best.as_ref().map_or(0, |(_, s)| s.len());
        if spans.len() > best_count {
            best = Some((line, spans));
        }
    }

    let best_match = best.as_ref().map_or(0, |(_, s)| s.len());
    match best {
        Some((line, spans)) if spans.len() >= rules.min_categories => {
            let layout = ColumnLayout::from_spans(spans, page_width, line.top());
            info!(
                header = %line.text(),
                top = line.top(),
                columns = ?layout.categories(),
                "detected header row"
            );
            Ok(layout)
        }
        _ => {
            debug!(best_match, "no header row with enough categories");
            Err(HeaderNotFound { best_match })
        }
    }
}
