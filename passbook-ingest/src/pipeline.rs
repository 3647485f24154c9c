//! Document pipeline: pages of tokens in, ordered records out.
//!
//! Header detection runs once on the first page; every line of every page
//! then passes through noise classification, column assignment and the
//! record assembler in document order.

use passbook_core::error::Result;
use passbook_core::{BankProfile, ColumnLayout, LayoutError, Line, Page, Record};
use serde::Serialize;
use tracing::{debug, warn};

use crate::assembler::{AssemblerState, ClassifiedLine, LineOutcome, RecordAssembler};
use crate::columns::assign_columns;
use crate::header::{detect_header, repeats_header};
use crate::lines::{group_lines, validate_tokens};
use crate::noise::{is_noise, is_transaction_start};

/// Why a document produced no records even though its pages were usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionFailure {
    /// Fewer categories than the profile minimum within the scan limit
    HeaderNotFound { best_match: usize },
}

/// Per-document counters; dropped input is reported, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub pages: usize,
    pub lines: usize,
    pub rejected_tokens: usize,
    pub header_rows: usize,
    pub preamble_lines: usize,
    pub noise_lines: usize,
    pub orphan_lines: usize,
    pub continuation_lines: usize,
    pub records: usize,
}

impl ExtractionStats {
    fn count(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::HeaderRow => self.header_rows += 1,
            LineOutcome::Preamble => self.preamble_lines += 1,
            LineOutcome::Noise => self.noise_lines += 1,
            LineOutcome::Orphan => self.orphan_lines += 1,
            LineOutcome::Continued => self.continuation_lines += 1,
            LineOutcome::Opened => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// In the order transactions were opened
    pub records: Vec<Record>,
    pub layout: Option<ColumnLayout>,
    pub failure: Option<ExtractionFailure>,
    pub stats: ExtractionStats,
}

fn page_width(page: &Page, index: usize) -> Result<f64> {
    match page.width {
        None => Err(LayoutError::MissingPageWidth { page: index }),
        Some(w) if !w.is_finite() || w <= 0.0 => {
            Err(LayoutError::InvalidPageWidth { page: index, width: w })
        }
        Some(w) => Ok(w),
    }
}

/// Reconstructs the transaction records of one document.
///
/// Only pages without a usable width are errors; a document without a
/// recognizable header yields no records and
/// [`ExtractionFailure::HeaderNotFound`].
pub fn extract(pages: &[Page], profile: &BankProfile) -> Result<Extraction> {
    let widths = pages
        .iter()
        .enumerate()
        .map(|(i, p)| page_width(p, i))
        .collect::<Result<Vec<_>>>()?;

    let mut stats = ExtractionStats {
        pages: pages.len(),
        ..ExtractionStats::default()
    };

    let page_lines: Vec<Vec<Line>> = pages
        .iter()
        .map(|page| {
            let valid = validate_tokens(&page.words);
            stats.rejected_tokens += valid.rejected;
            group_lines(valid.tokens, profile.lines().tolerance)
        })
        .collect();
    stats.lines = page_lines.iter().map(Vec::len).sum();

    let detected = match (page_lines.first(), widths.first()) {
        (Some(lines), Some(width)) => detect_header(lines, profile, *width).map_err(|e| e.best_match),
        _ => Err(0),
    };
    let layout = match detected {
        Ok(layout) => layout,
        Err(best_match) => {
            warn!(bank = profile.key(), best_match, "no table header found, skipping document");
            return Ok(Extraction {
                records: Vec::new(),
                layout: None,
                failure: Some(ExtractionFailure::HeaderNotFound { best_match }),
                stats,
            });
        }
    };

    let assembler = RecordAssembler::new(profile, &layout, 0);
    let mut records = Vec::new();
    let mut state = AssemblerState::default();

    for (page, lines) in page_lines.iter().enumerate() {
        for line in lines {
            let classified = ClassifiedLine {
                page,
                top: line.top(),
                bottom: line.bottom(),
                is_noise: is_noise(line, profile),
                is_start: is_transaction_start(line, profile),
                repeats_header: page != 0 && repeats_header(line, profile, &layout),
                cells: assign_columns(line, &layout.boundaries),
            };
            let (next, outcome) = assembler.step(state, &classified, &mut records);
            state = next;
            stats.count(outcome);
        }
        debug!(page, records = records.len(), "page done");
    }
    assembler.finish(state, &mut records);
    stats.records = records.len();

    Ok(Extraction {
        records,
        layout: Some(layout),
        failure: None,
        stats,
    })
}
