//! Record assembly: the per-document state machine that turns classified
//! lines into finalized transaction records.
//!
//! The state is an explicit value handed to [`RecordAssembler::step`] and
//! returned from it, so the page/line loop owns it and page boundaries are
//! ordinary iterations: an open record survives them untouched.

use passbook_core::{BankProfile, Category, ColumnLayout, Record};
use regex::Regex;
use tracing::debug;

use crate::columns::RowCells;

/// A data line after noise classification and column assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    /// Zero-based page index
    pub page: usize,
    pub top: f64,
    pub bottom: f64,
    /// Noise after the transaction-start override
    pub is_noise: bool,
    pub is_start: bool,
    /// Header vocabulary on a page after the header page
    pub repeats_header: bool,
    pub cells: RowCells,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssemblerState {
    #[default]
    NoOpenRecord,
    OpenRecord { current: Record, last_bottom: f64 },
}

/// What a line did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    HeaderRow,
    Preamble,
    Noise,
    Opened,
    Continued,
    Orphan,
}

/// Transition rules for one document. Holds geometry and profile, never state.
#[derive(Debug, Clone)]
pub struct RecordAssembler<'p> {
    profile: &'p BankProfile,
    columns: Vec<Category>,
    header_top: f64,
    header_page: usize,
    narrative: Option<Category>,
}

/// Date-column text split into date, time and leftover words.
struct DateCell<'t> {
    date: Option<&'t str>,
    time: Option<&'t str>,
    spill: String,
}

fn split_date_cell<'t>(text: &'t str, date_re: &Regex, time_re: &Regex) -> DateCell<'t> {
    let date = date_re.find(text).map(|m| m.as_str());
    let time = time_re.find(text).map(|m| m.as_str());
    let mut rest = text.to_string();
    for part in [date, time].into_iter().flatten() {
        rest = rest.replacen(part, "", 1);
    }
    let spill = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    let spill = if spill.chars().count() < 2 { String::new() } else { spill };
    DateCell { date, time, spill }
}

impl<'p> RecordAssembler<'p> {
    pub fn new(profile: &'p BankProfile, layout: &ColumnLayout, header_page: usize) -> Self {
        let columns = layout.categories();
        let narrative = columns.iter().copied().find(Category::is_narrative);
        Self {
            profile,
            columns,
            header_top: layout.header_top,
            header_page,
            narrative,
        }
    }

    /// Applies one line to `state`; finalized records are pushed to `out`.
    pub fn step(
        &self,
        state: AssemblerState,
        line: &ClassifiedLine,
        out: &mut Vec<Record>,
    ) -> (AssemblerState, LineOutcome) {
        let row_tolerance = self.profile.header().row_tolerance;

        // Later pages only skip a real repeat of the header, never a transaction.
        let at_header_row = (line.top - self.header_top).abs() <= row_tolerance;
        let is_header = if line.page == self.header_page {
            at_header_row
        } else {
            at_header_row && line.repeats_header && !line.is_start
        };
        if is_header {
            return (state, LineOutcome::HeaderRow);
        }
        if line.page == self.header_page && line.top < self.header_top - row_tolerance {
            return (state, LineOutcome::Preamble);
        }
        if line.is_noise && !line.is_start {
            return (state, LineOutcome::Noise);
        }

        if line.is_start {
            if let AssemblerState::OpenRecord { current, .. } = state {
                out.push(current);
            }
            let current = self.open(&line.cells);
            return (
                AssemblerState::OpenRecord {
                    current,
                    last_bottom: line.bottom,
                },
                LineOutcome::Opened,
            );
        }

        match state {
            AssemblerState::OpenRecord {
                mut current,
                last_bottom,
            } if line.top - last_bottom < self.profile.lines().continuation_gap => {
                self.merge(&mut current, &line.cells);
                (
                    AssemblerState::OpenRecord {
                        current,
                        last_bottom: line.bottom,
                    },
                    LineOutcome::Continued,
                )
            }
            state => {
                debug!(page = line.page, top = line.top, "dropping orphan line");
                (state, LineOutcome::Orphan)
            }
        }
    }

    /// End of stream: finalizes the open record, if any.
    pub fn finish(&self, state: AssemblerState, out: &mut Vec<Record>) {
        if let AssemblerState::OpenRecord { current, .. } = state {
            out.push(current);
        }
    }

    fn open(&self, cells: &RowCells) -> Record {
        let mut record = Record::with_columns(&self.columns);
        for (cat, text) in cells.iter() {
            if cat != Category::Date {
                record.set(cat, text);
            }
        }

        let raw = cells.get(Category::Date);
        if raw.is_empty() {
            return record;
        }
        let cell = split_date_cell(raw, self.profile.date_pattern(), self.profile.time_pattern());
        match (cell.date, self.narrative) {
            (Some(date), Some(narrative)) => {
                let stamp = [Some(date), cell.time].into_iter().flatten().collect::<Vec<_>>();
                record.set(Category::Date, stamp.join(" "));
                record.prepend(narrative, &cell.spill);
            }
            (Some(date), None) if cell.spill.is_empty() => {
                let stamp = [Some(date), cell.time].into_iter().flatten().collect::<Vec<_>>();
                record.set(Category::Date, stamp.join(" "));
            }
            _ => record.set(Category::Date, raw),
        }
        record
    }

    fn merge(&self, record: &mut Record, cells: &RowCells) {
        let raw = cells.get(Category::Date);
        if !raw.is_empty() {
            let cell = split_date_cell(raw, self.profile.date_pattern(), self.profile.time_pattern());
            match (cell.date, cell.time) {
                // a wrapped timestamp belongs to the record's date
                (None, Some(time)) => {
                    if !record.get(Category::Date).contains(time) {
                        record.append(Category::Date, time);
                    }
                    if let Some(narrative) = self.narrative {
                        record.append(narrative, &cell.spill);
                    }
                }
                _ => match self.narrative {
                    Some(narrative) => record.append(narrative, raw),
                    None => {
                        record.fill_if_empty(Category::Date, raw);
                    }
                },
            }
        }

        for (cat, text) in cells.iter() {
            if cat == Category::Date {
                continue;
            }
            if cat.is_narrative() {
                record.append(cat, text);
            } else {
                record.fill_if_empty(cat, text);
            }
        }
    }
}
