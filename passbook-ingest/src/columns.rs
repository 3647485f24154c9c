//! Token-to-column assignment for data lines.

use passbook_core::{Category, ColumnBoundary, Line, Token};

/// Text of one data line split by column, in column order.
///
/// Only categories that received at least one token are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCells {
    cells: Vec<(Category, String)>,
}

impl RowCells {
    pub fn get(&self, category: Category) -> &str {
        self.cells
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.cells.iter().map(|(c, v)| (*c, v.as_str()))
    }

    fn push(&mut self, category: Category, text: &str) {
        match self.cells.iter_mut().find(|(c, _)| *c == category) {
            Some((_, slot)) => {
                slot.push(' ');
                slot.push_str(text);
            }
            None => self.cells.push((category, text.to_string())),
        }
    }

    fn sort_by_columns(&mut self, boundaries: &[ColumnBoundary]) {
        let rank = |cat: &Category| boundaries.iter().position(|b| b.category == *cat);
        self.cells.sort_by_key(|(c, _)| rank(c));
    }
}

/// Index of the boundary that owns `token`.
///
/// Maximal overlap wins; equal overlaps go to the leftmost boundary. A
/// token overlapping nothing goes to the boundary whose centre is nearest
/// its own (again leftmost on ties).
pub fn owning_column(token: &Token, boundaries: &[ColumnBoundary]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, b) in boundaries.iter().enumerate() {
        let ov = b.overlap(token.x0, token.x1);
        if ov > 0.0 && best.is_none_or(|(j, o)| ov > o || (ov == o && b.x0 < boundaries[j].x0)) {
            best = Some((i, ov));
        }
    }
    if let Some((i, _)) = best {
        return Some(i);
    }

    let center = token.center_x();
    let mut nearest: Option<(usize, f64)> = None;
    for (i, b) in boundaries.iter().enumerate() {
        let dist = (b.center_x() - center).abs();
        if nearest.is_none_or(|(j, d)| dist < d || (dist == d && b.x0 < boundaries[j].x0)) {
            nearest = Some((i, dist));
        }
    }
    nearest.map(|(i, _)| i)
}

/// Maps every token of `line` to a column; same-column tokens are joined
/// with single spaces, left to right.
pub fn assign_columns(line: &Line, boundaries: &[ColumnBoundary]) -> RowCells {
    let mut cells = RowCells::default();
    for tok in line.tokens() {
        if let Some(i) = owning_column(tok, boundaries) {
            cells.push(boundaries[i].category, tok.text.trim());
        }
    }
    cells.sort_by_columns(boundaries);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries() -> Vec<ColumnBoundary> {
        [
            (Category::Date, 0.0, 161.0),
            (Category::Narration, 161.0, 256.0),
            (Category::Withdrawals, 256.0, 410.0),
            (Category::Deposits, 410.0, 520.0),
            (Category::Balance, 520.0, 612.0),
        ]
        .into_iter()
        .map(|(category, x0, x1)| ColumnBoundary { category, x0, x1 })
        .collect()
    }

    fn tok(text: &str, x0: f64, x1: f64) -> Token {
        Token::new(text, x0, x1, 100.0, 108.0)
    }

    #[test]
    fn test_assigns_by_overlap_and_joins() {
        let line = Line::from_tokens(vec![
            tok("01/11/25", 10.0, 50.0),
            tok("UPI-MERCHANT", 180.0, 240.0),
            tok("PAYMENT", 243.0, 280.0),
            tok("708.00", 330.0, 360.0),
        ])
        .unwrap();
        let cells = assign_columns(&line, &boundaries());
        assert_eq!(cells.get(Category::Date), "01/11/25");
        // PAYMENT overlaps Narration by 13 and Withdrawals by 24
        assert_eq!(cells.get(Category::Narration), "UPI-MERCHANT");
        assert_eq!(cells.get(Category::Withdrawals), "PAYMENT 708.00");
        assert_eq!(cells.get(Category::Deposits), "");
    }

    #[test]
    fn test_tie_goes_left() {
        let b = boundaries();
        // 20 units on each side of 410
        assert_eq!(owning_column(&tok("1,000.00", 390.0, 430.0), &b), Some(2));
    }

    #[test]
    fn test_zero_overlap_uses_nearest_centre() {
        let b = boundaries();
        assert_eq!(owning_column(&tok("x", 700.0, 720.0), &b), Some(4));
        // zero-width token exactly on an edge
        assert_eq!(owning_column(&tok("|", 20.0, 20.0), &b), Some(0));
    }

    #[test]
    fn test_cells_in_column_order() {
        let line = Line::from_tokens(vec![tok("9.00", 530.0, 560.0), tok("01/11/25", 10.0, 50.0)]).unwrap();
        let cells = assign_columns(&line, &boundaries());
        let order: Vec<_> = cells.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::Date, Category::Balance]);
    }
}
