//! Header spans and the column boundaries derived from them

use serde::{Deserialize, Serialize};

use crate::Category;

/// Bounding box of every header token recognized as one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderSpan {
    pub category: Category,
    pub x0: f64,
    pub x1: f64,
}

/// Half-open interval `[x0, x1)` on the page-width axis owned by one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnBoundary {
    pub category: Category,
    pub x0: f64,
    pub x1: f64,
}

impl ColumnBoundary {
    /// Horizontal overlap with `[x0, x1]`, never negative.
    pub fn overlap(&self, x0: f64, x1: f64) -> f64 {
        (self.x1.min(x1) - self.x0.max(x0)).max(0.0)
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// The detected table geometry of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Ordered left to right, jointly covering `[0, page_width)`.
    pub boundaries: Vec<ColumnBoundary>,
    /// `top` of the header row on the page it was found on.
    pub header_top: f64,
    pub page_width: f64,
}

impl ColumnLayout {
    /// Applies the midpoint rule to header spans.
    ///
    /// Spans are sorted by `x0`; each interior edge sits halfway between one
    /// span's right edge and the next span's left edge. Edges are clamped to
    /// be non-decreasing so overlapping spans still produce ordered,
    /// contiguous intervals.
    pub fn from_spans(mut spans: Vec<HeaderSpan>, page_width: f64, header_top: f64) -> Self {
        spans.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let mut boundaries = Vec::with_capacity(spans.len());
        let mut left = 0.0;
        for (i, span) in spans.iter().enumerate() {
            let right = match spans.get(i + 1) {
                Some(next) => ((span.x1 + next.x0) / 2.0).clamp(left, page_width),
                None => page_width,
            };
            boundaries.push(ColumnBoundary {
                category: span.category,
                x0: left,
                x1: right,
            });
            left = right;
        }

        Self {
            boundaries,
            header_top,
            page_width,
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.boundaries.iter().map(|b| b.category).collect()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.boundaries.iter().any(|b| b.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(category: Category, x0: f64, x1: f64) -> HeaderSpan {
        HeaderSpan { category, x0, x1 }
    }

    #[test]
    fn test_midpoint_rule() {
        let layout = ColumnLayout::from_spans(
            vec![
                span(Category::Narration, 200.0, 250.0),
                span(Category::Date, 20.0, 40.0),
                span(Category::Balance, 300.0, 340.0),
            ],
            600.0,
            90.0,
        );
        let edges: Vec<_> = layout.boundaries.iter().map(|b| (b.x0, b.x1)).collect();
        assert_eq!(edges, vec![(0.0, 120.0), (120.0, 275.0), (275.0, 600.0)]);
        assert_eq!(
            layout.categories(),
            vec![Category::Date, Category::Narration, Category::Balance]
        );
    }

    #[test]
    fn test_overlapping_spans_stay_ordered() {
        let layout = ColumnLayout::from_spans(
            vec![
                span(Category::Date, 0.0, 300.0),
                span(Category::Narration, 100.0, 120.0),
                span(Category::Balance, 400.0, 450.0),
            ],
            500.0,
            0.0,
        );
        for pair in layout.boundaries.windows(2) {
            assert_eq!(pair[0].x1, pair[1].x0);
            assert!(pair[0].x0 <= pair[0].x1);
        }
        assert_eq!(layout.boundaries.last().unwrap().x1, 500.0);
    }

    #[test]
    fn test_overlap_is_never_negative() {
        let b = ColumnBoundary {
            category: Category::Date,
            x0: 0.0,
            x1: 100.0,
        };
        assert_eq!(b.overlap(50.0, 150.0), 50.0);
        assert_eq!(b.overlap(200.0, 250.0), 0.0);
    }
}
