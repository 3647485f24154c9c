//! Token validation and row grouping for one page.

use passbook_core::{Line, Token};
use tracing::debug;

/// Well-formed tokens of a page plus the count of rejected ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidTokens {
    pub tokens: Vec<Token>,
    pub rejected: usize,
}

/// Drops tokens with missing or inverted coordinates, or blank text.
pub fn validate_tokens(tokens: &[Token]) -> ValidTokens {
    let mut out = ValidTokens::default();
    for tok in tokens {
        if tok.is_well_formed() {
            out.tokens.push(tok.clone());
        } else {
            debug!(text = %tok.text, x0 = tok.x0, x1 = tok.x1, top = tok.top, bottom = tok.bottom, "rejecting malformed token");
            out.rejected += 1;
        }
    }
    out
}

/// Clusters tokens into rows by vertical position.
///
/// Tokens are ordered by `top` (then `x0`, so the result never depends on
/// input order). A token joins the current line while its `top` is within
/// `tolerance` of the line's reference `top` (its first token); otherwise
/// it starts a new line. Each line comes out sorted left to right.
pub fn group_lines(tokens: Vec<Token>, tolerance: f64) -> Vec<Line> {
    let mut tokens = tokens;
    tokens.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

    let mut lines = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut reference_top = 0.0;

    for tok in tokens {
        if !current.is_empty() && (tok.top - reference_top).abs() > tolerance {
            lines.extend(Line::from_tokens(std::mem::take(&mut current)));
        }
        if current.is_empty() {
            reference_top = tok.top;
        }
        current.push(tok);
    }
    lines.extend(Line::from_tokens(current));

    lines
}
