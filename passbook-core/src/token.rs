//! Positioned text primitives: tokens, pages and grouped lines.
//!
//! Tokens arrive from the page-extraction collaborator as pdfplumber-style
//! word dictionaries (`text`, `x0`, `x1`, `top`, `bottom`). Coordinates use
//! the page's top-left origin; `top` grows downward.

use serde::{Deserialize, Deserializer, Serialize};

/// A single contiguous run of characters with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default = "missing_coord", deserialize_with = "coord")]
    pub x0: f64,
    #[serde(default = "missing_coord", deserialize_with = "coord")]
    pub x1: f64,
    #[serde(default = "missing_coord", deserialize_with = "coord")]
    pub top: f64,
    #[serde(default = "missing_coord", deserialize_with = "coord")]
    pub bottom: f64,
}

fn missing_coord() -> f64 {
    f64::NAN
}

/// Absent and `null` coordinates both become NaN so validation can reject them.
fn coord<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Token {
    pub fn new(text: impl Into<String>, x0: f64, x1: f64, top: f64, bottom: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            bottom,
        }
    }

    /// Finite coordinates, non-inverted box, non-blank text.
    pub fn is_well_formed(&self) -> bool {
        let finite = [self.x0, self.x1, self.top, self.bottom]
            .iter()
            .all(|v| v.is_finite());
        finite && self.x1 >= self.x0 && self.bottom >= self.top && !self.text.trim().is_empty()
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// One page as handed over by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Missing width is a contract violation; the engine refuses such pages.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default, alias = "tokens")]
    pub words: Vec<Token>,
}

impl Page {
    pub fn new(width: f64, words: Vec<Token>) -> Self {
        Self {
            width: Some(width),
            words,
        }
    }
}

/// A whole statement: `{"pages": [...]}` in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Tokens judged to share one visual row, sorted left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    tokens: Vec<Token>,
    top: f64,
    bottom: f64,
}

impl Line {
    /// Builds a line from tokens already known to share a row.
    ///
    /// Returns `None` for an empty token list.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        tokens.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        let top = tokens.iter().map(|t| t.top).fold(f64::INFINITY, f64::min);
        let bottom = tokens
            .iter()
            .map(|t| t.bottom)
            .fold(f64::NEG_INFINITY, f64::max);
        Some(Self { tokens, top, bottom })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Leftmost token; a line is never empty.
    pub fn first(&self) -> &Token {
        &self.tokens[0]
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Token texts joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
