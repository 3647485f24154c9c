//! Bank profiles: per-issuer layout vocabulary and tuning, as data.
//!
//! A [`ProfileConfig`] is plain serde data (TOML-friendly, every field
//! defaulted). [`BankProfile`] is the validated, compiled form the engine
//! consumes. Issuers differ only in the data they supply, never in code paths.
//!
//! The numeric defaults (3 line tolerance, 9/40 header merge gaps, 90 fuzzy
//! threshold, 100 left margin, 20 continuation gap) were tuned on real
//! statements and are not derived invariants.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::Category;

/// Header-name synonyms for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSynonyms {
    pub category: Category,
    pub synonyms: Vec<String>,
}

impl HeaderSynonyms {
    pub fn new(category: Category, synonyms: &[&str]) -> Self {
        Self {
            category,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Wider merge gap for headers whose label contains a wide internal gap
/// (e.g. `Instr.   ID`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideMerge {
    /// Marker searched (case-insensitively) in the cluster built so far
    pub left_marker: String,
    /// Marker searched in the next token
    pub right_marker: String,
    pub gap: f64,
}

impl Default for WideMerge {
    fn default() -> Self {
        Self {
            left_marker: "instr".to_string(),
            right_marker: "id".to_string(),
            gap: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderRules {
    /// Checked in order; the first category with a substring hit wins.
    pub synonyms: Vec<HeaderSynonyms>,
    pub scan_limit: usize,
    pub merge_gap: f64,
    pub wide_merge: Option<WideMerge>,
    /// Fuzzy scores must be strictly greater than this to match.
    pub fuzzy_threshold: u8,
    pub min_categories: usize,
    /// Lines within this distance of the header row's `top` are the header.
    pub row_tolerance: f64,
}

impl Default for HeaderRules {
    fn default() -> Self {
        Self {
            synonyms: Vec::new(),
            scan_limit: 30,
            merge_gap: 9.0,
            wide_merge: Some(WideMerge::default()),
            fuzzy_threshold: 90,
            min_categories: 3,
            row_tolerance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseRules {
    /// Any one of these (lowercase substring) marks a line as noise.
    pub keywords: Vec<String>,
    /// Promotional words; a line is noise when it holds `promo_min_count` of them.
    pub promo_keywords: Vec<String>,
    pub promo_min_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineRules {
    /// Max `top` difference for two tokens to share a line
    pub tolerance: f64,
    /// A transaction-start date token must begin left of this x
    pub transaction_left_margin: f64,
    /// Max `line.top - previous.bottom` for a continuation line
    pub continuation_gap: f64,
    pub date_pattern: String,
    pub time_pattern: String,
}

impl Default for LineRules {
    fn default() -> Self {
        Self {
            tolerance: 3.0,
            transaction_left_margin: 100.0,
            continuation_gap: 20.0,
            date_pattern: r"\d{2}[/-]\d{2}[/-]\d{2,4}".to_string(),
            time_pattern: r"\d{2}:\d{2}(?::\d{2})?".to_string(),
        }
    }
}

/// Moves an amount that bled into the Balance column back to its own column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceBleed {
    pub debit_keywords: Vec<String>,
    pub credit_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeRules {
    /// Words that wrapping or extraction commonly splits (`N ETBANK`)
    pub rejoin_words: Vec<String>,
    /// Copy Date ↔ Value Date when only one is present
    pub sync_value_date: bool,
    pub balance_bleed: Option<BalanceBleed>,
    /// Move a `Sender No` found in Tran Id or Narration into UTR Number
    pub sender_to_utr: bool,
    /// Drop records with no narration, amount or reference
    pub drop_empty_records: bool,
    /// Join neighbours that share Date and reference when only one has an amount
    pub merge_split_records: bool,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            rejoin_words: Vec::new(),
            sync_value_date: true,
            balance_bleed: None,
            sender_to_utr: false,
            drop_empty_records: true,
            merge_split_records: true,
        }
    }
}

/// Serializable profile data. Every field may be omitted in a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub key: String,
    pub name: String,
    pub header: HeaderRules,
    pub noise: NoiseRules,
    pub lines: LineRules,
    pub normalize: NormalizeRules,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            key: "custom".to_string(),
            name: "Custom".to_string(),
            header: HeaderRules::default(),
            noise: NoiseRules::default(),
            lines: LineRules::default(),
            normalize: NormalizeRules::default(),
        }
    }
}

impl ProfileConfig {
    pub fn build(self) -> Result<BankProfile, ProfileError> {
        BankProfile::new(self)
    }
}

/// A validated profile with its patterns compiled. Immutable once built.
#[derive(Debug, Clone)]
pub struct BankProfile {
    config: ProfileConfig,
    date_pattern: Regex,
    time_pattern: Regex,
}

impl BankProfile {
    pub fn new(mut config: ProfileConfig) -> Result<Self, ProfileError> {
        if config.header.synonyms.iter().all(|s| s.synonyms.is_empty()) {
            return Err(ProfileError::NoSynonyms(config.key.clone()));
        }
        if config.header.fuzzy_threshold > 100 {
            return Err(ProfileError::FuzzyThreshold(config.header.fuzzy_threshold));
        }
        for (field, value) in [
            ("lines.tolerance", config.lines.tolerance),
            ("lines.transaction_left_margin", config.lines.transaction_left_margin),
            ("lines.continuation_gap", config.lines.continuation_gap),
            ("header.merge_gap", config.header.merge_gap),
            ("header.row_tolerance", config.header.row_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::Distance { field, value });
            }
        }

        let date_pattern = Regex::new(&config.lines.date_pattern).map_err(|source| {
            ProfileError::Pattern {
                field: "date",
                source,
            }
        })?;
        let time_pattern = Regex::new(&config.lines.time_pattern).map_err(|source| {
            ProfileError::Pattern {
                field: "time",
                source,
            }
        })?;

        // Matching is case-insensitive; store keywords lowercased once.
        lowercase_all(&mut config.noise.keywords);
        lowercase_all(&mut config.noise.promo_keywords);
        if let Some(bleed) = config.normalize.balance_bleed.as_mut() {
            lowercase_all(&mut bleed.debit_keywords);
            lowercase_all(&mut bleed.credit_keywords);
        }

        Ok(Self {
            config,
            date_pattern,
            time_pattern,
        })
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn header(&self) -> &HeaderRules {
        &self.config.header
    }

    pub fn noise(&self) -> &NoiseRules {
        &self.config.noise
    }

    pub fn lines(&self) -> &LineRules {
        &self.config.lines
    }

    pub fn normalize(&self) -> &NormalizeRules {
        &self.config.normalize
    }

    pub fn date_pattern(&self) -> &Regex {
        &self.date_pattern
    }

    pub fn time_pattern(&self) -> &Regex {
        &self.time_pattern
    }
}

fn lowercase_all(words: &mut [String]) {
    for w in words.iter_mut() {
        *w = w.to_lowercase();
    }
}
