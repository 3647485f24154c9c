//! Semantic transaction fields a statement column can carry

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic transaction field recognized from header text.
///
/// The serde names double as output keys, so a record serializes as
/// `{"Date": ..., "Narration": ..., "Withdrawals": ...}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Date")]
    Date,
    #[serde(rename = "Value Date")]
    ValueDate,
    #[serde(rename = "Narration")]
    Narration,
    #[serde(rename = "Ref No")]
    ReferenceNo,
    #[serde(rename = "Tran Id")]
    TransactionId,
    #[serde(rename = "Instr. ID")]
    InstrumentId,
    #[serde(rename = "UTR Number")]
    Utr,
    #[serde(rename = "Withdrawals")]
    Withdrawals,
    #[serde(rename = "Deposits")]
    Deposits,
    #[serde(rename = "Balance")]
    Balance,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Date,
        Category::ValueDate,
        Category::Narration,
        Category::ReferenceNo,
        Category::TransactionId,
        Category::InstrumentId,
        Category::Utr,
        Category::Withdrawals,
        Category::Deposits,
        Category::Balance,
    ];

    /// Display name, identical to the serialized key
    pub fn name(&self) -> &'static str {
        match self {
            Category::Date => "Date",
            Category::ValueDate => "Value Date",
            Category::Narration => "Narration",
            Category::ReferenceNo => "Ref No",
            Category::TransactionId => "Tran Id",
            Category::InstrumentId => "Instr. ID",
            Category::Utr => "UTR Number",
            Category::Withdrawals => "Withdrawals",
            Category::Deposits => "Deposits",
            Category::Balance => "Balance",
        }
    }

    /// Narration-like fields accumulate wrapped text from continuation lines.
    pub fn is_narrative(&self) -> bool {
        matches!(self, Category::Narration)
    }

    pub fn is_amount(&self) -> bool {
        matches!(
            self,
            Category::Withdrawals | Category::Deposits | Category::Balance
        )
    }

    /// Identifier columns where embedded whitespace is always a wrap artifact
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Category::ReferenceNo | Category::TransactionId | Category::Utr
        )
    }

}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
