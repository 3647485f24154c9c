//! Typed view of reconstructed records: parsed dates and signed amounts.

use chrono::NaiveDate;
use passbook_core::{Category, Record};
use serde::{Deserialize, Serialize};

/// Typed view of a reconstructed record (bank-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTransaction {
    pub trans_date: NaiveDate,
    pub value_date: Option<NaiveDate>,
    /// Time of day when the statement prints one next to the date
    pub time: Option<String>,
    pub description: String,
    /// First non-empty of Ref No, Tran Id, UTR Number
    pub reference: Option<String>,
    /// Positive means credit/deposit; negative means debit/withdrawal.
    pub amount: f64,
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypedViewError {
    #[error("record {index}: no date")]
    MissingDate { index: usize },

    #[error("record {index}: unparseable date '{text}'")]
    BadDate { index: usize, text: String },

    #[error("record {index}: neither withdrawal nor deposit amount")]
    NoAmount { index: usize },

    #[error("record {index}: unparseable {column} amount '{text}'")]
    BadAmount {
        index: usize,
        column: Category,
        text: String,
    },
}

/// Parses `dd/mm/yy`, `dd/mm/yyyy` and the `-` separated forms.
/// Two-digit years are taken as 20yy.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let parts: Vec<&str> = s.split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let d: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let y: i32 = match parts[2].len() {
        2 => 2000 + parts[2].parse::<i32>().ok()?,
        4 => parts[2].parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(y, m, d)
}

fn parse_amount(
    record: &Record,
    column: Category,
    index: usize,
) -> Result<Option<f64>, TypedViewError> {
    let raw = record.get(column).trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.replace(',', "")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| TypedViewError::BadAmount {
            index,
            column,
            text: raw.to_string(),
        })
}

impl StatementTransaction {
    /// Converts the `index`-th record of a document.
    pub fn from_record(record: &Record, index: usize) -> Result<Self, TypedViewError> {
        let date_field = record.get(Category::Date).trim();
        let mut parts = date_field.split_whitespace();
        let date_text = parts.next().ok_or(TypedViewError::MissingDate { index })?;
        let trans_date = parse_statement_date(date_text).ok_or_else(|| TypedViewError::BadDate {
            index,
            text: date_text.to_string(),
        })?;
        let time = parts.find(|p| p.contains(':')).map(str::to_string);

        let withdrawal = parse_amount(record, Category::Withdrawals, index)?;
        let deposit = parse_amount(record, Category::Deposits, index)?;
        if withdrawal.is_none() && deposit.is_none() {
            return Err(TypedViewError::NoAmount { index });
        }
        let amount = deposit.unwrap_or(0.0) - withdrawal.unwrap_or(0.0);

        let reference = [Category::ReferenceNo, Category::TransactionId, Category::Utr]
            .into_iter()
            .map(|c| record.get(c).trim())
            .find(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            trans_date,
            value_date: parse_statement_date(record.get(Category::ValueDate)),
            time,
            description: record.get(Category::Narration).trim().to_string(),
            reference,
            amount,
            balance: parse_amount(record, Category::Balance, index)?,
        })
    }
}

/// Typed transactions of a document plus one error per rejected record.
pub fn to_transactions(records: &[Record]) -> (Vec<StatementTransaction>, Vec<TypedViewError>) {
    let mut txns = Vec::new();
    let mut errors = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        match StatementTransaction::from_record(rec, i) {
            Ok(t) => txns.push(t),
            Err(e) => errors.push(e),
        }
    }
    (txns, errors)
}
