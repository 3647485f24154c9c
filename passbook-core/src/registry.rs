//! Built-in bank profiles selected by key.
//!
//! Keys: `generic`, `hdfc`, `union_bank`. Unknown keys fall back to
//! `generic` with a warning.

use tracing::warn;

use crate::error::ProfileError;
use crate::profile::{
    BalanceBleed, BankProfile, HeaderRules, HeaderSynonyms, LineRules, NoiseRules, NormalizeRules,
    ProfileConfig,
};
use crate::Category;

pub const GENERIC: &str = "generic";

/// `(key, display name)` of every built-in profile
pub const BUILTIN_BANKS: &[(&str, &str)] = &[
    ("generic", "Generic"),
    ("hdfc", "HDFC"),
    ("union_bank", "Union Bank"),
];

/// Configuration data of a built-in profile, if `key` names one.
pub fn builtin_config(key: &str) -> Option<ProfileConfig> {
    match key.trim().to_lowercase().as_str() {
        "generic" => Some(generic()),
        "hdfc" => Some(hdfc()),
        "union_bank" | "union" => Some(union_bank()),
        _ => None,
    }
}

/// Profile for `key`, falling back to `generic` for unknown keys.
pub fn profile_for(key: &str) -> Result<BankProfile, ProfileError> {
    let config = builtin_config(key).unwrap_or_else(|| {
        warn!(bank = key, "unknown bank key, using generic profile");
        generic()
    });
    config.build()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn generic() -> ProfileConfig {
    ProfileConfig {
        key: "generic".to_string(),
        name: "Generic".to_string(),
        header: HeaderRules {
            synonyms: vec![
                HeaderSynonyms::new(
                    Category::Date,
                    &["Date", "Txn Date", "Transaction Date", "Value Date", "Date of Txn"],
                ),
                HeaderSynonyms::new(
                    Category::Narration,
                    &[
                        "Remarks",
                        "Description",
                        "Narration",
                        "Particulars",
                        "Transaction Details",
                        "Details",
                    ],
                ),
                HeaderSynonyms::new(
                    Category::Withdrawals,
                    &["Withdrawals", "Debit", "Dr", "Withdrawal Amt", "Debit Amount"],
                ),
                HeaderSynonyms::new(
                    Category::Deposits,
                    &["Deposits", "Credit", "Cr", "Deposit Amt", "Credit Amount"],
                ),
                HeaderSynonyms::new(
                    Category::Balance,
                    &["Balance", "Bal", "Closing Balance", "Net Balance"],
                ),
                HeaderSynonyms::new(
                    Category::ReferenceNo,
                    &["Ref No", "Chq", "Cheque No", "Reference", "Tran Id", "UTR", "Chq/Ref No"],
                ),
            ],
            ..HeaderRules::default()
        },
        noise: NoiseRules {
            keywords: words(&["page no"]),
            promo_keywords: Vec::new(),
            promo_min_count: 2,
        },
        lines: LineRules::default(),
        normalize: NormalizeRules::default(),
    }
}

fn hdfc() -> ProfileConfig {
    ProfileConfig {
        key: "hdfc".to_string(),
        name: "HDFC".to_string(),
        header: HeaderRules {
            // Value Date precedes Date: "value date" contains "date".
            synonyms: vec![
                HeaderSynonyms::new(Category::ValueDate, &["Value Dt", "Value Date"]),
                HeaderSynonyms::new(Category::Date, &["Date", "Txn Date"]),
                HeaderSynonyms::new(Category::Narration, &["Narration", "Description", "Particulars"]),
                HeaderSynonyms::new(
                    Category::ReferenceNo,
                    &["Chq./Ref.No.", "Ref No", "Cheque No", "Reference"],
                ),
                HeaderSynonyms::new(Category::Withdrawals, &["Withdrawal Amt", "Debit", "Withdrawal"]),
                HeaderSynonyms::new(Category::Deposits, &["Deposit Amt", "Credit", "Deposit"]),
                HeaderSynonyms::new(Category::Balance, &["Closing Balance", "Balance"]),
            ],
            ..HeaderRules::default()
        },
        noise: NoiseRules {
            keywords: words(&[
                "page no",
                "hdfc bank",
                "hdfcbank",
                "statement of account",
                "generated on",
                "customer care",
                "registered office",
                "registeredoffice",
                "closing balance includes",
                "contents of this statement",
                "gstin",
                "requesting branch",
                "this is a computer generated",
                "statutory disclaimer",
            ]),
            promo_keywords: Vec::new(),
            promo_min_count: 2,
        },
        lines: LineRules {
            date_pattern: r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}".to_string(),
            ..LineRules::default()
        },
        normalize: NormalizeRules {
            rejoin_words: words(&["NETBANK", "PHONE", "HDFCBANK", "PAYMENT", "FROM"]),
            sync_value_date: true,
            ..NormalizeRules::default()
        },
    }
}

fn union_bank() -> ProfileConfig {
    ProfileConfig {
        key: "union_bank".to_string(),
        name: "Union Bank".to_string(),
        header: HeaderRules {
            synonyms: vec![
                HeaderSynonyms::new(Category::Date, &["Date", "Txn Date"]),
                HeaderSynonyms::new(Category::Narration, &["Remarks", "Particulars", "Description"]),
                HeaderSynonyms::new(Category::TransactionId, &["Tran Id", "Transaction ID", "Ref No"]),
                HeaderSynonyms::new(Category::InstrumentId, &["Instr. ID", "Instrument"]),
                HeaderSynonyms::new(Category::Utr, &["UTR Number", "UTR"]),
                HeaderSynonyms::new(Category::Withdrawals, &["Withdrawals", "Debit"]),
                HeaderSynonyms::new(Category::Deposits, &["Deposits", "Credit"]),
                HeaderSynonyms::new(Category::Balance, &["Balance"]),
            ],
            ..HeaderRules::default()
        },
        noise: NoiseRules {
            keywords: words(&[
                "page no",
                "union bank",
                "statement of account",
                "generated on",
                "avail our loan",
                "missed call",
                "sms <uloan>",
                "discrepancy",
                "notify the bank",
                "computer generated",
                "no signature",
                "visit our website",
                "for any queries",
                "customer service",
            ]),
            promo_keywords: words(&["avail", "loan", "products", "missed", "call", "sms", "uloan"]),
            promo_min_count: 2,
        },
        lines: LineRules::default(),
        normalize: NormalizeRules {
            rejoin_words: words(&["NETBANK", "PHONE", "PAYMENT", "FROM", "COLLECTION"]),
            sync_value_date: false,
            balance_bleed: Some(BalanceBleed {
                debit_keywords: words(&["charges", "neftdr", "rtgsdr", "interest", "penal", "dr"]),
                credit_keywords: words(&["neft", "rtgs", "cash", "loan", "cr"]),
            }),
            sender_to_utr: true,
            ..NormalizeRules::default()
        },
    }
}
