//! Profile-driven cleanup of finalized records.
//!
//! Runs after assembly. Values are cleaned per record; the profile may also
//! drop records without transaction data and rejoin transactions that the
//! statement split over two dated rows.

use passbook_core::profile::BalanceBleed;
use passbook_core::{BankProfile, Category, ProfileError, Record};
use regex::Regex;
use tracing::debug;

/// Compiled cleanup rules for one profile.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    rejoin: Vec<(String, Regex)>,
    noise: Option<Regex>,
    split_ids: [Regex; 2],
    trailing: Regex,
    money: Regex,
    sender: Option<Regex>,
    sync_value_date: bool,
    balance_bleed: Option<BalanceBleed>,
    drop_empty_records: bool,
    merge_split_records: bool,
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ProfileError> {
    Regex::new(pattern).map_err(|source| ProfileError::Pattern { field, source })
}

impl FieldNormalizer {
    pub fn new(profile: &BankProfile) -> Result<Self, ProfileError> {
        let rules = profile.normalize();

        let rejoin = rules
            .rejoin_words
            .iter()
            .filter(|w| !w.is_empty())
            .map(|w| {
                let spaced = w
                    .chars()
                    .map(|c| regex::escape(&c.to_string()))
                    .collect::<Vec<_>>()
                    .join(r"\s?");
                Ok((w.clone(), compile("rejoin_words", &format!("(?i){spaced}"))?))
            })
            .collect::<Result<Vec<_>, ProfileError>>()?;

        let keywords: Vec<String> = profile
            .noise()
            .keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(k))
            .collect();
        let noise = if keywords.is_empty() {
            None
        } else {
            Some(compile("noise keywords", &format!("(?i)(?:{})", keywords.join("|")))?)
        };

        Ok(Self {
            rejoin,
            noise,
            split_ids: [
                compile("split ids", r"([A-Z0-9]{3,}[0-9])\s+([A-Z0-9]{8,})")?,
                compile("split ids", r"([A-Z0-9]{8,}[0-9])\s+([A-Z0-9]{3,})")?,
            ],
            trailing: compile("trailing", r"[,\-_\s]+$")?,
            money: compile("money", r"[0-9][0-9,]*\.\d{2}")?,
            sender: if rules.sender_to_utr {
                Some(compile("sender", r"(?i:sender\s*no)[:.\s]*(\d[\d ]*\d|\d)")?)
            } else {
                None
            },
            sync_value_date: rules.sync_value_date,
            balance_bleed: rules.balance_bleed.clone(),
            drop_empty_records: rules.drop_empty_records,
            merge_split_records: rules.merge_split_records,
        })
    }

    /// Cleans every record, then applies the profile's record-level rules.
    pub fn apply(&self, records: &mut Vec<Record>) {
        for record in records.iter_mut() {
            *record = self.normalize(record);
        }
        if self.drop_empty_records {
            let before = records.len();
            records.retain(|r| !r.is_blank());
            if records.len() < before {
                debug!(dropped = before - records.len(), "dropped records without transaction data");
            }
        }
        if self.merge_split_records {
            *records = self.merge_split(std::mem::take(records));
        }
    }

    /// Joins a record with its successor when both carry the same Date and
    /// the same non-empty reference and exactly one of them has an amount.
    /// The successor's narration is appended and its money fields win.
    fn merge_split(&self, records: Vec<Record>) -> Vec<Record> {
        let mut merged: Vec<Record> = Vec::with_capacity(records.len());
        let mut iter = records.into_iter().peekable();
        while let Some(mut current) = iter.next() {
            if let Some(next) = iter.next_if(|n| is_split_pair(&current, n)) {
                if current.has_column(Category::Narration) {
                    let joined = format!("{} {}", current.get(Category::Narration), next.get(Category::Narration));
                    current.set(Category::Narration, self.clean_narration(&joined));
                }
                for cat in [Category::Withdrawals, Category::Deposits, Category::Balance] {
                    let value = next.get(cat);
                    if current.has_column(cat) && !value.is_empty() {
                        current.set(cat, value);
                    }
                }
                debug!(date = current.get(Category::Date), "merged split transaction");
            }
            merged.push(current);
        }
        merged
    }

    pub fn normalize(&self, record: &Record) -> Record {
        let mut out = record.clone();

        if let Some(bleed) = &self.balance_bleed {
            self.split_balance_bleed(&mut out, bleed);
        }

        let cleaned: Vec<(Category, String)> = out
            .iter()
            .map(|(cat, value)| (cat, self.clean_field(cat, value)))
            .collect();
        for (cat, value) in cleaned {
            out.set(cat, value);
        }

        if let Some(sender) = &self.sender {
            self.move_sender_number(&mut out, sender);
        }

        if self.sync_value_date && out.has_column(Category::Date) && out.has_column(Category::ValueDate) {
            let date = out.get(Category::Date).to_string();
            let value_date = out.get(Category::ValueDate).to_string();
            if value_date.is_empty() {
                out.set(Category::ValueDate, date);
            } else if date.is_empty() {
                out.set(Category::Date, value_date);
            }
        }

        let amount = [Category::Withdrawals, Category::Deposits]
            .into_iter()
            .map(|c| out.get(c))
            .find(|v| !v.is_empty())
            .map(str::to_string);
        if amount.is_some_and(|a| a == out.get(Category::Balance)) {
            out.set(Category::Balance, "");
        }

        out
    }

    pub fn clean_field(&self, category: Category, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        if category.is_narrative() {
            self.clean_narration(value)
        } else if category.is_amount() {
            clean_amount(value)
        } else if category.is_reference() {
            let compact: String = value.split_whitespace().collect();
            self.trailing.replace(&compact, "").into_owned()
        } else {
            value.trim().to_string()
        }
    }

    fn clean_narration(&self, value: &str) -> String {
        let mut text = value.to_string();
        for (word, re) in &self.rejoin {
            text = re.replace_all(&text, word.as_str()).into_owned();
        }
        for re in &self.split_ids {
            text = re.replace_all(&text, "${1}${2}").into_owned();
        }
        if let Some(noise) = &self.noise {
            text = noise.replace_all(&text, "").into_owned();
        }
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.trailing.replace(&text, "").into_owned()
    }

    /// Union Bank prints the remitter's `Sender No` inside Tran Id or the
    /// remarks; it belongs in UTR Number, without internal spaces.
    fn move_sender_number(&self, record: &mut Record, sender: &Regex) {
        if !record.has_column(Category::Utr) {
            return;
        }
        let narration = record.get(Category::Narration).to_string();
        let tran_id = record.get(Category::TransactionId).to_string();
        let haystack = format!("{tran_id} {narration} {}", record.get(Category::Utr));
        let Some(caps) = sender.captures(&haystack) else {
            return;
        };
        let (Some(full), Some(value)) = (caps.get(0), caps.get(1)) else {
            return;
        };
        let (full, value) = (full.as_str().trim(), value.as_str());
        let compact: String = value.split_whitespace().collect();

        if record.has_column(Category::Narration) {
            let rest = narration.replace(full, "").replace(value, "");
            let rest = rest.split_whitespace().collect::<Vec<_>>().join(" ");
            record.set(Category::Narration, self.trailing.replace(&rest, "").into_owned());
        }
        if record.has_column(Category::TransactionId) {
            let rest: String = tran_id.replace(full, "").split_whitespace().collect();
            record.set(Category::TransactionId, rest);
        }
        record.set(Category::Utr, format!("Sender No: {compact}"));
    }

    /// Union Bank prints some amounts inside the Balance cell; when both
    /// amount columns are empty and Balance holds two or more money values,
    /// the first is the transaction amount and the last is the balance.
    fn split_balance_bleed(&self, record: &mut Record, bleed: &BalanceBleed) {
        if !record.get(Category::Withdrawals).is_empty() || !record.get(Category::Deposits).is_empty() {
            return;
        }
        let balance = record.get(Category::Balance).to_string();
        let found: Vec<_> = self.money.find_iter(&balance).collect();
        if found.len() < 2 {
            return;
        }
        let (first, last) = (found[0], found[found.len() - 1]);
        let negative = balance[..last.start()].trim_end().ends_with('-');
        let new_balance = if negative {
            format!("-{}", last.as_str())
        } else {
            last.as_str().to_string()
        };

        let narration = record.get(Category::Narration).to_lowercase();
        let target = if bleed.debit_keywords.iter().any(|k| narration.contains(k.as_str())) {
            Category::Withdrawals
        } else if bleed.credit_keywords.iter().any(|k| narration.contains(k.as_str())) {
            Category::Deposits
        } else {
            Category::Withdrawals
        };
        record.set(target, first.as_str());
        record.set(Category::Balance, new_balance);
    }
}

fn has_amount(record: &Record) -> bool {
    !record.get(Category::Withdrawals).is_empty() || !record.get(Category::Deposits).is_empty()
}

fn is_split_pair(current: &Record, next: &Record) -> bool {
    let Some(reference) = [Category::ReferenceNo, Category::TransactionId, Category::Utr]
        .into_iter()
        .find(|c| current.has_column(*c))
    else {
        return false;
    };
    current.has_column(Category::Date)
        && current.get(Category::Date) == next.get(Category::Date)
        && !current.get(reference).is_empty()
        && current.get(reference) == next.get(reference)
        && has_amount(current) != has_amount(next)
}

/// Letters mean the cell caught stray text, not an amount.
fn clean_amount(value: &str) -> String {
    if value.chars().any(char::is_alphabetic) {
        return String::new();
    }
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use passbook_core::profile_for;

    fn record(pairs: &[(Category, &str)]) -> Record {
        let cats: Vec<_> = pairs.iter().map(|(c, _)| *c).collect();
        let mut r = Record::with_columns(&cats);
        for (c, v) in pairs {
            r.set(*c, *v);
        }
        r
    }

    #[test]
    fn test_narration_cleanup() {
        let profile = profile_for("hdfc").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let cleaned = norm.clean_field(
            Category::Narration,
            "NEFT  N ETBANK  TRF 6202 51118765 HDFC Bank Ltd -",
        );
        assert_eq!(cleaned, "NEFT NETBANK TRF 620251118765 Ltd");
    }

    #[test]
    fn test_amount_and_reference_cleanup() {
        let profile = profile_for("generic").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        assert_eq!(norm.clean_field(Category::Withdrawals, "₹ 1,200.50"), "1,200.50");
        assert_eq!(norm.clean_field(Category::Deposits, "Page total"), "");
        assert_eq!(norm.clean_field(Category::ReferenceNo, "0000 4521 889,"), "00004521889");
    }

    #[test]
    fn test_value_date_sync() {
        let profile = profile_for("hdfc").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let out = norm.normalize(&record(&[
            (Category::Date, "01/11/25"),
            (Category::ValueDate, ""),
            (Category::Withdrawals, "10.00"),
        ]));
        assert_eq!(out.get(Category::ValueDate), "01/11/25");
    }

    #[test]
    fn test_balance_bleed_split() {
        let profile = profile_for("union_bank").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let out = norm.normalize(&record(&[
            (Category::Date, "03/11/25"),
            (Category::Narration, "SERVICE CHARGES"),
            (Category::Withdrawals, ""),
            (Category::Deposits, ""),
            (Category::Balance, "118.00 24,310.55"),
        ]));
        assert_eq!(out.get(Category::Withdrawals), "118.00");
        assert_eq!(out.get(Category::Deposits), "");
        assert_eq!(out.get(Category::Balance), "24,310.55");

        let out = norm.normalize(&record(&[
            (Category::Narration, "NEFT FROM ACME"),
            (Category::Withdrawals, ""),
            (Category::Deposits, ""),
            (Category::Balance, "5,000.00 -1,250.00"),
        ]));
        assert_eq!(out.get(Category::Deposits), "5,000.00");
        assert_eq!(out.get(Category::Balance), "-1,250.00");
    }

    #[test]
    fn test_sender_number_moves_to_utr() {
        let profile = profile_for("union_bank").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let out = norm.normalize(&record(&[
            (Category::Date, "03/11/25"),
            (Category::Narration, "IMPS P2A Sender No: 9876 5432 10 ACME"),
            (Category::TransactionId, "S1234567"),
            (Category::Utr, ""),
            (Category::Deposits, "500.00"),
        ]));
        assert_eq!(out.get(Category::Utr), "Sender No: 9876543210");
        assert_eq!(out.get(Category::Narration), "IMPS P2A ACME");
        assert_eq!(out.get(Category::TransactionId), "S1234567");

        let out = norm.normalize(&record(&[
            (Category::Narration, "NEFT ACME"),
            (Category::TransactionId, "Sender No 12345"),
            (Category::Utr, ""),
        ]));
        assert_eq!(out.get(Category::Utr), "Sender No: 12345");
        assert_eq!(out.get(Category::TransactionId), "");
        assert_eq!(out.get(Category::Narration), "NEFT ACME");

        // Other profiles leave the number where it was printed.
        let generic = FieldNormalizer::new(&profile_for("generic").unwrap()).unwrap();
        let out = generic.normalize(&record(&[
            (Category::Narration, "IMPS Sender No 12345"),
            (Category::Utr, ""),
        ]));
        assert_eq!(out.get(Category::Utr), "");
    }

    #[test]
    fn test_records_without_transaction_data_are_dropped() {
        let profile = profile_for("generic").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let cols = [Category::Date, Category::Narration, Category::Withdrawals, Category::Balance];
        let mut records = vec![
            record(&[
                (Category::Date, "01/11/25"),
                (Category::Narration, "UPI-MERCHANT"),
                (Category::Withdrawals, "708.00"),
            ]),
            Record::with_columns(&cols),
            record(&[
                (Category::Date, "02/11/25"),
                (Category::Narration, " - "),
                (Category::Withdrawals, ""),
            ]),
        ];
        records[1].set(Category::Date, "01/11/25");
        norm.apply(&mut records);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(Category::Narration), "UPI-MERCHANT");
    }

    #[test]
    fn test_split_record_is_merged() {
        let profile = profile_for("hdfc").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let row = |narration: &str, deposit: &str, balance: &str| {
            record(&[
                (Category::Date, "01/11/25"),
                (Category::Narration, narration),
                (Category::ReferenceNo, "0000412345"),
                (Category::Deposits, deposit),
                (Category::Balance, balance),
            ])
        };
        let mut records = vec![
            row("NEFT CR-ACME", "", ""),
            row("PAYROLL NOV", "50,000.00", "60,000.00"),
            row("NEFT CR-ACME", "1,000.00", "61,000.00"),
        ];
        norm.apply(&mut records);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(Category::Narration), "NEFT CR-ACME PAYROLL NOV");
        assert_eq!(records[0].get(Category::Deposits), "50,000.00");
        assert_eq!(records[0].get(Category::Balance), "60,000.00");
        // Both rows carry an amount, so they stay separate transactions.
        assert_eq!(records[1].get(Category::Deposits), "1,000.00");
    }

    #[test]
    fn test_balance_equal_to_amount_is_cleared() {
        let profile = profile_for("generic").unwrap();
        let norm = FieldNormalizer::new(&profile).unwrap();
        let out = norm.normalize(&record(&[
            (Category::Withdrawals, "708.00"),
            (Category::Balance, "708.00"),
        ]));
        assert_eq!(out.get(Category::Balance), "");
    }
}
