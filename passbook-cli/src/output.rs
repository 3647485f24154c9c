use anyhow::{Context, Result};
use clap::ValueEnum;
use passbook_core::{Category, Record};
use passbook_ingest::StatementTransaction;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

/// Records as a JSON array of objects keyed by column display name.
pub fn write_records_json(out: &mut dyn Write, records: &[Record]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records).context("serialize records")?;
    writeln!(out)?;
    Ok(())
}

/// Records as CSV; the header row is the column display names.
pub fn write_records_csv(out: &mut dyn Write, columns: &[Category], records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(columns.iter().map(|c| c.name()))?;
    for rec in records {
        wtr.write_record(columns.iter().map(|c| rec.get(*c)))?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

pub fn write_transactions_json(out: &mut dyn Write, txns: &[StatementTransaction]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, txns).context("serialize transactions")?;
    writeln!(out)?;
    Ok(())
}

pub fn write_transactions_csv(out: &mut dyn Write, txns: &[StatementTransaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for t in txns {
        wtr.serialize(t).context("serialize transaction")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Category>, Vec<Record>) {
        let cols = vec![Category::Date, Category::Narration, Category::Withdrawals];
        let mut rec = Record::with_columns(&cols);
        rec.set(Category::Date, "01/11/25");
        rec.set(Category::Narration, "UPI, MERCHANT");
        (cols, vec![rec])
    }

    #[test]
    fn test_csv_uses_display_names() {
        let (cols, records) = sample();
        let mut buf = Vec::new();
        write_records_csv(&mut buf, &cols, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Date,Narration,Withdrawals\n01/11/25,\"UPI, MERCHANT\",\n");
    }

    #[test]
    fn test_json_keeps_empty_columns() {
        let (_, records) = sample();
        let mut buf = Vec::new();
        write_records_json(&mut buf, &records).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["Withdrawals"], "");
        assert_eq!(value[0]["Narration"], "UPI, MERCHANT");
    }
}
