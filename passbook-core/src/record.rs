//! Reconstructed transaction records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Category;

/// One reconstructed transaction: column category → accumulated text.
///
/// Keys keep column order. Every detected column is present; an empty
/// string means "no value observed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<Category, String>,
}

impl Record {
    /// An empty record with one slot per column.
    pub fn with_columns(columns: &[Category]) -> Self {
        Self {
            fields: columns.iter().map(|c| (*c, String::new())).collect(),
        }
    }

    /// Value for `category`, `""` when absent or unset.
    pub fn get(&self, category: Category) -> &str {
        self.fields.get(&category).map(String::as_str).unwrap_or("")
    }

    pub fn has_column(&self, category: Category) -> bool {
        self.fields.contains_key(&category)
    }

    pub fn set(&mut self, category: Category, value: impl Into<String>) {
        self.fields.insert(category, value.into());
    }

    /// Appends `text` separated by one space.
    pub fn append(&mut self, category: Category, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let slot = self.fields.entry(category).or_default();
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(text);
    }

    /// Prepends `text` separated by one space.
    pub fn prepend(&mut self, category: Category, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let slot = self.fields.entry(category).or_default();
        *slot = if slot.is_empty() {
            text.to_string()
        } else {
            format!("{text} {slot}")
        };
    }

    /// Sets `category` only when it currently holds nothing.
    ///
    /// Returns whether the value was taken.
    pub fn fill_if_empty(&mut self, category: Category, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let slot = self.fields.entry(category).or_default();
        if slot.is_empty() {
            slot.push_str(text);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.fields.iter().map(|(c, v)| (*c, v.as_str()))
    }

    /// True when no narration, amount or reference field holds text; a
    /// bare date is not a transaction.
    pub fn is_blank(&self) -> bool {
        self.fields
            .iter()
            .filter(|(c, _)| c.is_narrative() || c.is_amount() || c.is_reference())
            .all(|(_, v)| v.is_empty())
    }
}
