use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
  Income,
  Expense,
}

impl EntryType {
  pub fn as_str(&self) -> &'static str {
    match self {
      EntryType::Income => "income",
      EntryType::Expense => "expense",
    }
  }

  pub fn parse(value: &str) -> Result<Self, AppError> {
    match value {
      "income" => Ok(EntryType::Income),
      "expense" => Ok(EntryType::Expense),
      other => Err(AppError::new(
        "INVALID_TYPE",
        format!("Entry type must be income or expense, got '{other}'"),
      )),
    }
  }
}

impl std::fmt::Display for EntryType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BudgetEntry {
  pub id: i64,
  #[serde(rename = "type")]
  pub entry_type: EntryType,
  pub amount: f64,
  pub description: String,
  pub category: String,
  pub project_name: Option<String>,
  pub contractor: Option<String>,
  pub location: Option<String>,
  pub date: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewEntryInput {
  #[serde(rename = "type")]
  pub entry_type: EntryType,
  pub amount: f64,
  pub description: String,
  pub category: String,
  pub project_name: Option<String>,
  pub contractor: Option<String>,
  pub location: Option<String>,
  pub date: String,
}

/// Partial update. `None` leaves the stored value untouched; the doubled
/// options distinguish "unchanged" from "clear to NULL".
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EntryUpdateInput {
  #[serde(rename = "type")]
  pub entry_type: Option<EntryType>,
  pub amount: Option<f64>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub project_name: Option<Option<String>>,
  pub contractor: Option<Option<String>>,
  pub location: Option<Option<String>>,
  pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PettyCashNote {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub date: String,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewNoteInput {
  pub name: String,
  pub description: String,
  pub date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NoteUpdateInput {
  pub name: Option<String>,
  pub description: Option<String>,
  pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Totals {
  pub total_in: f64,
  pub total_out: f64,
  pub net_balance: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthPoint {
  pub month: String,
  pub income: f64,
  pub expense: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CategorySplit {
  pub category: String,
  pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Analytics {
  pub monthly: Vec<MonthPoint>,
  pub categories: Vec<CategorySplit>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DateFilter {
  Specific {
    date: Option<NaiveDate>,
  },
  Range {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
  },
}

impl Default for DateFilter {
  fn default() -> Self {
    DateFilter::Range { from: None, to: None }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct EntryQuery {
  #[serde(default)]
  pub search: String,
  #[serde(default)]
  pub date_filter: DateFilter,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
  pub currency_code: String,
  pub report_recent_limit: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLogEntry {
  pub id: i64,
  pub ts: String,
  pub action: String,
  pub entity_type: String,
  pub entity_id: Option<String>,
  pub payload_json: String,
  pub details: Option<String>,
}
