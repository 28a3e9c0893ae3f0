//! Pure aggregation over the in-memory entry list. Deterministic, no side
//! effects; safe to call on every refresh.

use std::collections::BTreeMap;

use crate::domain::validation;
use crate::models::{BudgetEntry, CategorySplit, EntryType, MonthPoint, Totals};

const MONTH_ABBR: [&str; 12] = [
  "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn totals(entries: &[BudgetEntry]) -> Totals {
  let mut total_in = 0.0;
  let mut total_out = 0.0;
  for entry in entries {
    match entry.entry_type {
      EntryType::Income => total_in += entry.amount,
      EntryType::Expense => total_out += entry.amount,
    }
  }
  Totals {
    total_in,
    total_out,
    net_balance: total_in - total_out,
  }
}

/// Month buckets in chronological order, keyed by (year, month) rather than
/// the display label. Entries with unparsable dates are skipped.
pub fn monthly_series(entries: &[BudgetEntry]) -> Vec<MonthPoint> {
  use chrono::Datelike;

  let mut buckets: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
  for entry in entries {
    let date = match validation::parse_date(&entry.date) {
      Ok(date) => date,
      Err(_) => continue,
    };
    let bucket = buckets.entry((date.year(), date.month())).or_insert((0.0, 0.0));
    match entry.entry_type {
      EntryType::Income => bucket.0 += entry.amount,
      EntryType::Expense => bucket.1 += entry.amount,
    }
  }

  buckets
    .into_iter()
    .map(|((year, month), (income, expense))| MonthPoint {
      month: format!("{} {}", MONTH_ABBR[(month - 1) as usize], year),
      income,
      expense,
    })
    .collect()
}

/// Expense totals per category, in first-occurrence order.
pub fn category_totals(entries: &[BudgetEntry]) -> Vec<CategorySplit> {
  let mut splits: Vec<CategorySplit> = Vec::new();
  for entry in entries {
    if entry.entry_type != EntryType::Expense {
      continue;
    }
    match splits.iter_mut().find(|split| split.category == entry.category) {
      Some(split) => split.amount += entry.amount,
      None => splits.push(CategorySplit {
        category: entry.category.clone(),
        amount: entry.amount,
      }),
    }
  }
  splits
}
