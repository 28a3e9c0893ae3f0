//! Plain-text report formatter. Rendering is pure so it can be tested
//! without touching the filesystem; `write_report` only handles the file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::validation;
use crate::error::AppError;
use crate::models::{BudgetEntry, EntryType, PettyCashNote, Settings, Totals};

const DESCRIPTION_WIDTH: usize = 25;
const NOTE_DESCRIPTION_WIDTH: usize = 60;

pub fn report_filename(generated: DateTime<Utc>) -> String {
  format!("budget-report-{}.txt", generated.format("%Y-%m-%d"))
}

pub fn render_report(
  settings: &Settings,
  totals: &Totals,
  entries: &[BudgetEntry],
  notes: &[PettyCashNote],
  generated: DateTime<Utc>,
) -> String {
  let mut out = String::new();
  let currency = settings.currency_code.as_str();

  out.push_str("CONSTRUCTION COMPANY BUDGET REPORT\n");
  out.push_str(&format!("Generated: {}\n\n", generated.format("%Y-%m-%d %H:%M UTC")));

  out.push_str("FINANCIAL SUMMARY\n");
  out.push_str(&format!("NET BALANCE: {}\n", format_amount(currency, totals.net_balance)));
  out.push_str(&format!("TOTAL INCOME: {}\n", format_amount(currency, totals.total_in)));
  out.push_str(&format!("TOTAL EXPENSES: {}\n\n", format_amount(currency, totals.total_out)));

  let limit = settings.report_recent_limit.max(1) as usize;

  out.push_str("RECENT TRANSACTIONS\n");
  if entries.is_empty() {
    out.push_str("No transactions found.\n");
  } else {
    out.push_str(&format!(
      "{:<10} | {:<7} | {:<18} | {:<25} | {:<15} | {:>14} | {:>14}\n",
      "Date", "Type", "Category", "Description", "Project", "Income", "Expense"
    ));
    for entry in entries.iter().take(limit) {
      out.push_str(&render_entry_row(currency, entry));
    }
  }
  out.push('\n');

  out.push_str("PETTY CASH NOTES\n");
  if notes.is_empty() {
    out.push_str("No petty cash notes found.\n");
  } else {
    out.push_str(&format!("{:<10} | {:<10} | Description\n", "Date", "Name"));
    for note in notes.iter().take(limit) {
      out.push_str(&format!(
        "{:<10} | {:<10} | {}\n",
        display_date(&note.date),
        note.name,
        truncate(&note.description, NOTE_DESCRIPTION_WIDTH)
      ));
    }
  }

  out
}

pub fn write_report(
  dir: &Path,
  settings: &Settings,
  totals: &Totals,
  entries: &[BudgetEntry],
  notes: &[PettyCashNote],
  generated: DateTime<Utc>,
) -> Result<PathBuf, AppError> {
  std::fs::create_dir_all(dir)?;
  let path = dir.join(report_filename(generated));
  let mut file = File::create(&path)?;
  file.write_all(render_report(settings, totals, entries, notes, generated).as_bytes())?;
  Ok(path)
}

fn render_entry_row(currency: &str, entry: &BudgetEntry) -> String {
  let amount = format_amount(currency, entry.amount);
  let (income, expense) = match entry.entry_type {
    EntryType::Income => (amount, String::new()),
    EntryType::Expense => (String::new(), amount),
  };
  format!(
    "{:<10} | {:<7} | {:<18} | {:<25} | {:<15} | {:>14} | {:>14}\n",
    display_date(&entry.date),
    entry.entry_type.as_str().to_uppercase(),
    truncate(&entry.category, 18),
    truncate(&entry.description, DESCRIPTION_WIDTH),
    entry.project_name.as_deref().unwrap_or("-"),
    income,
    expense
  )
}

// Malformed dates degrade per row instead of aborting the export.
fn display_date(date: &str) -> String {
  match validation::parse_date(date) {
    Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
    Err(_) => "N/A".to_string(),
  }
}

fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }
  let kept: String = text.chars().take(max).collect();
  format!("{kept}...")
}

pub fn format_amount(currency: &str, value: f64) -> String {
  let cents = (value * 100.0).round() as i64;
  let negative = cents < 0;
  let cents = cents.abs();
  let whole = cents / 100;
  let frac = cents % 100;

  let digits = whole.to_string();
  let mut grouped = String::new();
  for (index, ch) in digits.chars().enumerate() {
    if index > 0 && (digits.len() - index) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let sign = if negative { "-" } else { "" };
  format!("{currency} {sign}{grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn settings() -> Settings {
    Settings {
      currency_code: "QAR".to_string(),
      report_recent_limit: 15,
    }
  }

  fn generated() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-20T14:03:00Z").unwrap().with_timezone(&Utc)
  }

  fn entry(entry_type: EntryType, amount: f64, description: &str, date: &str) -> BudgetEntry {
    BudgetEntry {
      id: 1,
      entry_type,
      amount,
      description: description.to_string(),
      category: "Fuel".to_string(),
      project_name: None,
      contractor: None,
      location: None,
      date: date.to_string(),
      created_at: String::new(),
      updated_at: String::new(),
    }
  }

  fn zero_totals() -> Totals {
    Totals {
      total_in: 0.0,
      total_out: 0.0,
      net_balance: 0.0,
    }
  }

  #[test]
  fn filename_embeds_generation_date() {
    assert_eq!(report_filename(generated()), "budget-report-2024-05-20.txt");
  }

  #[test]
  fn empty_data_produces_explicit_no_data_lines() {
    let text = render_report(&settings(), &zero_totals(), &[], &[], generated());
    assert!(text.contains("No transactions found."));
    assert!(text.contains("No petty cash notes found."));
    assert!(text.contains("NET BALANCE: QAR 0.00"));
  }

  #[test]
  fn summary_uses_grouped_amounts() {
    let totals = Totals {
      total_in: 1234567.5,
      total_out: 600.0,
      net_balance: 1233967.5,
    };
    let text = render_report(&settings(), &totals, &[], &[], generated());
    assert!(text.contains("TOTAL INCOME: QAR 1,234,567.50"));
    assert!(text.contains("TOTAL EXPENSES: QAR 600.00"));
    assert!(text.contains("NET BALANCE: QAR 1,233,967.50"));
    assert!(text.contains("Generated: 2024-05-20 14:03 UTC"));
  }

  #[test]
  fn negative_net_balance_keeps_sign_inside_amount() {
    let totals = Totals {
      total_in: 100.0,
      total_out: 350.0,
      net_balance: -250.0,
    };
    let text = render_report(&settings(), &totals, &[], &[], generated());
    assert!(text.contains("NET BALANCE: QAR -250.00"));
  }

  #[test]
  fn entry_rows_split_income_and_expense_columns() {
    let entries = vec![
      entry(EntryType::Income, 1000.0, "Phase 1 payment", "2024-01-05"),
      entry(EntryType::Expense, 400.0, "Diesel", "2024-01-10"),
    ];
    let text = render_report(&settings(), &zero_totals(), &entries, &[], generated());
    let income_row = text.lines().find(|line| line.contains("Phase 1 payment")).unwrap();
    assert!(income_row.contains("INCOME"));
    assert!(income_row.contains("QAR 1,000.00"));
    let expense_row = text.lines().find(|line| line.contains("Diesel")).unwrap();
    assert!(expense_row.contains("EXPENSE"));
    assert!(expense_row.contains("QAR 400.00"));
  }

  #[test]
  fn excerpt_is_bounded_by_configured_limit() {
    let mut config = settings();
    config.report_recent_limit = 2;
    let entries: Vec<BudgetEntry> = (0..5)
      .map(|i| entry(EntryType::Expense, 10.0, &format!("row {i}"), "2024-01-10"))
      .collect();
    let text = render_report(&config, &zero_totals(), &entries, &[], generated());
    assert!(text.contains("row 0"));
    assert!(text.contains("row 1"));
    assert!(!text.contains("row 2"));
  }

  #[test]
  fn malformed_date_renders_placeholder_instead_of_failing() {
    let entries = vec![entry(EntryType::Expense, 10.0, "bad date row", "garbage")];
    let text = render_report(&settings(), &zero_totals(), &entries, &[], generated());
    let row = text.lines().find(|line| line.contains("bad date row")).unwrap();
    assert!(row.starts_with("N/A"));
  }

  #[test]
  fn long_descriptions_are_truncated() {
    let long = "a very long description that will definitely not fit the column";
    let entries = vec![entry(EntryType::Expense, 10.0, long, "2024-01-10")];
    let text = render_report(&settings(), &zero_totals(), &entries, &[], generated());
    assert!(text.contains("a very long description t..."));
    assert!(!text.contains(long));
  }

  #[test]
  fn write_report_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let notes = vec![PettyCashNote {
      id: 1,
      name: "Azeem".to_string(),
      description: "Bought screws".to_string(),
      date: "2024-02-10".to_string(),
      created_at: String::new(),
      updated_at: String::new(),
    }];
    let path = write_report(dir.path(), &settings(), &zero_totals(), &[], &notes, generated()).unwrap();
    assert_eq!(path.file_name().unwrap(), "budget-report-2024-05-20.txt");
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("Azeem"));
    assert!(contents.contains("No transactions found."));
  }
}
