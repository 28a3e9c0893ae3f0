//! Command layer: the operations the presentation surface calls. Each write
//! validates first, then mutates inside the store, appends an audit row and
//! returns the stored record so callers refresh instead of patching local
//! copies. A failed call leaves the store untouched.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};

use crate::audit::append_audit;
use crate::db::{self, Db};
use crate::domain::{aggregate, categories, filter, validation};
use crate::error::AppError;
use crate::models::*;
use crate::report;
use crate::settings;
use crate::store;

pub fn list_entries(db: &Db, query: Option<&EntryQuery>) -> Result<Vec<BudgetEntry>, AppError> {
  let entries = db::with_conn(db, |conn| store::list_entries(conn))?;
  match query {
    Some(query) => Ok(
      filter::filter_entries(&entries, query)
        .into_iter()
        .cloned()
        .collect(),
    ),
    None => Ok(entries),
  }
}

pub fn create_entry(db: &Db, input: NewEntryInput) -> Result<BudgetEntry, AppError> {
  validation::ensure_amount_positive(input.amount)?;
  validation::ensure_description(&input.description)?;
  validation::ensure_category(input.entry_type, &input.category)?;
  validation::parse_date(&input.date)?;

  let input = NewEntryInput {
    project_name: validation::normalize_optional(input.project_name),
    contractor: validation::normalize_optional(input.contractor),
    location: validation::normalize_optional(input.location),
    ..input
  };

  let payload_json = serde_json::to_string(&input).unwrap_or_else(|_| "{}".to_string());
  db::with_conn(db, |conn| {
    let created = store::create_entry(conn, &input)?;
    append_audit(
      conn,
      "CREATE_ENTRY",
      "ENTRY",
      Some(created.id.to_string()),
      payload_json,
      None,
    )?;
    Ok(created)
  })
}

pub fn update_entry(db: &Db, id: i64, update: EntryUpdateInput) -> Result<BudgetEntry, AppError> {
  if let Some(amount) = update.amount {
    validation::ensure_amount_positive(amount)?;
  }
  if let Some(description) = update.description.as_deref() {
    validation::ensure_description(description)?;
  }
  if let Some(date) = update.date.as_deref() {
    validation::parse_date(date)?;
  }

  let update = EntryUpdateInput {
    project_name: update.project_name.map(validation::normalize_optional),
    contractor: update.contractor.map(validation::normalize_optional),
    location: update.location.map(validation::normalize_optional),
    ..update
  };

  let payload_json = serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string());
  db::with_conn(db, |conn| {
    // The category set depends on the effective type, so check the merged
    // pair, not the patch fields in isolation.
    let current = store::get_entry(conn, id)?;
    let entry_type = update.entry_type.unwrap_or(current.entry_type);
    let category = update.category.as_deref().unwrap_or(&current.category);
    validation::ensure_category(entry_type, category)?;

    let updated = store::update_entry(conn, id, &update)?;
    append_audit(
      conn,
      "UPDATE_ENTRY",
      "ENTRY",
      Some(id.to_string()),
      payload_json,
      None,
    )?;
    Ok(updated)
  })
}

pub fn delete_entry(db: &Db, id: i64) -> Result<(), AppError> {
  db::with_conn(db, |conn| {
    store::delete_entry(conn, id)?;
    append_audit(
      conn,
      "DELETE_ENTRY",
      "ENTRY",
      Some(id.to_string()),
      "{}".to_string(),
      None,
    )?;
    Ok(())
  })
}

pub fn list_notes(db: &Db) -> Result<Vec<PettyCashNote>, AppError> {
  db::with_conn(db, |conn| store::list_notes(conn))
}

pub fn create_note(db: &Db, input: NewNoteInput) -> Result<PettyCashNote, AppError> {
  validation::ensure_petty_cash_name(&input.name)?;
  validation::ensure_description(&input.description)?;
  validation::parse_date(&input.date)?;

  let payload_json = serde_json::to_string(&input).unwrap_or_else(|_| "{}".to_string());
  db::with_conn(db, |conn| {
    let created = store::create_note(conn, &input)?;
    append_audit(
      conn,
      "CREATE_NOTE",
      "NOTE",
      Some(created.id.to_string()),
      payload_json,
      None,
    )?;
    Ok(created)
  })
}

pub fn update_note(db: &Db, id: i64, update: NoteUpdateInput) -> Result<PettyCashNote, AppError> {
  if let Some(name) = update.name.as_deref() {
    validation::ensure_petty_cash_name(name)?;
  }
  if let Some(description) = update.description.as_deref() {
    validation::ensure_description(description)?;
  }
  if let Some(date) = update.date.as_deref() {
    validation::parse_date(date)?;
  }

  let payload_json = serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string());
  db::with_conn(db, |conn| {
    let updated = store::update_note(conn, id, &update)?;
    append_audit(
      conn,
      "UPDATE_NOTE",
      "NOTE",
      Some(id.to_string()),
      payload_json,
      None,
    )?;
    Ok(updated)
  })
}

pub fn delete_note(db: &Db, id: i64) -> Result<(), AppError> {
  db::with_conn(db, |conn| {
    store::delete_note(conn, id)?;
    append_audit(
      conn,
      "DELETE_NOTE",
      "NOTE",
      Some(id.to_string()),
      "{}".to_string(),
      None,
    )?;
    Ok(())
  })
}

pub fn overview(db: &Db) -> Result<Totals, AppError> {
  let entries = db::with_conn(db, |conn| store::list_entries(conn))?;
  Ok(aggregate::totals(&entries))
}

pub fn analytics(db: &Db) -> Result<Analytics, AppError> {
  let entries = db::with_conn(db, |conn| store::list_entries(conn))?;
  Ok(Analytics {
    monthly: aggregate::monthly_series(&entries),
    categories: aggregate::category_totals(&entries),
  })
}

pub fn get_settings(db: &Db) -> Result<Settings, AppError> {
  db::with_conn(db, |conn| settings::get_settings(conn))
}

pub fn update_settings(db: &Db, settings_input: Settings) -> Result<Settings, AppError> {
  let payload_json = serde_json::to_string(&settings_input).unwrap_or_else(|_| "{}".to_string());
  db::with_conn(db, |conn| {
    settings::update_settings(conn, &settings_input)?;
    append_audit(conn, "UPDATE_SETTINGS", "SETTINGS", None, payload_json, None)?;
    Ok(settings_input)
  })
}

pub fn export_report(db: &Db, app_dir: &Path, output_dir: Option<PathBuf>) -> Result<PathBuf, AppError> {
  let dir = output_dir.unwrap_or_else(|| app_dir.join("Reports"));
  db::with_conn(db, |conn| {
    let config = settings::get_settings(conn)?;
    let entries = store::list_entries(conn)?;
    let notes = store::list_notes(conn)?;
    let totals = aggregate::totals(&entries);

    let path = report::write_report(&dir, &config, &totals, &entries, &notes, Utc::now())?;
    log::info!("report written to {}", path.display());

    let payload_json = serde_json::to_string(&serde_json::json!({
      "path": path.to_string_lossy(),
      "entries": entries.len(),
      "notes": notes.len(),
    }))
    .unwrap_or_else(|_| "{}".to_string());
    append_audit(
      conn,
      "EXPORT",
      "REPORT",
      Some(path.to_string_lossy().to_string()),
      payload_json,
      None,
    )?;

    Ok(path)
  })
}

pub fn list_audit_log(db: &Db, limit: i64) -> Result<Vec<AuditLogEntry>, AppError> {
  db::with_conn(db, |conn| crate::audit::list_audit_log(conn, limit))
}

/// Seeded rows carry a "Demo: " description prefix so clear_demo_data can
/// remove exactly this set later.
pub fn seed_demo_data(db: &Db, count: i64) -> Result<i64, AppError> {
  let count = count.clamp(1, 100_000) as usize;
  let year = Utc::now().year();
  let mut rng = MockRng::new(Utc::now().timestamp_millis() as u64);

  let income_descriptions = [
    "Villa foundation milestone",
    "Warehouse consultation",
    "Crane rental to client",
    "Road repair callout",
    "Annual maintenance invoice",
  ];
  let expense_descriptions = [
    "Cement and rebar",
    "Crew wages",
    "Diesel for machines",
    "Scaffolding parts",
    "Permit renewal",
    "Site office supplies",
  ];
  let projects = ["Harbor Tower", "West Bay Villas", "Logistics Park", ""];
  let note_descriptions = [
    "Taxi to site",
    "Bought screws and anchors",
    "Water for the crew",
    "Printer paper",
  ];

  db::with_conn(db, |conn| {
    let tx = conn.transaction()?;
    let now = Utc::now().to_rfc3339();

    let mut entry_stmt = tx.prepare(
      "INSERT INTO budget_entries (type, amount, description, category, project_name, contractor, location, date, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    let mut note_stmt = tx.prepare(
      "INSERT INTO petty_cash_notes (name, description, date, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for _ in 0..count {
      let month = rng.next_u32() % 12 + 1;
      let day = rng.next_u32() % days_in_month(year, month) + 1;
      let date = format!("{year}-{month:02}-{day:02}");

      let roll = rng.next_u32() % 100;
      if roll < 45 {
        let category = pick(&mut rng, categories::INCOME_CATEGORIES);
        let description = pick(&mut rng, &income_descriptions);
        entry_stmt.execute(rusqlite::params![
          "income",
          random_amount(&mut rng, 500.0, 50_000.0),
          format!("Demo: {description}"),
          category,
          pick_optional(&mut rng, &projects),
          Option::<String>::None,
          Option::<String>::None,
          date,
          now,
          now
        ])?;
      } else if roll < 90 {
        let category = pick(&mut rng, categories::EXPENSE_CATEGORIES);
        let description = pick(&mut rng, &expense_descriptions);
        entry_stmt.execute(rusqlite::params![
          "expense",
          random_amount(&mut rng, 50.0, 9_000.0),
          format!("Demo: {description}"),
          category,
          pick_optional(&mut rng, &projects),
          Option::<String>::None,
          Option::<String>::None,
          date,
          now,
          now
        ])?;
      } else {
        let name = pick(&mut rng, categories::PETTY_CASH_NAMES);
        let description = pick(&mut rng, &note_descriptions);
        note_stmt.execute(rusqlite::params![
          name,
          format!("Demo: {description}"),
          date,
          now,
          now
        ])?;
      }
    }

    drop(entry_stmt);
    drop(note_stmt);

    let payload_json = serde_json::to_string(&serde_json::json!({ "count": count, "year": year }))
      .unwrap_or_else(|_| "{}".to_string());
    append_audit(
      &tx,
      "SEED_DEMO",
      "ENTRY",
      None,
      payload_json,
      Some("Demo data created".to_string()),
    )?;

    tx.commit()?;
    Ok(count as i64)
  })
}

pub fn clear_demo_data(db: &Db) -> Result<i64, AppError> {
  db::with_conn(db, |conn| {
    let tx = conn.transaction()?;
    let mut deleted = 0_i64;
    deleted += tx.execute("DELETE FROM budget_entries WHERE description LIKE 'Demo:%'", [])? as i64;
    deleted += tx.execute("DELETE FROM petty_cash_notes WHERE description LIKE 'Demo:%'", [])? as i64;

    let payload_json = serde_json::to_string(&serde_json::json!({ "deleted": deleted }))
      .unwrap_or_else(|_| "{}".to_string());
    append_audit(
      &tx,
      "CLEAR_DEMO",
      "ENTRY",
      None,
      payload_json,
      Some("Demo data removed".to_string()),
    )?;

    tx.commit()?;
    Ok(deleted)
  })
}

fn days_in_month(year: i32, month: u32) -> u32 {
  match month {
    4 | 6 | 9 | 11 => 30,
    2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
    2 => 28,
    _ => 31,
  }
}

fn pick<'a>(rng: &mut MockRng, options: &[&'a str]) -> &'a str {
  options[(rng.next_u32() as usize) % options.len()]
}

fn pick_optional(rng: &mut MockRng, options: &[&str]) -> Option<String> {
  let choice = pick(rng, options);
  if choice.is_empty() {
    None
  } else {
    Some(choice.to_string())
  }
}

fn random_amount(rng: &mut MockRng, min: f64, max: f64) -> f64 {
  let range = (max - min).max(1.0);
  let base = min + (rng.next_u32() as f64 % range);
  let cents = (rng.next_u32() % 100) as f64 / 100.0;
  ((base + cents) * 100.0).round() / 100.0
}

struct MockRng {
  state: u64,
}

impl MockRng {
  fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  fn next_u32(&mut self) -> u32 {
    self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
    (self.state >> 32) as u32
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn test_db() -> (tempfile::TempDir, Db) {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();
    (dir, db)
  }

  fn income_input(amount: f64, date: &str) -> NewEntryInput {
    NewEntryInput {
      entry_type: EntryType::Income,
      amount,
      description: "Phase 1 payment".to_string(),
      category: "Project Payment".to_string(),
      project_name: None,
      contractor: None,
      location: None,
      date: date.to_string(),
    }
  }

  #[test]
  fn invalid_input_never_reaches_the_store() {
    let (_dir, db) = test_db();

    let mut bad = income_input(0.0, "2024-01-05");
    assert_eq!(create_entry(&db, bad.clone()).unwrap_err().code, "INVALID_AMOUNT");

    bad.amount = 100.0;
    bad.category = "Fuel".to_string(); // expense category on an income entry
    assert_eq!(create_entry(&db, bad.clone()).unwrap_err().code, "INVALID_CATEGORY");

    bad.category = "Project Payment".to_string();
    bad.date = "tomorrow".to_string();
    assert_eq!(create_entry(&db, bad).unwrap_err().code, "INVALID_DATE");

    assert_eq!(list_entries(&db, None).unwrap().len(), 0);
  }

  #[test]
  fn create_normalizes_blank_optionals() {
    let (_dir, db) = test_db();
    let mut input = income_input(1000.0, "2024-01-05");
    input.project_name = Some("  ".to_string());
    input.location = Some(" Doha ".to_string());

    let created = create_entry(&db, input).unwrap();
    assert_eq!(created.project_name, None);
    assert_eq!(created.location, Some("Doha".to_string()));
  }

  #[test]
  fn update_checks_category_against_effective_type() {
    let (_dir, db) = test_db();
    let created = create_entry(&db, income_input(1000.0, "2024-01-05")).unwrap();

    // Switching type without a matching category must fail.
    let err = update_entry(
      &db,
      created.id,
      EntryUpdateInput {
        entry_type: Some(EntryType::Expense),
        ..Default::default()
      },
    )
    .unwrap_err();
    assert_eq!(err.code, "INVALID_CATEGORY");

    let updated = update_entry(
      &db,
      created.id,
      EntryUpdateInput {
        entry_type: Some(EntryType::Expense),
        category: Some("Fuel".to_string()),
        ..Default::default()
      },
    )
    .unwrap();
    assert_eq!(updated.entry_type, EntryType::Expense);
    assert_eq!(updated.category, "Fuel");
  }

  #[test]
  fn overview_and_analytics_follow_the_worked_scenario() {
    let (_dir, db) = test_db();
    create_entry(&db, income_input(1000.0, "2024-01-05")).unwrap();
    create_entry(
      &db,
      NewEntryInput {
        entry_type: EntryType::Expense,
        amount: 400.0,
        description: "Diesel".to_string(),
        category: "Fuel".to_string(),
        project_name: None,
        contractor: None,
        location: None,
        date: "2024-01-10".to_string(),
      },
    )
    .unwrap();
    create_entry(
      &db,
      NewEntryInput {
        entry_type: EntryType::Expense,
        amount: 200.0,
        description: "Generator top-up".to_string(),
        category: "Fuel".to_string(),
        project_name: None,
        contractor: None,
        location: None,
        date: "2024-02-01".to_string(),
      },
    )
    .unwrap();

    let totals = overview(&db).unwrap();
    assert_eq!(totals.total_in, 1000.0);
    assert_eq!(totals.total_out, 600.0);
    assert_eq!(totals.net_balance, 400.0);

    let analytics = analytics(&db).unwrap();
    let months: Vec<&str> = analytics.monthly.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["Jan 2024", "Feb 2024"]);
    assert_eq!(analytics.categories.len(), 1);
    assert_eq!(analytics.categories[0].category, "Fuel");
    assert_eq!(analytics.categories[0].amount, 600.0);
  }

  #[test]
  fn list_entries_applies_the_filter_engine() {
    let (_dir, db) = test_db();
    create_entry(&db, income_input(1000.0, "2024-01-05")).unwrap();
    create_entry(
      &db,
      NewEntryInput {
        entry_type: EntryType::Expense,
        amount: 400.0,
        description: "Diesel for excavator".to_string(),
        category: "Fuel".to_string(),
        project_name: None,
        contractor: None,
        location: None,
        date: "2024-01-10".to_string(),
      },
    )
    .unwrap();

    let query = EntryQuery {
      search: "FUEL".to_string(),
      ..Default::default()
    };
    let hits = list_entries(&db, Some(&query)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, "Fuel");
  }

  #[test]
  fn export_writes_file_and_audit_row() {
    let (dir, db) = test_db();
    create_entry(&db, income_input(1000.0, "2024-01-05")).unwrap();

    let path = export_report(&db, dir.path(), None).unwrap();
    assert!(path.exists());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("TOTAL INCOME: QAR 1,000.00"));
    assert!(contents.contains("No petty cash notes found."));

    let log = list_audit_log(&db, 10).unwrap();
    assert!(log.iter().any(|row| row.action == "EXPORT"));
  }

  #[test]
  fn seed_then_clear_removes_only_demo_rows() {
    let (_dir, db) = test_db();
    create_entry(&db, income_input(1000.0, "2024-01-05")).unwrap();
    seed_demo_data(&db, 25).unwrap();

    let seeded = list_entries(&db, None).unwrap().len() + list_notes(&db).unwrap().len();
    assert_eq!(seeded, 26);

    clear_demo_data(&db).unwrap();
    let entries = list_entries(&db, None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "Phase 1 payment");
    assert_eq!(list_notes(&db).unwrap().len(), 0);
  }
}
