//! Entry Store: SQLite persistence for both record collections. Lists are
//! always returned ordered by date descending (newest first, ties broken
//! by id). Writers return the stored row so callers refresh from the store
//! instead of patching local state.

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::AppError;
use crate::models::{
  BudgetEntry, EntryType, EntryUpdateInput, NewEntryInput, NewNoteInput, NoteUpdateInput,
  PettyCashNote,
};

const ENTRY_COLUMNS: &str =
  "id, type, amount, description, category, project_name, contractor, location, date, created_at, updated_at";

fn map_entry_row(row: &rusqlite::Row) -> Result<BudgetEntry, rusqlite::Error> {
  let type_text: String = row.get(1)?;
  let entry_type = EntryType::parse(&type_text).map_err(|_| {
    rusqlite::Error::FromSqlConversionFailure(
      1,
      rusqlite::types::Type::Text,
      format!("unknown entry type '{type_text}'").into(),
    )
  })?;
  Ok(BudgetEntry {
    id: row.get(0)?,
    entry_type,
    amount: row.get(2)?,
    description: row.get(3)?,
    category: row.get(4)?,
    project_name: row.get(5)?,
    contractor: row.get(6)?,
    location: row.get(7)?,
    date: row.get(8)?,
    created_at: row.get(9)?,
    updated_at: row.get(10)?,
  })
}

pub fn list_entries(conn: &Connection) -> Result<Vec<BudgetEntry>, AppError> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {ENTRY_COLUMNS} FROM budget_entries ORDER BY date DESC, id DESC"
  ))?;
  let rows = stmt.query_map([], |row| map_entry_row(row))?;
  let mut items = Vec::new();
  for row in rows {
    items.push(row?);
  }
  Ok(items)
}

pub fn get_entry(conn: &Connection, id: i64) -> Result<BudgetEntry, AppError> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {ENTRY_COLUMNS} FROM budget_entries WHERE id = ?1"
  ))?;
  let entry = stmt.query_row(params![id], |row| map_entry_row(row))?;
  Ok(entry)
}

pub fn create_entry(conn: &Connection, input: &NewEntryInput) -> Result<BudgetEntry, AppError> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO budget_entries (type, amount, description, category, project_name, contractor, location, date, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    params![
      input.entry_type.as_str(),
      input.amount,
      input.description,
      input.category,
      input.project_name,
      input.contractor,
      input.location,
      input.date,
      now,
      now
    ],
  )?;
  get_entry(conn, conn.last_insert_rowid())
}

pub fn update_entry(conn: &Connection, id: i64, update: &EntryUpdateInput) -> Result<BudgetEntry, AppError> {
  let current = get_entry(conn, id)?;
  let entry_type = update.entry_type.unwrap_or(current.entry_type);
  let amount = update.amount.unwrap_or(current.amount);
  let description = update.description.clone().unwrap_or(current.description);
  let category = update.category.clone().unwrap_or(current.category);
  let project_name = update.project_name.clone().unwrap_or(current.project_name);
  let contractor = update.contractor.clone().unwrap_or(current.contractor);
  let location = update.location.clone().unwrap_or(current.location);
  let date = update.date.clone().unwrap_or(current.date);

  conn.execute(
    "UPDATE budget_entries
     SET type = ?1, amount = ?2, description = ?3, category = ?4, project_name = ?5,
         contractor = ?6, location = ?7, date = ?8, updated_at = ?9
     WHERE id = ?10",
    params![
      entry_type.as_str(),
      amount,
      description,
      category,
      project_name,
      contractor,
      location,
      date,
      Utc::now().to_rfc3339(),
      id
    ],
  )?;
  get_entry(conn, id)
}

pub fn delete_entry(conn: &Connection, id: i64) -> Result<(), AppError> {
  let deleted = conn.execute("DELETE FROM budget_entries WHERE id = ?1", params![id])?;
  if deleted == 0 {
    return Err(AppError::new("NOT_FOUND", format!("Entry {id} not found")));
  }
  Ok(())
}

fn map_note_row(row: &rusqlite::Row) -> Result<PettyCashNote, rusqlite::Error> {
  Ok(PettyCashNote {
    id: row.get(0)?,
    name: row.get(1)?,
    description: row.get(2)?,
    date: row.get(3)?,
    created_at: row.get(4)?,
    updated_at: row.get(5)?,
  })
}

pub fn list_notes(conn: &Connection) -> Result<Vec<PettyCashNote>, AppError> {
  let mut stmt = conn.prepare(
    "SELECT id, name, description, date, created_at, updated_at
     FROM petty_cash_notes ORDER BY date DESC, id DESC",
  )?;
  let rows = stmt.query_map([], |row| map_note_row(row))?;
  let mut items = Vec::new();
  for row in rows {
    items.push(row?);
  }
  Ok(items)
}

pub fn get_note(conn: &Connection, id: i64) -> Result<PettyCashNote, AppError> {
  let mut stmt = conn.prepare(
    "SELECT id, name, description, date, created_at, updated_at
     FROM petty_cash_notes WHERE id = ?1",
  )?;
  let note = stmt.query_row(params![id], |row| map_note_row(row))?;
  Ok(note)
}

pub fn create_note(conn: &Connection, input: &NewNoteInput) -> Result<PettyCashNote, AppError> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO petty_cash_notes (name, description, date, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![input.name, input.description, input.date, now, now],
  )?;
  get_note(conn, conn.last_insert_rowid())
}

pub fn update_note(conn: &Connection, id: i64, update: &NoteUpdateInput) -> Result<PettyCashNote, AppError> {
  let current = get_note(conn, id)?;
  let name = update.name.clone().unwrap_or(current.name);
  let description = update.description.clone().unwrap_or(current.description);
  let date = update.date.clone().unwrap_or(current.date);

  conn.execute(
    "UPDATE petty_cash_notes SET name = ?1, description = ?2, date = ?3, updated_at = ?4 WHERE id = ?5",
    params![name, description, date, Utc::now().to_rfc3339(), id],
  )?;
  get_note(conn, id)
}

pub fn delete_note(conn: &Connection, id: i64) -> Result<(), AppError> {
  let deleted = conn.execute("DELETE FROM petty_cash_notes WHERE id = ?1", params![id])?;
  if deleted == 0 {
    return Err(AppError::new("NOT_FOUND", format!("Note {id} not found")));
  }
  Ok(())
}
