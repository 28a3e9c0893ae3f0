use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::AppError;
use crate::models::AuditLogEntry;

pub fn append_audit(
  conn: &Connection,
  action: &str,
  entity_type: &str,
  entity_id: Option<String>,
  payload_json: String,
  details: Option<String>,
) -> Result<(), AppError> {
  let ts = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO audit_log (ts, action, entity_type, entity_id, payload_json, details) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![ts, action, entity_type, entity_id, payload_json, details],
  )?;
  Ok(())
}

pub fn list_audit_log(conn: &Connection, limit: i64) -> Result<Vec<AuditLogEntry>, AppError> {
  let limit = if limit < 1 { 100 } else { limit };
  let mut stmt = conn.prepare(
    "SELECT id, ts, action, entity_type, entity_id, payload_json, details
     FROM audit_log
     ORDER BY id DESC
     LIMIT ?1",
  )?;
  let rows = stmt.query_map(params![limit], |row| {
    Ok(AuditLogEntry {
      id: row.get(0)?,
      ts: row.get(1)?,
      action: row.get(2)?,
      entity_type: row.get(3)?,
      entity_id: row.get(4)?,
      payload_json: row.get(5)?,
      details: row.get(6)?,
    })
  })?;

  let mut items = Vec::new();
  for row in rows {
    items.push(row?);
  }
  Ok(items)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::db;

  #[test]
  fn appends_and_lists_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();
    db::with_conn(&db, |conn| {
      append_audit(conn, "CREATE_ENTRY", "ENTRY", Some("1".to_string()), "{}".to_string(), None)?;
      append_audit(conn, "DELETE_ENTRY", "ENTRY", Some("1".to_string()), "{}".to_string(), None)?;

      let log = list_audit_log(conn, 10)?;
      assert_eq!(log.len(), 2);
      assert_eq!(log[0].action, "DELETE_ENTRY");
      assert_eq!(log[1].action, "CREATE_ENTRY");
      Ok(())
    })
    .unwrap();
  }
}
