use rusqlite::{params, Connection};

use crate::error::AppError;
use crate::models::Settings;

const KEY_CURRENCY: &str = "currency_code";
const KEY_REPORT_LIMIT: &str = "report_recent_limit";

const DEFAULT_CURRENCY: &str = "QAR";
const DEFAULT_REPORT_LIMIT: i64 = 15;

pub fn ensure_defaults(conn: &Connection) -> Result<(), AppError> {
  conn.execute(
    "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
    params![KEY_CURRENCY, DEFAULT_CURRENCY],
  )?;
  conn.execute(
    "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
    params![KEY_REPORT_LIMIT, DEFAULT_REPORT_LIMIT.to_string()],
  )?;
  Ok(())
}

pub fn get_settings(conn: &Connection) -> Result<Settings, AppError> {
  let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
  let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

  let mut currency_code = DEFAULT_CURRENCY.to_string();
  let mut report_recent_limit = DEFAULT_REPORT_LIMIT;

  for row in rows {
    let (key, value) = row?;
    match key.as_str() {
      KEY_CURRENCY => {
        currency_code = value;
      }
      KEY_REPORT_LIMIT => {
        report_recent_limit = value.parse().unwrap_or(report_recent_limit);
      }
      _ => {}
    }
  }

  Ok(Settings {
    currency_code,
    report_recent_limit,
  })
}

pub fn update_settings(conn: &Connection, settings: &Settings) -> Result<(), AppError> {
  if settings.currency_code.trim().is_empty() {
    return Err(AppError::new("INVALID_SETTINGS", "Currency code is required"));
  }
  if settings.report_recent_limit < 1 {
    return Err(AppError::new("INVALID_SETTINGS", "Report excerpt size must be at least 1"));
  }

  conn.execute(
    "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
    params![KEY_CURRENCY, settings.currency_code.trim()],
  )?;
  conn.execute(
    "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
    params![KEY_REPORT_LIMIT, settings.report_recent_limit.to_string()],
  )?;
  Ok(())
}
