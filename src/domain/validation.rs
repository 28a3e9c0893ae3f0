use chrono::NaiveDate;

use crate::domain::categories;
use crate::error::AppError;
use crate::models::EntryType;

pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
  NaiveDate::parse_from_str(date, "%Y-%m-%d")
    .map_err(|_| AppError::new("INVALID_DATE", "Date must be YYYY-MM-DD"))
}

pub fn ensure_amount_positive(amount: f64) -> Result<(), AppError> {
  if !amount.is_finite() || amount <= 0.0 {
    Err(AppError::new("INVALID_AMOUNT", "Amount must be greater than zero"))
  } else {
    Ok(())
  }
}

pub fn ensure_description(description: &str) -> Result<(), AppError> {
  if description.trim().is_empty() {
    Err(AppError::new("INVALID_DESCRIPTION", "Description is required"))
  } else {
    Ok(())
  }
}

pub fn ensure_category(entry_type: EntryType, category: &str) -> Result<(), AppError> {
  if category.trim().is_empty() {
    return Err(AppError::new("INVALID_CATEGORY", "Category is required"));
  }
  if !categories::is_valid_category(entry_type, category) {
    return Err(AppError::new(
      "INVALID_CATEGORY",
      format!("'{category}' is not a valid {entry_type} category"),
    ));
  }
  Ok(())
}

pub fn ensure_petty_cash_name(name: &str) -> Result<(), AppError> {
  if categories::is_valid_petty_cash_name(name) {
    Ok(())
  } else {
    Err(AppError::new(
      "INVALID_NAME",
      format!("'{name}' is not a known petty cash name"),
    ))
  }
}

/// Empty or whitespace-only optional text is stored as NULL, never as "".
pub fn normalize_optional(value: Option<String>) -> Option<String> {
  value.and_then(|text| {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      None
    } else {
      Some(trimmed.to_string())
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_iso_dates_only() {
    assert_eq!(
      parse_date("2024-01-05").unwrap(),
      NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    );
    assert!(parse_date("05/01/2024").is_err());
    assert!(parse_date("2024-13-01").is_err());
    assert!(parse_date("").is_err());
  }

  #[test]
  fn rejects_non_positive_amounts() {
    assert!(ensure_amount_positive(0.01).is_ok());
    assert!(ensure_amount_positive(0.0).is_err());
    assert!(ensure_amount_positive(-5.0).is_err());
    assert!(ensure_amount_positive(f64::NAN).is_err());
  }

  #[test]
  fn category_must_match_entry_type() {
    assert!(ensure_category(EntryType::Expense, "Fuel").is_ok());
    assert!(ensure_category(EntryType::Income, "Fuel").is_err());
    assert!(ensure_category(EntryType::Expense, "").is_err());
  }

  #[test]
  fn optional_text_normalizes_to_none() {
    assert_eq!(normalize_optional(None), None);
    assert_eq!(normalize_optional(Some("".to_string())), None);
    assert_eq!(normalize_optional(Some("   ".to_string())), None);
    assert_eq!(
      normalize_optional(Some("  Site A ".to_string())),
      Some("Site A".to_string())
    );
  }
}
