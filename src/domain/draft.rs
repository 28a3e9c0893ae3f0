//! Form drafts. One mutable structure per form with a single update entry
//! point and an explicit submit transition; cancelling is dropping the
//! draft. Field values stay raw text until submit validates them.

use chrono::NaiveDate;

use crate::domain::validation;
use crate::error::AppError;
use crate::models::{BudgetEntry, EntryType, NewEntryInput, NewNoteInput, PettyCashNote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
  Amount,
  Description,
  Category,
  ProjectName,
  Contractor,
  Location,
  Date,
}

#[derive(Debug, Clone)]
pub struct EntryDraft {
  pub entry_type: EntryType,
  pub amount: String,
  pub description: String,
  pub category: String,
  pub project_name: String,
  pub contractor: String,
  pub location: String,
  pub date: String,
}

impl EntryDraft {
  pub fn new(entry_type: EntryType, today: NaiveDate) -> Self {
    Self {
      entry_type,
      amount: String::new(),
      description: String::new(),
      category: String::new(),
      project_name: String::new(),
      contractor: String::new(),
      location: String::new(),
      date: today.format("%Y-%m-%d").to_string(),
    }
  }

  pub fn from_entry(entry: &BudgetEntry) -> Self {
    Self {
      entry_type: entry.entry_type,
      amount: entry.amount.to_string(),
      description: entry.description.clone(),
      category: entry.category.clone(),
      project_name: entry.project_name.clone().unwrap_or_default(),
      contractor: entry.contractor.clone().unwrap_or_default(),
      location: entry.location.clone().unwrap_or_default(),
      date: entry.date.clone(),
    }
  }

  pub fn set(&mut self, field: EntryField, value: impl Into<String>) {
    let value = value.into();
    match field {
      EntryField::Amount => self.amount = value,
      EntryField::Description => self.description = value,
      EntryField::Category => self.category = value,
      EntryField::ProjectName => self.project_name = value,
      EntryField::Contractor => self.contractor = value,
      EntryField::Location => self.location = value,
      EntryField::Date => self.date = value,
    }
  }

  pub fn set_entry_type(&mut self, entry_type: EntryType) {
    // Categories are type-scoped, so a stale pick must not survive a switch.
    if entry_type != self.entry_type {
      self.category.clear();
    }
    self.entry_type = entry_type;
  }

  pub fn submit(&self) -> Result<NewEntryInput, AppError> {
    let amount_text = self.amount.trim();
    if amount_text.is_empty() {
      return Err(AppError::new("INVALID_AMOUNT", "Amount is required"));
    }
    let amount: f64 = amount_text
      .parse()
      .map_err(|_| AppError::new("INVALID_AMOUNT", "Amount must be a number"))?;
    validation::ensure_amount_positive(amount)?;
    validation::ensure_description(&self.description)?;
    validation::ensure_category(self.entry_type, self.category.trim())?;
    validation::parse_date(self.date.trim())?;

    Ok(NewEntryInput {
      entry_type: self.entry_type,
      amount,
      description: self.description.trim().to_string(),
      category: self.category.trim().to_string(),
      project_name: validation::normalize_optional(Some(self.project_name.clone())),
      contractor: validation::normalize_optional(Some(self.contractor.clone())),
      location: validation::normalize_optional(Some(self.location.clone())),
      date: self.date.trim().to_string(),
    })
  }
}

#[derive(Debug, Clone)]
pub struct NoteDraft {
  pub name: String,
  pub description: String,
  pub date: String,
}

impl NoteDraft {
  pub fn new(today: NaiveDate) -> Self {
    Self {
      name: String::new(),
      description: String::new(),
      date: today.format("%Y-%m-%d").to_string(),
    }
  }

  pub fn from_note(note: &PettyCashNote) -> Self {
    Self {
      name: note.name.clone(),
      description: note.description.clone(),
      date: note.date.clone(),
    }
  }

  pub fn submit(&self) -> Result<NewNoteInput, AppError> {
    validation::ensure_petty_cash_name(self.name.trim())?;
    validation::ensure_description(&self.description)?;
    validation::parse_date(self.date.trim())?;

    Ok(NewNoteInput {
      name: self.name.trim().to_string(),
      description: self.description.trim().to_string(),
      date: self.date.trim().to_string(),
    })
  }
}
