use crate::models::EntryType;

pub const INCOME_CATEGORIES: &[&str] = &[
  "Project Payment",
  "Consultation Fee",
  "Equipment Rental",
  "Contract Milestone",
  "Emergency Repair",
  "Maintenance Contract",
  "Other Income",
];

pub const EXPENSE_CATEGORIES: &[&str] = &[
  "Materials",
  "Labor Cost",
  "Equipment Purchase",
  "Equipment Rental",
  "Fuel",
  "Vehicle Maintenance",
  "Tools",
  "Permits & Licenses",
  "Insurance",
  "Utilities",
  "Office Supplies",
  "Marketing",
  "Travel",
  "Subcontractor",
  "Other Expense",
];

pub const PETTY_CASH_NAMES: &[&str] = &[
  "Rifkan",
  "Bismillah",
  "Mubassir",
  "Azeem",
  "Iftikar",
  "Faris",
];

pub fn categories_for(entry_type: EntryType) -> &'static [&'static str] {
  match entry_type {
    EntryType::Income => INCOME_CATEGORIES,
    EntryType::Expense => EXPENSE_CATEGORIES,
  }
}

pub fn is_valid_category(entry_type: EntryType, category: &str) -> bool {
  categories_for(entry_type).contains(&category)
}

pub fn is_valid_petty_cash_name(name: &str) -> bool {
  PETTY_CASH_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_sets_depend_on_entry_type() {
    assert!(is_valid_category(EntryType::Income, "Project Payment"));
    assert!(!is_valid_category(EntryType::Income, "Fuel"));
    assert!(is_valid_category(EntryType::Expense, "Fuel"));
    // "Equipment Rental" exists on both sides.
    assert!(is_valid_category(EntryType::Income, "Equipment Rental"));
    assert!(is_valid_category(EntryType::Expense, "Equipment Rental"));
  }

  #[test]
  fn petty_cash_names_are_closed() {
    assert!(is_valid_petty_cash_name("Rifkan"));
    assert!(!is_valid_petty_cash_name("rifkan"));
    assert!(!is_valid_petty_cash_name("Someone Else"));
  }
}
