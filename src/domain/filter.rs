//! Linear-scan filter over the entry list. Cheap enough to rerun on every
//! keystroke at the record counts this tool sees; it never touches the
//! aggregates.

use crate::domain::validation;
use crate::models::{BudgetEntry, DateFilter, EntryQuery};

pub fn matches(entry: &BudgetEntry, query: &EntryQuery) -> bool {
  matches_search(entry, &query.search) && matches_date(entry, &query.date_filter)
}

pub fn filter_entries<'a>(entries: &'a [BudgetEntry], query: &EntryQuery) -> Vec<&'a BudgetEntry> {
  entries.iter().filter(|entry| matches(entry, query)).collect()
}

fn matches_search(entry: &BudgetEntry, search: &str) -> bool {
  let needle = search.trim().to_lowercase();
  if needle.is_empty() {
    return true;
  }

  let field_matches = |value: &str| value.to_lowercase().contains(&needle);
  field_matches(&entry.description)
    || field_matches(&entry.category)
    || entry.project_name.as_deref().is_some_and(field_matches)
    || entry.contractor.as_deref().is_some_and(field_matches)
    || entry.location.as_deref().is_some_and(field_matches)
}

fn matches_date(entry: &BudgetEntry, filter: &DateFilter) -> bool {
  match filter {
    // An unset specific date matches nothing; "show entries for one day"
    // with no day picked is an empty selection.
    DateFilter::Specific { date: None } => false,
    DateFilter::Specific { date: Some(wanted) } => {
      validation::parse_date(&entry.date).is_ok_and(|date| date == *wanted)
    }
    DateFilter::Range { from: None, to: None } => true,
    DateFilter::Range { from, to } => {
      let Ok(date) = validation::parse_date(&entry.date) else {
        // Bounded ranges cannot place an unparsable date.
        return false;
      };
      from.map_or(true, |lower| date >= lower) && to.map_or(true, |upper| date <= upper)
    }
  }
}
