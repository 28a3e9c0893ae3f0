//! Command-line surface. Flags are parsed here, turned into the command
//! layer's inputs and printed as plain text; no business rules live here.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::db::Db;
use crate::domain::draft::{EntryDraft, EntryField, NoteDraft};
use crate::domain::{categories, validation};
use crate::error::AppError;
use crate::models::*;
use crate::report::format_amount;

#[derive(Debug, Parser)]
#[command(name = "sitebook", version, about = "Budget tracking for a small construction business")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Record an income entry
  Income(EntryArgs),
  /// Record an expense entry
  Expense(EntryArgs),
  /// Edit an existing entry
  Edit(EditArgs),
  /// Delete an entry
  Delete {
    id: i64,
  },
  /// List entries, optionally filtered
  List(ListArgs),
  /// Petty cash notes
  #[command(subcommand)]
  Note(NoteCommand),
  /// Income, expense and balance totals
  Summary,
  /// Monthly series and expense split by category
  Analytics,
  /// Export the plain-text report
  Report {
    /// Directory to write the report into
    #[arg(long)]
    out: Option<PathBuf>,
  },
  /// Show the allowed categories and petty cash names
  Categories,
  /// Show or change settings
  Settings(SettingsArgs),
  /// Insert demo data
  Seed {
    #[arg(long, default_value_t = 60)]
    count: i64,
  },
  /// Remove demo data again
  ClearDemo,
  /// Show the most recent audit log rows
  Audit {
    #[arg(long, default_value_t = 25)]
    limit: i64,
  },
}

#[derive(Debug, Args)]
pub struct EntryArgs {
  #[arg(long)]
  pub amount: String,
  #[arg(long)]
  pub description: String,
  #[arg(long)]
  pub category: String,
  #[arg(long)]
  pub project: Option<String>,
  #[arg(long)]
  pub contractor: Option<String>,
  #[arg(long)]
  pub location: Option<String>,
  /// Entry date (YYYY-MM-DD), defaults to today
  #[arg(long)]
  pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
  pub id: i64,
  /// Switch the entry type (income or expense)
  #[arg(long = "type")]
  pub entry_type: Option<String>,
  #[arg(long)]
  pub amount: Option<f64>,
  #[arg(long)]
  pub description: Option<String>,
  #[arg(long)]
  pub category: Option<String>,
  /// New project name; pass an empty string to clear it
  #[arg(long)]
  pub project: Option<String>,
  #[arg(long)]
  pub contractor: Option<String>,
  #[arg(long)]
  pub location: Option<String>,
  #[arg(long)]
  pub date: Option<String>,
}

#[derive(Debug, Args, Default)]
pub struct ListArgs {
  /// Case-insensitive text search across description, category and details
  #[arg(long)]
  pub search: Option<String>,
  /// Only entries on this exact date (YYYY-MM-DD)
  #[arg(long, conflicts_with_all = ["from", "to"])]
  pub on: Option<String>,
  /// Earliest date to include (YYYY-MM-DD)
  #[arg(long)]
  pub from: Option<String>,
  /// Latest date to include (YYYY-MM-DD)
  #[arg(long)]
  pub to: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
  /// Record a petty cash note
  Add {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    date: Option<String>,
  },
  /// List all notes, newest first
  List,
  /// Edit an existing note
  Edit {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    date: Option<String>,
  },
  /// Delete a note
  Delete {
    id: i64,
  },
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
  #[arg(long)]
  pub currency: Option<String>,
  /// How many recent transactions the report shows
  #[arg(long)]
  pub report_limit: Option<i64>,
}

pub fn run(cli: Cli, db: &Db, app_dir: &Path) -> Result<(), AppError> {
  match cli.command {
    Command::Income(args) => add_entry(db, EntryType::Income, args),
    Command::Expense(args) => add_entry(db, EntryType::Expense, args),
    Command::Edit(args) => edit_entry(db, args),
    Command::Delete { id } => {
      commands::delete_entry(db, id)?;
      println!("Deleted entry {id}.");
      Ok(())
    }
    Command::List(args) => list_entries(db, args),
    Command::Note(note) => run_note(db, note),
    Command::Summary => {
      let settings = commands::get_settings(db)?;
      let totals = commands::overview(db)?;
      println!("Total income:   {}", format_amount(&settings.currency_code, totals.total_in));
      println!("Total expenses: {}", format_amount(&settings.currency_code, totals.total_out));
      println!("Net balance:    {}", format_amount(&settings.currency_code, totals.net_balance));
      Ok(())
    }
    Command::Analytics => print_analytics(db),
    Command::Report { out } => {
      let path = commands::export_report(db, app_dir, out)?;
      println!("Report written to {}", path.display());
      Ok(())
    }
    Command::Categories => {
      print_categories();
      Ok(())
    }
    Command::Settings(args) => run_settings(db, args),
    Command::Seed { count } => {
      let created = commands::seed_demo_data(db, count)?;
      println!("Seeded {created} demo records.");
      Ok(())
    }
    Command::ClearDemo => {
      let deleted = commands::clear_demo_data(db)?;
      println!("Removed {deleted} demo records.");
      Ok(())
    }
    Command::Audit { limit } => {
      for row in commands::list_audit_log(db, limit)? {
        println!(
          "{}  {:<15} {:<8} {}",
          row.ts,
          row.action,
          row.entity_type,
          row.entity_id.as_deref().unwrap_or("-")
        );
      }
      Ok(())
    }
  }
}

fn add_entry(db: &Db, entry_type: EntryType, args: EntryArgs) -> Result<(), AppError> {
  let mut draft = EntryDraft::new(entry_type, Utc::now().date_naive());
  draft.set(EntryField::Amount, args.amount);
  draft.set(EntryField::Description, args.description);
  draft.set(EntryField::Category, args.category);
  if let Some(project) = args.project {
    draft.set(EntryField::ProjectName, project);
  }
  if let Some(contractor) = args.contractor {
    draft.set(EntryField::Contractor, contractor);
  }
  if let Some(location) = args.location {
    draft.set(EntryField::Location, location);
  }
  if let Some(date) = args.date {
    draft.set(EntryField::Date, date);
  }

  let created = commands::create_entry(db, draft.submit()?)?;
  println!("Created {} entry {} ({}).", created.entry_type, created.id, created.date);
  Ok(())
}

fn edit_entry(db: &Db, args: EditArgs) -> Result<(), AppError> {
  let entry_type = match args.entry_type.as_deref() {
    Some(text) => Some(EntryType::parse(text)?),
    None => None,
  };
  let update = EntryUpdateInput {
    entry_type,
    amount: args.amount,
    description: args.description,
    category: args.category,
    project_name: args.project.map(clear_on_empty),
    contractor: args.contractor.map(clear_on_empty),
    location: args.location.map(clear_on_empty),
    date: args.date,
  };
  let updated = commands::update_entry(db, args.id, update)?;
  println!("Updated entry {} ({}).", updated.id, updated.date);
  Ok(())
}

fn list_entries(db: &Db, args: ListArgs) -> Result<(), AppError> {
  let query = build_query(&args)?;
  let settings = commands::get_settings(db)?;
  let entries = commands::list_entries(db, Some(&query))?;
  if entries.is_empty() {
    println!("No transactions found.");
    return Ok(());
  }

  println!(
    "{:>5}  {:<10}  {:<7}  {:<18}  {:<30}  {:>14}",
    "Id", "Date", "Type", "Category", "Description", "Amount"
  );
  for entry in &entries {
    println!(
      "{:>5}  {:<10}  {:<7}  {:<18}  {:<30}  {:>14}",
      entry.id,
      entry.date,
      entry.entry_type.as_str(),
      entry.category,
      entry.description,
      format_amount(&settings.currency_code, entry.amount)
    );
  }
  Ok(())
}

fn run_note(db: &Db, note: NoteCommand) -> Result<(), AppError> {
  match note {
    NoteCommand::Add { name, description, date } => {
      let mut draft = NoteDraft::new(Utc::now().date_naive());
      draft.name = name;
      draft.description = description;
      if let Some(date) = date {
        draft.date = date;
      }
      let created = commands::create_note(db, draft.submit()?)?;
      println!("Created note {} for {}.", created.id, created.name);
      Ok(())
    }
    NoteCommand::List => {
      let notes = commands::list_notes(db)?;
      if notes.is_empty() {
        println!("No petty cash notes found.");
        return Ok(());
      }
      for note in &notes {
        println!("{:>5}  {:<10}  {:<10}  {}", note.id, note.date, note.name, note.description);
      }
      Ok(())
    }
    NoteCommand::Edit { id, name, description, date } => {
      let updated = commands::update_note(db, id, NoteUpdateInput { name, description, date })?;
      println!("Updated note {} ({}).", updated.id, updated.name);
      Ok(())
    }
    NoteCommand::Delete { id } => {
      commands::delete_note(db, id)?;
      println!("Deleted note {id}.");
      Ok(())
    }
  }
}

fn print_analytics(db: &Db) -> Result<(), AppError> {
  let settings = commands::get_settings(db)?;
  let analytics = commands::analytics(db)?;

  println!("Monthly income and expenses");
  if analytics.monthly.is_empty() {
    println!("  (no data)");
  }
  for point in &analytics.monthly {
    println!(
      "  {:<9} income {:>14}  expenses {:>14}",
      point.month,
      format_amount(&settings.currency_code, point.income),
      format_amount(&settings.currency_code, point.expense)
    );
  }

  println!("Expenses by category");
  if analytics.categories.is_empty() {
    println!("  (no data)");
  }
  for split in &analytics.categories {
    println!(
      "  {:<25} {:>14}",
      split.category,
      format_amount(&settings.currency_code, split.amount)
    );
  }
  Ok(())
}

fn print_categories() {
  println!("Income categories:");
  for category in categories::INCOME_CATEGORIES {
    println!("  {category}");
  }
  println!("Expense categories:");
  for category in categories::EXPENSE_CATEGORIES {
    println!("  {category}");
  }
  println!("Petty cash names:");
  for name in categories::PETTY_CASH_NAMES {
    println!("  {name}");
  }
}

fn run_settings(db: &Db, args: SettingsArgs) -> Result<(), AppError> {
  if args.currency.is_none() && args.report_limit.is_none() {
    let settings = commands::get_settings(db)?;
    println!("currency_code = {}", settings.currency_code);
    println!("report_recent_limit = {}", settings.report_recent_limit);
    return Ok(());
  }

  let current = commands::get_settings(db)?;
  let updated = commands::update_settings(
    db,
    Settings {
      currency_code: args.currency.unwrap_or(current.currency_code),
      report_recent_limit: args.report_limit.unwrap_or(current.report_recent_limit),
    },
  )?;
  println!("currency_code = {}", updated.currency_code);
  println!("report_recent_limit = {}", updated.report_recent_limit);
  Ok(())
}

pub fn build_query(args: &ListArgs) -> Result<EntryQuery, AppError> {
  let date_filter = if let Some(on) = args.on.as_deref() {
    DateFilter::Specific {
      date: Some(validation::parse_date(on)?),
    }
  } else {
    DateFilter::Range {
      from: args.from.as_deref().map(validation::parse_date).transpose()?,
      to: args.to.as_deref().map(validation::parse_date).transpose()?,
    }
  };
  Ok(EntryQuery {
    search: args.search.clone().unwrap_or_default(),
    date_filter,
  })
}

fn clear_on_empty(value: String) -> Option<String> {
  if value.trim().is_empty() {
    None
  } else {
    Some(value)
  }
}
