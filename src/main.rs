use std::process::ExitCode;

use clap::Parser;

use sitebook::cli::{self, Cli};
use sitebook::db;

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let cli = Cli::parse();

  let app_dir = match db::resolve_app_dir() {
    Ok(dir) => dir,
    Err(err) => {
      eprintln!("Error: {err}");
      return ExitCode::FAILURE;
    }
  };

  let db = match db::init_db(&app_dir) {
    Ok(db) => db,
    Err(err) => {
      eprintln!("Error: {err}");
      return ExitCode::FAILURE;
    }
  };
  log::debug!("database at {}", db.db_path.display());

  match cli::run(cli, &db, &app_dir) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("Error: {err}");
      ExitCode::FAILURE
    }
  }
}
