pub mod audit;
pub mod cli;
pub mod commands;
pub mod db;
pub mod domain;
pub mod error;
pub mod models;
pub mod report;
pub mod settings;
pub mod store;
