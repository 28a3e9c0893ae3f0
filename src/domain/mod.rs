pub mod aggregate;
pub mod categories;
pub mod draft;
pub mod filter;
pub mod validation;
