//! SQLite backend for the variant engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
