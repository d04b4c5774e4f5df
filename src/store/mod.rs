mod migrations;
mod sqlite;

pub use sqlite::SqliteStore;
