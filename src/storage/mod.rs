// Storage module: the local catalog cache.

pub mod sqlite;

pub use sqlite::SqliteStorage;
