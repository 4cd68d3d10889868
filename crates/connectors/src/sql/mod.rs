pub mod mysql;
pub mod sqlite;
