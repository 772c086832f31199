pub mod sqlite;

pub use sqlite::{Database, quote_identifier};
