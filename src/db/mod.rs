pub mod connection;
pub mod schema;

pub use connection::connect_to_database;
pub use schema::ensure_schema;
