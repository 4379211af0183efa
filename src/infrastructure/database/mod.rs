pub mod connection;
pub mod sqlite_outbox;

pub use connection::ConnectionPool;
pub use sqlite_outbox::SqliteOutboxStore;
