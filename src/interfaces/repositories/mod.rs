pub mod postgrest;
pub mod sqlx_store;
pub mod store;

pub use postgrest::PostgrestStore;
pub use sqlx_store::SqlxStore;
pub use store::{ContentStore, Record, SelectQuery, SharedStore, Table};
