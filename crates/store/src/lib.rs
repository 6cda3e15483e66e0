pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryDispenserStore;
pub use postgres::PostgresDispenserStore;
pub use query::OrderQuery;
pub use store::{Admitted, DispenserStore, DispenserStoreExt};
