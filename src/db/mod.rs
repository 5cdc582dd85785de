mod connection;
mod helpers;
mod migrations;
pub mod models;
mod repositories;
mod store;

pub use connection::Database;
pub use models::{FieldKind, FieldRecord, NewFieldRecord};
pub use store::ValueStore;
