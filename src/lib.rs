pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod schema;
pub mod shape;
pub mod store;
pub mod utils;

pub use error::{StoreError, StoreResult, ValidationError, ValidationResult};
pub use shape::{insert_columns, validate_insert, Entity};
