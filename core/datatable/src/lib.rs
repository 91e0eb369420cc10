//! FILENAME: core/datatable/src/lib.rs
//! PURPOSE: Shared in-memory data types for the aggregation workspace.
//! CONTEXT: Re-exports `Value`, `Column`, and `Table` for the engine crate.

pub mod table;
pub mod value;

pub use table::{Column, Table, TableError};
pub use value::Value;
