//! FILENAME: table-engine/src/lib.rs
//! PURPOSE: Main library entry point for the table-value engine.
//! CONTEXT: Re-exports the table abstraction and its pure transformations
//! (group-aggregate, pivot, melt, concat, join) for use by other crates.

pub mod aggregate;
pub mod combine;
pub mod reshape;
pub mod table;
pub mod value;

// Re-export commonly used types at the crate root
pub use aggregate::{group_by, AggFn, AggSpec};
pub use combine::{concat, join, JoinKind};
pub use reshape::{melt, pivot};
pub use table::{Table, TableError};
pub use value::{compare_values, OrderedFloat, Value};
