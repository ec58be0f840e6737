//! # hermes-hierarchy
//!
//! Build aligned series hierarchies from long-format sales. [`aggregate`]
//! turns a [`hermes_io::SalesTable`] and a [`HierarchySpec`] into a
//! [`Hierarchy`]: an aligned panel in canonical order (grand total first,
//! then each level top to bottom, lexicographic within a level), the 0/1
//! summing matrix S mapping bottom series to every row, and level tags
//! naming each row range.
//!
//! ```text
//!                  total            <- synthetic root
//!              CA        TX         <- state_id
//!          CA_1  CA_2   TX_1       <- state_id/store_id (bottom)
//! ```
//!
//! [`is_strictly_nested`] decides whether the levels form a proper tree,
//! which downstream reconciliation uses to rule out top-down methods on
//! grouped (crossed) structures.

mod aggregate;
mod error;
mod nested;
mod spec;
mod summing;
mod tags;

pub use aggregate::{aggregate, Hierarchy};
pub use error::HierarchyError;
pub use nested::is_strictly_nested;
pub use spec::HierarchySpec;
pub use summing::SummingMatrix;
pub use tags::{LevelTag, LevelTags};
