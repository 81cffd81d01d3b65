//! Move sizing.
//!
//! Provides inertia compensation and the conversion from angular deltas to
//! rotation commands.

mod inertia;
mod planner;

pub use inertia::{InertiaTable, INERTIA_TABLE_CAPACITY};
pub use planner::{Direction, MovePlan};
