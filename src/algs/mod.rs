//! Migration-decision algorithms.

pub mod classify;
pub mod pack;
pub mod where_to;
pub mod wire;

pub use classify::{MigrationOptions, MigrationReport, classify_points};
pub use pack::{MigrationPlan, TransferBuffer};
pub use where_to::{plan_migration, where_to};
