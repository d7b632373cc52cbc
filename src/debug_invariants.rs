//! Invariant checks shared by the incidence structure and transfer buffers.

use crate::mesh_error::MeshMigrationError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshMigrationError>;

    /// Panic on a broken invariant in debug builds or when invariant checking
    /// is enabled; a no-op otherwise.
    fn debug_assert_invariants(&self) {
        #[cfg(any(
            debug_assertions,
            feature = "strict-invariants",
            feature = "check-invariants"
        ))]
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] {}: {e}", std::any::type_name::<Self>());
        }
    }
}
