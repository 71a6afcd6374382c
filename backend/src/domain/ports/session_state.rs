//! Capabilities handed to the directory flow by its caller.
//!
//! The flow never reads ambient session state: the caller passes whatever
//! knows who is signed in, and whatever can ask the staff member to confirm a
//! destructive action.

use crate::domain::StaffIdentity;

/// Read-only view of the current authentication state.
pub trait SessionState {
    /// The signed-in staff member, if any.
    fn current_user(&self) -> Option<StaffIdentity>;

    /// Whether session state is still being resolved.
    fn is_resolving(&self) -> bool {
        false
    }
}

impl SessionState for Option<StaffIdentity> {
    fn current_user(&self) -> Option<StaffIdentity> {
        self.clone()
    }
}

/// Blocking yes/no prompt shown before a registration is deleted.
pub trait DeleteConfirmation {
    /// Return `true` to proceed with the deletion described by `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

impl DeleteConfirmation for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}
