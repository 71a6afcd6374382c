//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **supabase**: PostgREST table access and GoTrue password sign-in over
//!   `reqwest`
//! - **memory**: process-local store used when no Supabase project is
//!   configured and by integration tests
//!
//! Adapters translate between domain types and wire representations. They
//! contain no business logic.

pub mod memory;
pub mod supabase;
