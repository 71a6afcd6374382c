//! Church parking registration backend.
//!
//! Visitors register a vehicle through a public endpoint; authenticated staff
//! ("obreiros") list, search, filter, inspect and delete registrations.
//! Persistence and authentication live in an external hosted service reached
//! through the ports in [`domain::ports`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
