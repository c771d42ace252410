//! Filmkritiken backend: collaborative film reviews and ratings.
//!
//! The crate follows a hexagonal layout. [`domain`] owns the review model,
//! its ports and the service. [`inbound`] adapts HTTP to the driving ports and
//! [`outbound`] implements the storage ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
