//! Outbound adapters implementing the domain storage ports.
//!
//! Adapters translate between domain types and their stored representation
//! and contain no business logic.
//!
//! - **memory**: process-local document and blob stores
//! - **persistence**: PostgreSQL tables via Diesel

pub mod memory;
pub mod persistence;

use uuid::Uuid;

/// Storage-assigned identifier: a v4 UUID without hyphens.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
