//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local store used without a database and in tests
//! - **security**: JWT issuing and Argon2 password verification
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
