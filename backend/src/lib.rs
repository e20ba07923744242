//! Music marketplace backend library.
//!
//! - [`domain`]: entities, ports, and the services implementing them
//! - [`inbound`]: actix-web handlers and request plumbing
//! - [`outbound`]: PostgreSQL, in-memory, and security adapters
//! - [`doc`]: the OpenAPI document

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
