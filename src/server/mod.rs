//! Server module for building the invoice HTTP server
//!
//! [`ServerBuilder`] wires a repository into the REST exposure, which
//! mounts the invoice routes under the API prefix and the health checks
//! at the root.

pub mod builder;
pub mod exposure;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
