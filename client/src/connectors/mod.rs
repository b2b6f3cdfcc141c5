//! Connector abstractions for the external managed backend.
pub mod backend;
