//! Application layer for Taskflow, consumed by presentation code.
//!
//! Persistence, authentication, and row-level authorization live in an
//! external managed backend; this crate holds the in-memory task list
//! controller, the profile service, session boundaries, and the connector
//! traits (plus a REST implementation) that reach that backend.

pub mod config;
pub mod connectors;
pub mod notify;
pub mod profile;
pub mod session;
pub mod tasks;
pub mod theme;
