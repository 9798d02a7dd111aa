//! services/client/src/adapters/mod.rs
//!
//! Contains the concrete "adapter" implementations of the service ports
//! defined in the `core` crate.

pub mod http_api;
pub mod terminal;
pub mod visitor_file;
