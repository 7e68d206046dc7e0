//! Application layer
//!
//! Wires the domain services behind the capability traits the transport
//! depends on.

pub mod services;

pub use services::{ServiceDependencies, Services};
