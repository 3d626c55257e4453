//! # roost-common
//!
//! Shared error definitions, domain types, and constants for the Roost
//! container runtime.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the foundational primitives that the init
//! subsystem builds upon.

pub mod constants;
pub mod error;
pub mod types;
