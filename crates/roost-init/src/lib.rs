//! # roost-init
//!
//! The container init process of the Roost runtime: the program that
//! becomes PID 1 inside a freshly isolated UTS+PID namespace pair.
//!
//! The lifetime of the daemon is one configuration handshake followed by
//! an unbounded reap loop:
//!
//! 1. The host calls [`launcher::spawn_init`] with one end of a connected
//!    socket pair; the child starts in its own UTS and PID namespaces.
//! 2. The child receives its [`InitConfig`](roost_common::types::InitConfig)
//!    over the socket ([`channel`]), materializes the container record on
//!    disk and assumes its identity ([`bootstrap`]), then writes a single
//!    readiness byte back.
//! 3. From then on it reaps terminated descendants forever
//!    ([`supervisor`]); the only exits are a fatal error or an external
//!    signal.
//!
//! Cleanup of the container record is best-effort, performed by a drop
//! guard ([`guard`]) on every error path the runtime can intercept.

pub mod bootstrap;
pub mod channel;
pub mod daemon;
pub mod guard;
pub mod launcher;
pub mod supervisor;
