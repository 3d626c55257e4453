//! The init daemon's whole lifetime: handshake, bootstrap, readiness,
//! supervision.

use std::convert::Infallible;
use std::os::fd::OwnedFd;
use std::os::unix::net::UnixStream;

use roost_common::error::Result;
use roost_common::types::InitPhase;

use crate::{bootstrap, channel, supervisor};

/// Entry point executed as the first code of the cloned init process.
///
/// This is the top-level handler for every fatal error: it logs and
/// yields exit status 1. On success it never returns; supervision is the
/// rest of the process's life.
pub fn init_main(socket: OwnedFd) -> isize {
    match run(socket) {
        Ok(never) => match never {},
        Err(e) => {
            tracing::error!(error = %e, "init daemon failed");
            1
        }
    }
}

/// Runs the daemon lifecycle on the given control socket.
///
/// The removal guard established during bootstrap lives in this scope, so
/// an error from any later stage removes the container record on the way
/// out. The socket is never read again after the handshake.
///
/// # Errors
///
/// Returns the first fatal error of any stage; if bootstrap did not
/// complete, no readiness byte has been sent.
pub fn run(socket: OwnedFd) -> Result<Infallible> {
    let mut stream = UnixStream::from(socket);

    tracing::debug!(phase = %InitPhase::Handshake, "awaiting configuration");
    let config = channel::recv_config(&mut stream)?;
    let booted = bootstrap::bootstrap(&config)?;
    channel::send_ready(&mut stream)?;
    tracing::info!(
        phase = %InitPhase::Ready,
        container = %booted.identity.container_name,
        host_pid = booted.host_pid,
        "container ready"
    );

    supervisor::supervise(&booted.identity, booted.host_pid)
}
