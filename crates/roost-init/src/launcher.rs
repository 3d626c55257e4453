//! Spawning the isolated init process from the host side.
//!
//! The launcher owns the only namespace-creating call in the runtime: a
//! `clone(2)` requesting a fresh UTS namespace (hostname changes stay
//! local) and a fresh PID namespace (the child is PID 1 there), with
//! `SIGCHLD` as the exit signal so the host observes termination as an
//! ordinary child exit.

use std::os::fd::OwnedFd;
use std::os::unix::net::UnixStream;

use nix::unistd::Pid;

use roost_common::error::{InitError, Result};

/// Spawns the container init process on the given control socket.
///
/// The caller keeps the host end of the socket pair; the passed end
/// becomes the child's control channel (the parent's copy is closed when
/// this call returns). The child immediately runs the daemon entry point
/// and begins the configuration handshake.
///
/// The initial execution stack is allocated here and never reclaimed: the
/// init process uses it for its entire lifetime, and the launcher cannot
/// know when that ends.
///
/// # Errors
///
/// Returns a spawn error wrapping the OS error if namespace or process
/// creation fails; no partial state is created.
#[cfg(target_os = "linux")]
pub fn spawn_init(socket: OwnedFd) -> Result<Pid> {
    use nix::sched::{CloneFlags, clone};
    use nix::sys::signal::Signal;

    use roost_common::constants::INIT_STACK_SIZE;

    use crate::daemon;

    let stack: &'static mut [u8] = Box::leak(vec![0u8; INIT_STACK_SIZE].into_boxed_slice());

    let mut socket = Some(socket);
    let cb = Box::new(move || {
        let Some(socket) = socket.take() else {
            return 1;
        };
        daemon::init_main(socket)
    });

    let flags = CloneFlags::CLONE_NEWUTS | CloneFlags::CLONE_NEWPID;
    // SAFETY: the child gets its own copy of the address space (no
    // CLONE_VM) and runs on a stack that stays allocated for its whole
    // lifetime.
    let pid = unsafe { clone(cb, stack, flags, Some(Signal::SIGCHLD as i32)) }
        .map_err(|e| InitError::Spawn { source: e })?;

    tracing::info!(pid = pid.as_raw(), "spawned container init");
    Ok(pid)
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always fails — namespace creation requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn spawn_init(_socket: OwnedFd) -> Result<Pid> {
    Err(InitError::Spawn {
        source: nix::errno::Errno::ENOSYS,
    })
}

/// Creates the control socket pair and spawns the init process on one end.
///
/// Returns the host end of the channel and the child's PID. The host is
/// expected to send the configuration message next and then block in
/// [`await_ready`].
///
/// # Errors
///
/// Returns a spawn error if socket pair or process creation fails.
#[cfg(target_os = "linux")]
pub fn spawn_with_channel() -> Result<(UnixStream, Pid)> {
    use nix::sys::socket::{AddressFamily, SockFlag, SockType, socketpair};

    let (host_end, init_end) = socketpair(
        AddressFamily::Unix,
        SockType::Stream,
        None,
        SockFlag::SOCK_CLOEXEC,
    )
    .map_err(|e| InitError::Spawn { source: e })?;

    let pid = spawn_init(init_end)?;
    Ok((UnixStream::from(host_end), pid))
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always fails — namespace creation requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn spawn_with_channel() -> Result<(UnixStream, Pid)> {
    Err(InitError::Spawn {
        source: nix::errno::Errno::ENOSYS,
    })
}

/// Blocks until the init process acknowledges readiness with its single
/// byte. Host-side half of the handshake.
///
/// # Errors
///
/// Returns a transport error if the channel closes or fails before the
/// byte arrives, which is how a daemon that died mid-bootstrap shows up
/// to the host.
pub fn await_ready(stream: &mut UnixStream) -> Result<()> {
    use std::io::Read;

    let mut byte = [0u8; 1];
    stream
        .read_exact(&mut byte)
        .map_err(|e| InitError::Transport {
            op: "readiness read",
            source: e,
        })?;
    tracing::debug!("init process reported ready");
    Ok(())
}
