//! Error taxonomy for the init subsystem.
//!
//! Every variant is fatal: the daemon propagates it to one top-level
//! handler that logs and terminates with a non-zero status. Nothing is
//! retried. The single non-fatal failure in the subsystem, removal of the
//! container directory on exit, is logged and swallowed at the drop site
//! and therefore has no variant here.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of the container init daemon.
#[derive(Debug, Error)]
pub enum InitError {
    /// Creating the isolated init process failed; no child exists.
    #[error("failed to spawn init process: {source}")]
    Spawn {
        /// OS error returned by the clone call.
        source: nix::errno::Errno,
    },

    /// A read or write on the control socket failed.
    #[error("control channel {op} failed: {source}")]
    Transport {
        /// Which half of the handshake failed.
        op: &'static str,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// The configuration payload did not decode as JSON.
    #[error("malformed configuration payload: {source}")]
    ConfigParse {
        /// Underlying decode error.
        #[from]
        source: serde_json::Error,
    },

    /// The configuration decoded but violates a field constraint.
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of the violated constraint.
        message: String,
    },

    /// Restoring a default signal disposition failed.
    #[error("failed to reset signal disposition: {source}")]
    SignalReset {
        /// OS error returned by the sigaction call.
        source: nix::errno::Errno,
    },

    /// A directory or file of the container record could not be created.
    #[error("filesystem operation failed at {path}: {source}")]
    Filesystem {
        /// Path where the operation failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The host-visible PID of the init process could not be resolved.
    #[error("cannot resolve host-visible pid: {message}")]
    IdentityResolution {
        /// Description of the failed resolution.
        message: String,
    },

    /// Setting the namespace-local hostname failed.
    #[error("failed to set container hostname: {source}")]
    Hostname {
        /// OS error returned by sethostname.
        source: nix::errno::Errno,
    },

    /// Setting the externally visible process title failed.
    #[error("failed to set process title: {message}")]
    ProcessName {
        /// Description of the failure.
        message: String,
    },

    /// Waiting for a terminated child failed during supervision.
    #[error("failed to reap children: {source}")]
    Reap {
        /// OS error returned by the wait call.
        source: nix::errno::Errno,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, InitError>;
