//! System-wide constants of the init subsystem.

use std::time::Duration;

/// Default base directory for container records on Linux with root access.
pub const DEFAULT_CONTAINER_ROOT: &str = "/var/lib/roost/containers";

/// Size of the fixed receive buffer for the configuration handshake.
///
/// The wire contract has no length framing: the serialized configuration
/// plus its one-byte trailer must fit in this window. Larger payloads are
/// truncated and fail to parse.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Stack size for the cloned init process's initial execution context.
///
/// The buffer is handed to the kernel for the init's whole lifetime and is
/// never reclaimed. Sized for the bootstrap call depth, JSON decoding and
/// tracing formatting included.
pub const INIT_STACK_SIZE: usize = 256 * 1024;

/// Interval between liveness log lines in the supervisor loop.
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(7);

/// Prefix of the externally visible process title. The kernel truncates
/// the full title to 15 bytes.
pub const PROCESS_TITLE_PREFIX: &str = "roost: ";

/// The single byte written back on the control socket once bootstrap
/// succeeds. The value carries no meaning; the host waits for any byte.
pub const READY_BYTE: u8 = 0;

/// Name of the record file holding the host-visible PID in decimal text.
pub const PID_FILE: &str = "pid";

/// Name of the record file echoing the container id in decimal text.
pub const ID_FILE: &str = "id";
