//! The one-shot configuration handshake over the control socket.
//!
//! The wire contract is deliberately narrow: the host sends the JSON
//! configuration terminated by a single delimiter byte, sized to fit the
//! fixed receive window; the daemon answers with a single readiness byte
//! once bootstrap has succeeded. Neither side sends anything else, and the
//! daemon never reads the socket again.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;

use roost_common::constants::{READY_BYTE, RECV_BUFFER_SIZE};
use roost_common::error::{InitError, Result};
use roost_common::types::InitConfig;

/// Performs the single blocking read of the handshake and decodes the
/// configuration.
///
/// Exactly one trailing delimiter byte is dropped before decoding; the
/// host's JSON encoder terminates its message with a newline.
///
/// # Errors
///
/// Returns a transport error if the read fails or the peer closed the
/// socket without sending anything, and a parse error if the payload is
/// malformed, truncated by the receive window, or violates a field
/// constraint.
pub fn recv_config(stream: &mut UnixStream) -> Result<InitConfig> {
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let n = stream.read(&mut buf).map_err(|e| InitError::Transport {
        op: "configuration read",
        source: e,
    })?;
    if n == 0 {
        return Err(InitError::Transport {
            op: "configuration read",
            source: io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "control channel closed before configuration",
            ),
        });
    }

    let payload = &buf[..n - 1];
    let config: InitConfig = serde_json::from_slice(payload)?;
    config.validate()?;
    tracing::debug!(
        root = %config.root.display(),
        name = %config.name,
        id = config.id,
        "received container configuration"
    );
    Ok(config)
}

/// Writes the single readiness byte that completes the handshake.
///
/// # Errors
///
/// Returns a transport error if the write fails.
pub fn send_ready(stream: &mut UnixStream) -> Result<()> {
    stream
        .write_all(&[READY_BYTE])
        .map_err(|e| InitError::Transport {
            op: "readiness write",
            source: e,
        })?;
    tracing::debug!("acknowledged readiness to host");
    Ok(())
}
