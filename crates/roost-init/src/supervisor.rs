//! PID 1 duties: the unbounded reap loop that is the rest of the
//! process's lifetime.

use std::convert::Infallible;
use std::thread;

use nix::sys::wait::{WaitStatus, waitpid};

use roost_common::constants::LIVENESS_INTERVAL;
use roost_common::error::{InitError, Result};
use roost_common::types::{ContainerIdentity, InitPhase};

/// Runs the supervisor loop forever.
///
/// Each turn sleeps the liveness interval, emits a liveness event, then
/// blocks until some descendant terminates and reaps it. The loop never
/// exits on a successful reap.
///
/// # Errors
///
/// Returns a reap error when the wait call fails, `ECHILD` included. The
/// error unwinds through the scope holding the removal guard.
pub fn supervise(identity: &ContainerIdentity, host_pid: i32) -> Result<Infallible> {
    tracing::info!(
        phase = %InitPhase::Supervising,
        container = %identity.container_name,
        host_pid,
        "assuming pid 1 duties"
    );

    loop {
        thread::sleep(LIVENESS_INTERVAL);
        tracing::info!(
            container = %identity.container_name,
            host_pid,
            "init daemon alive"
        );

        let status = reap_next()?;
        tracing::info!(?status, "reaped child");
    }
}

/// Blocks until any descendant terminates and reaps it.
fn reap_next() -> Result<WaitStatus> {
    waitpid(None, None).map_err(|e| InitError::Reap { source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    // One test covers both outcomes: interleaving them across parallel
    // tests would let one waitpid(-1) steal the other's child.
    #[test]
    fn reap_next_reaps_children_and_fails_without_any() {
        let err = reap_next().expect_err("no children yet");
        assert!(matches!(err, InitError::Reap { .. }), "got {err}");

        let child = Command::new("true").spawn().expect("spawn child");
        let reaped = reap_next().expect("child should be reaped");
        match reaped {
            WaitStatus::Exited(pid, code) => {
                assert_eq!(pid.as_raw(), i32::try_from(child.id()).expect("pid fits"));
                assert_eq!(code, 0);
            }
            other => panic!("unexpected wait status: {other:?}"),
        }

        let err = reap_next().expect_err("all children reaped");
        assert!(matches!(err, InitError::Reap { .. }), "got {err}");
    }
}
