//! End-to-end launch of a real init process in its own UTS and PID
//! namespaces. Requires root (namespace creation); each test skips
//! itself on hosts where that is unavailable.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::print_stderr)]

use std::fs;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{Pid, Uid};

use roost_common::error::InitError;
use roost_common::types::InitConfig;
use roost_init::launcher;

fn spawn_or_skip() -> Option<(UnixStream, Pid)> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    if !Uid::effective().is_root() {
        eprintln!("skipping: namespace creation requires root");
        return None;
    }
    match launcher::spawn_with_channel() {
        Ok(spawned) => Some(spawned),
        Err(InitError::Spawn { source })
            if matches!(source, Errno::EPERM | Errno::EACCES | Errno::ENOSYS) =>
        {
            eprintln!("skipping: cannot create namespaces here: {source}");
            None
        }
        Err(e) => panic!("spawn failed: {e}"),
    }
}

fn send_config(host: &mut UnixStream, config: &InitConfig) {
    let mut payload = serde_json::to_vec(config).expect("serialize configuration");
    payload.push(b'\n');
    host.write_all(&payload).expect("send configuration");
}

#[test]
fn launch_handshake_record_and_kill() {
    let Some((mut host, pid)) = spawn_or_skip() else {
        return;
    };
    let dir = tempfile::tempdir().expect("tempdir");

    send_config(
        &mut host,
        &InitConfig {
            root: dir.path().join("ctrs"),
            name: "web".into(),
            id: 7,
        },
    );
    host.set_read_timeout(Some(Duration::from_secs(10)))
        .expect("set timeout");
    launcher::await_ready(&mut host).expect("init should report ready");

    // The record exists with the expected contents.
    let record = dir.path().join("ctrs").join("web7");
    let pid_text = fs::read_to_string(record.join("pid")).expect("read pid file");
    let recorded: i32 = pid_text.trim().parse().expect("pid file holds decimal text");
    assert!(recorded > 0);
    assert_eq!(
        recorded,
        pid.as_raw(),
        "pid file holds the host-visible pid, not 1"
    );
    assert_eq!(
        fs::read_to_string(record.join("id")).expect("read id file"),
        "7"
    );

    // The child carries the title and lives in its own namespaces.
    let comm = fs::read_to_string(format!("/proc/{}/comm", pid.as_raw())).expect("read comm");
    assert_eq!(comm.trim_end(), "roost: web7");

    let host_uts = fs::read_link("/proc/self/ns/uts").expect("own uts ns");
    let child_uts =
        fs::read_link(format!("/proc/{}/ns/uts", pid.as_raw())).expect("child uts ns");
    assert_ne!(host_uts, child_uts, "init must have its own UTS namespace");

    let status_text =
        fs::read_to_string(format!("/proc/{}/status", pid.as_raw())).expect("read status");
    if let Some(nspid) = status_text.lines().find(|l| l.starts_with("NSpid:")) {
        assert!(
            nspid.trim_end().ends_with("\t1"),
            "init must be pid 1 in its namespace: {nspid}"
        );
    }

    // An uncatchable signal bypasses the exit guard: the host observes an
    // ordinary child death and the record stays behind.
    kill(pid, Signal::SIGKILL).expect("kill init");
    let status = waitpid(pid, None).expect("wait for init");
    assert!(
        matches!(status, WaitStatus::Signaled(p, Signal::SIGKILL, _) if p == pid),
        "unexpected wait status: {status:?}"
    );
    assert!(
        record.exists(),
        "record is not cleaned up on uncatchable termination"
    );
}

#[test]
fn malformed_configuration_exits_nonzero_without_acknowledgment() {
    let Some((mut host, pid)) = spawn_or_skip() else {
        return;
    };

    host.write_all(b"not a configuration\n")
        .expect("send garbage");
    host.set_read_timeout(Some(Duration::from_secs(10)))
        .expect("set timeout");

    let err = launcher::await_ready(&mut host).expect_err("no ack may arrive");
    assert!(matches!(err, InitError::Transport { .. }), "got {err}");

    let status = waitpid(pid, None).expect("wait for init");
    assert!(
        matches!(status, WaitStatus::Exited(p, 1) if p == pid),
        "fatal errors exit with status 1: {status:?}"
    );
}
