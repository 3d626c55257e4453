//! Container bootstrap, executed inside the new namespaces before the
//! readiness acknowledgment is sent.
//!
//! Steps are strictly ordered; a failing step aborts everything after it
//! and the handshake never completes:
//!
//! 1. Restore default dispositions for abort and trap signals.
//! 2. Derive the container identity from the configuration.
//! 3. Register the removal guard, before anything is created.
//! 4. Create the record directory.
//! 5. Resolve the init PID as the host namespace sees it.
//! 6. Write the `pid` and `id` record files.
//! 7. Set the namespace-local hostname.
//! 8. Set the externally visible process title.

use std::fs;
use std::path::Path;

use roost_common::constants::{ID_FILE, PID_FILE};
use roost_common::error::{InitError, Result};
use roost_common::types::{ContainerIdentity, InitConfig};

use crate::guard::RemoveOnExit;

/// State established by a successful bootstrap.
#[derive(Debug)]
pub struct Bootstrapped {
    /// The container's derived identity.
    pub identity: ContainerIdentity,
    /// The init PID as observed from the host namespace.
    pub host_pid: i32,
    /// Removal guard for the record directory; keep it alive until the
    /// process ends.
    pub guard: RemoveOnExit,
}

/// Builds the container's on-disk record and assumes its identity.
///
/// # Errors
///
/// Returns the error of the first failing step; whatever was created
/// before the failure is removed by the guard when the caller's scope
/// unwinds.
pub fn bootstrap(config: &InitConfig) -> Result<Bootstrapped> {
    reset_signal_dispositions()?;

    let identity = ContainerIdentity::derive(config);
    let guard = RemoveOnExit::new(identity.container_path.clone());

    fs::create_dir_all(&identity.container_path).map_err(|e| InitError::Filesystem {
        path: identity.container_path.clone(),
        source: e,
    })?;

    let host_pid = resolve_host_pid()?;
    write_record_file(&identity.container_path, PID_FILE, &host_pid.to_string())?;
    write_record_file(&identity.container_path, ID_FILE, &config.id.to_string())?;

    set_hostname(&identity.container_name)?;
    set_process_title(&identity.container_name)?;

    tracing::info!(
        container = %identity.container_name,
        path = %identity.container_path.display(),
        host_pid,
        "container bootstrapped"
    );
    Ok(Bootstrapped {
        identity,
        host_pid,
        guard,
    })
}

/// Undoes custom abort/trap handlers inherited from the host process
/// image.
fn reset_signal_dispositions() -> Result<()> {
    use nix::sys::signal::{SigHandler, Signal, signal};

    for sig in [Signal::SIGABRT, Signal::SIGTRAP] {
        // SAFETY: restoring the default disposition installs no handler
        // that could violate signal-safety.
        let _ = unsafe { signal(sig, SigHandler::SigDfl) }
            .map_err(|e| InitError::SignalReset { source: e })?;
    }
    tracing::debug!("restored default abort/trap dispositions");
    Ok(())
}

/// Resolves the init PID as seen from the host PID namespace.
///
/// `getpid()` always reports 1 inside the new namespace. No mount
/// namespace was created, so `/proc` is still the host's instance and its
/// `self` magic link names this process by its host-visible PID.
fn resolve_host_pid() -> Result<i32> {
    let target = fs::read_link("/proc/self").map_err(|e| InitError::IdentityResolution {
        message: format!("/proc/self: {e}"),
    })?;
    target
        .to_str()
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|pid| *pid > 0)
        .ok_or_else(|| InitError::IdentityResolution {
            message: format!("unexpected /proc/self target: {}", target.display()),
        })
}

fn write_record_file(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|e| InitError::Filesystem { path, source: e })
}

/// Sets the namespace-local hostname to the container name.
#[cfg(target_os = "linux")]
fn set_hostname(container_name: &str) -> Result<()> {
    nix::unistd::sethostname(container_name).map_err(|e| InitError::Hostname { source: e })?;
    tracing::debug!(hostname = container_name, "hostname set");
    Ok(())
}

/// Stub for non-Linux platforms.
#[cfg(not(target_os = "linux"))]
fn set_hostname(_container_name: &str) -> Result<()> {
    Err(InitError::Hostname {
        source: nix::errno::Errno::ENOSYS,
    })
}

/// Sets the process title to the fixed prefix plus the container name.
///
/// The kernel truncates the title to 15 bytes.
#[cfg(target_os = "linux")]
fn set_process_title(container_name: &str) -> Result<()> {
    use roost_common::constants::PROCESS_TITLE_PREFIX;

    let title = format!("{PROCESS_TITLE_PREFIX}{container_name}");
    let title = std::ffi::CString::new(title).map_err(|e| InitError::ProcessName {
        message: format!("title contains an interior NUL: {e}"),
    })?;
    nix::sys::prctl::set_name(&title).map_err(|e| InitError::ProcessName {
        message: format!("prctl: {e}"),
    })?;
    tracing::debug!("process title set");
    Ok(())
}

/// Stub for non-Linux platforms.
#[cfg(not(target_os = "linux"))]
fn set_process_title(_container_name: &str) -> Result<()> {
    Err(InitError::ProcessName {
        message: "Linux required for process title".into(),
    })
}
