//! Domain types of the init subsystem: the wire configuration, the
//! identity derived from it, and the daemon lifecycle phase.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{InitError, Result};

/// Configuration received once over the control channel at container launch.
///
/// Field names on the wire are `Root`, `Name`, and `Id`; unknown fields are
/// ignored so the host side may grow its message without breaking older
/// init binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitConfig {
    /// Directory under which all containers are placed.
    pub root: PathBuf,
    /// Logical container name.
    pub name: String,
    /// Container identifier, unique among live containers sharing `root`.
    pub id: u32,
}

impl InitConfig {
    /// Checks the field constraints that decoding alone cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` or `name` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(InitError::ConfigInvalid {
                message: "container root must not be empty".into(),
            });
        }
        if self.name.is_empty() {
            return Err(InitError::ConfigInvalid {
                message: "container name must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// The container's derived on-disk and namespace identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerIdentity {
    /// `name` and `id` concatenated without a separator, e.g. `web7`.
    ///
    /// Also used as the namespace-local hostname.
    pub container_name: String,
    /// `root/container_name`, the container's record directory.
    pub container_path: PathBuf,
}

impl ContainerIdentity {
    /// Derives the identity from a validated configuration.
    ///
    /// Embedding `id` in the path is the sole collision-avoidance
    /// guarantee; `name` is not checked for path-unsafe characters.
    #[must_use]
    pub fn derive(config: &InitConfig) -> Self {
        let container_name = format!("{}{}", config.name, config.id);
        let container_path = config.root.join(&container_name);
        Self {
            container_name,
            container_path,
        }
    }
}

/// Lifecycle phase of the init daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    /// Configuration handshake in progress; no acknowledgment sent yet.
    Handshake,
    /// Acknowledgment sent; the container is a declared, running PID 1.
    Ready,
    /// Reaping terminated descendants for the rest of the process lifetime.
    Supervising,
}

impl fmt::Display for InitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handshake => write!(f, "handshake"),
            Self::Ready => write!(f, "ready"),
            Self::Supervising => write!(f, "supervising"),
        }
    }
}
