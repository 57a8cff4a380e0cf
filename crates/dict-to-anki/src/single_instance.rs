//! Single-instance guard.
//!
//! Binds a fixed localhost port for the process lifetime; the bind fails
//! while another instance holds it and the OS releases it on exit, however
//! the process dies. Settings and cache writes rely on this at-most-one-
//! writer invariant instead of cross-process file locking.

use crate::{AppError, AppResult};

use std::{
    net::{Ipv4Addr, TcpListener},
    panic::Location,
};

use error_location::ErrorLocation;
use tracing::debug;

/// Loopback port reserved as the instance lock.
const GUARD_PORT: u16 = 48653;

/// Holds the instance lock; dropping it releases the lock.
#[derive(Debug)]
pub struct SingleInstance {
    _listener: TcpListener,
}

impl SingleInstance {
    /// Acquire the lock, failing when another instance already runs.
    #[track_caller]
    pub fn acquire() -> AppResult<Self> {
        match TcpListener::bind((Ipv4Addr::LOCALHOST, GUARD_PORT)) {
            Ok(listener) => {
                debug!(port = GUARD_PORT, "Single-instance guard acquired");
                Ok(Self {
                    _listener: listener,
                })
            }
            Err(e) => Err(AppError::AlreadyRunning {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
