use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::Error;

/// Runtime configuration, read once at startup from the environment
/// (`.env` friendly). Every knob has a default so a bare process runs.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Upper bound on acquiring any single entity lock.
    pub lock_timeout: Duration,
    /// Whether cancelling an ASSIGNED/IN_PROGRESS trip returns its driver
    /// and vehicle to AVAILABLE. Defaults to true; see DESIGN.md.
    pub release_on_cancel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            lock_timeout: Duration::from_millis(5000),
            release_on_cancel: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::validation(format!("BIND_ADDR is not an address: {raw}")))?,
            Err(_) => defaults.bind_addr,
        };

        let lock_timeout = match env::var("LOCK_TIMEOUT_MS") {
            Ok(raw) => {
                let millis: u64 = raw.parse().map_err(|_| {
                    Error::validation(format!("LOCK_TIMEOUT_MS is not a number: {raw}"))
                })?;
                Duration::from_millis(millis)
            }
            Err(_) => defaults.lock_timeout,
        };

        let release_on_cancel = match env::var("RELEASE_ON_CANCEL") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::validation(format!("RELEASE_ON_CANCEL is not a bool: {raw}"))
            })?,
            Err(_) => defaults.release_on_cancel,
        };

        Ok(Self {
            bind_addr,
            lock_timeout,
            release_on_cancel,
        })
    }
}
