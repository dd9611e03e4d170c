use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::Error;

/// One lock per entity. The derived `Ord` fixes the global acquisition
/// order — trips before drivers before vehicles, then by id — so two
/// operations locking overlapping sets can never wait on each other in a
/// cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    Trip(Uuid),
    Driver(Uuid),
    Vehicle(Uuid),
}

impl LockKey {
    fn entity(&self) -> &'static str {
        match self {
            Self::Trip(_) => "trip",
            Self::Driver(_) => "driver",
            Self::Vehicle(_) => "vehicle",
        }
    }

    fn id(&self) -> Uuid {
        match self {
            Self::Trip(id) | Self::Driver(id) | Self::Vehicle(id) => *id,
        }
    }
}

/// Mutual exclusion around the read-check-write sequences that span a trip
/// and its driver and vehicle. Callers acquire every lock they need up
/// front, re-read state inside the critical section, and only then write.
///
/// Lock entries live for the lifetime of the process; the table is bounded
/// by the number of known entities.
pub struct ResourceGuard {
    timeout: Duration,
    locks: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

/// Holds the acquired locks; dropping it releases the critical section.
#[derive(Debug)]
pub struct LockSet {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl ResourceGuard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquires every requested lock in the global order, each acquisition
    /// bounded by the configured timeout. On timeout the locks taken so far
    /// are released and the caller gets a retriable error.
    #[tracing::instrument(skip(self))]
    pub async fn acquire(&self, mut keys: Vec<LockKey>) -> Result<LockSet, Error> {
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());

        for key in keys {
            let lock = {
                let mut locks = self.locks.lock().await;
                locks.entry(key).or_default().clone()
            };

            let guard = tokio::time::timeout(self.timeout, lock.lock_owned())
                .await
                .map_err(|_| Error::LockTimeout {
                    entity: key.entity(),
                    id: key.id(),
                })?;

            guards.push(guard);
        }

        Ok(LockSet { _guards: guards })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn contended_key_times_out_as_retriable() {
        block_on(async {
            let guard = ResourceGuard::new(Duration::from_millis(20));
            let key = LockKey::Driver(Uuid::new_v4());

            let held = guard.acquire(vec![key]).await.unwrap();

            let err = guard.acquire(vec![key]).await.unwrap_err();
            assert!(matches!(err, Error::LockTimeout { .. }));
            assert!(err.is_retriable());

            drop(held);
            assert!(guard.acquire(vec![key]).await.is_ok());
        });
    }

    #[test]
    fn overlapping_sets_do_not_deadlock() {
        block_on(async {
            let guard = Arc::new(ResourceGuard::new(Duration::from_secs(1)));
            let trip = LockKey::Trip(Uuid::new_v4());
            let driver = LockKey::Driver(Uuid::new_v4());
            let vehicle = LockKey::Vehicle(Uuid::new_v4());

            // keys handed over in opposite orders; acquire() sorts them
            let a = async { guard.acquire(vec![vehicle, driver, trip]).await.map(drop) };
            let b = async { guard.acquire(vec![trip, vehicle, driver]).await.map(drop) };

            let (a, b) = futures::join!(a, b);
            assert!(a.is_ok());
            assert!(b.is_ok());
        });
    }

    #[test]
    fn duplicate_keys_are_collapsed() {
        block_on(async {
            let guard = ResourceGuard::new(Duration::from_millis(50));
            let key = LockKey::Trip(Uuid::new_v4());

            // would self-deadlock if the duplicate were acquired twice
            assert!(guard.acquire(vec![key, key]).await.is_ok());
        });
    }
}
