use serde::Serialize;
use uuid::Uuid;

use crate::entities::{Driver, Vehicle};

/// A driver/vehicle pair proposed for assignment. Nothing is committed
/// until the pair goes through `assign_trip`, which re-validates
/// availability under the guard.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Proposal {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
}

/// Selection policy over snapshots of the available pools. Implementations
/// must be pure: no state, no side effects, same answer for the same
/// snapshot. Swap this out for distance- or rating-based matching without
/// touching the lifecycle engine.
pub trait AssignmentSelector: Send + Sync {
    fn select(&self, drivers: &[Driver], vehicles: &[Vehicle]) -> Option<Proposal>;
}

/// Baseline policy: the available driver and vehicle with the lowest ids.
/// Observable and easy to test; order of the input slices does not matter.
pub struct LowestIdSelector;

impl AssignmentSelector for LowestIdSelector {
    fn select(&self, drivers: &[Driver], vehicles: &[Vehicle]) -> Option<Proposal> {
        let driver = drivers.iter().filter(|d| d.is_available()).min_by_key(|d| d.id)?;
        let vehicle = vehicles
            .iter()
            .filter(|v| v.is_available())
            .min_by_key(|v| v.id)?;

        Some(Proposal {
            driver_id: driver.id,
            vehicle_id: vehicle.id,
        })
    }
}
