use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::{Driver, DriverStatus, Trip, TripStatus, Vehicle, VehicleStatus};
use crate::error::Error;

/// Key-addressable persistence for the three record types.
///
/// The engine only assumes per-record atomic upserts plus
/// [`commit_assignment`](EntityStore::commit_assignment) for the transitions
/// that touch all three records; serializing read-check-write sequences is
/// the guard's job, not the store's. Listings are returned in ascending id
/// order so that selection over them is deterministic.
#[async_trait]
pub trait EntityStore: Send + Sync + 'static {
    async fn trip(&self, id: Uuid) -> Result<Option<Trip>, Error>;
    async fn trips(&self) -> Result<Vec<Trip>, Error>;
    async fn trips_by_status(&self, status: TripStatus) -> Result<Vec<Trip>, Error>;
    async fn trips_by_driver(&self, driver_id: Uuid) -> Result<Vec<Trip>, Error>;
    async fn save_trip(&self, trip: &Trip) -> Result<(), Error>;
    async fn delete_trip(&self, id: Uuid) -> Result<(), Error>;

    async fn driver(&self, id: Uuid) -> Result<Option<Driver>, Error>;
    async fn drivers(&self) -> Result<Vec<Driver>, Error>;
    async fn drivers_by_status(&self, status: DriverStatus) -> Result<Vec<Driver>, Error>;
    async fn save_driver(&self, driver: &Driver) -> Result<(), Error>;
    async fn delete_driver(&self, id: Uuid) -> Result<(), Error>;

    async fn vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, Error>;
    async fn vehicles(&self) -> Result<Vec<Vehicle>, Error>;
    async fn vehicles_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, Error>;
    async fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), Error>;
    async fn delete_vehicle(&self, id: Uuid) -> Result<(), Error>;

    /// Persists a trip and its paired driver and vehicle as a single unit:
    /// either all three records land or none do.
    async fn commit_assignment(
        &self,
        trip: &Trip,
        driver: &Driver,
        vehicle: &Vehicle,
    ) -> Result<(), Error>;
}

#[derive(Default)]
struct Records {
    trips: HashMap<Uuid, Trip>,
    drivers: HashMap<Uuid, Driver>,
    vehicles: HashMap<Uuid, Vehicle>,
}

/// In-process store. One `RwLock` over all three maps makes every write,
/// including the three-record commit, atomic with respect to readers.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_id<T>(mut items: Vec<T>, id: impl Fn(&T) -> Uuid) -> Vec<T> {
    items.sort_by_key(id);
    items
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn trip(&self, id: Uuid) -> Result<Option<Trip>, Error> {
        Ok(self.records.read().await.trips.get(&id).cloned())
    }

    async fn trips(&self) -> Result<Vec<Trip>, Error> {
        let records = self.records.read().await;
        Ok(sorted_by_id(
            records.trips.values().cloned().collect(),
            |t: &Trip| t.id,
        ))
    }

    async fn trips_by_status(&self, status: TripStatus) -> Result<Vec<Trip>, Error> {
        let records = self.records.read().await;
        let trips = records
            .trips
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        Ok(sorted_by_id(trips, |t: &Trip| t.id))
    }

    async fn trips_by_driver(&self, driver_id: Uuid) -> Result<Vec<Trip>, Error> {
        let records = self.records.read().await;
        let trips = records
            .trips
            .values()
            .filter(|t| t.driver_id == Some(driver_id))
            .cloned()
            .collect();
        Ok(sorted_by_id(trips, |t: &Trip| t.id))
    }

    async fn save_trip(&self, trip: &Trip) -> Result<(), Error> {
        self.records
            .write()
            .await
            .trips
            .insert(trip.id, trip.clone());
        Ok(())
    }

    async fn delete_trip(&self, id: Uuid) -> Result<(), Error> {
        self.records.write().await.trips.remove(&id);
        Ok(())
    }

    async fn driver(&self, id: Uuid) -> Result<Option<Driver>, Error> {
        Ok(self.records.read().await.drivers.get(&id).cloned())
    }

    async fn drivers(&self) -> Result<Vec<Driver>, Error> {
        let records = self.records.read().await;
        Ok(sorted_by_id(
            records.drivers.values().cloned().collect(),
            |d: &Driver| d.id,
        ))
    }

    async fn drivers_by_status(&self, status: DriverStatus) -> Result<Vec<Driver>, Error> {
        let records = self.records.read().await;
        let drivers = records
            .drivers
            .values()
            .filter(|d| d.status == status)
            .cloned()
            .collect();
        Ok(sorted_by_id(drivers, |d: &Driver| d.id))
    }

    async fn save_driver(&self, driver: &Driver) -> Result<(), Error> {
        self.records
            .write()
            .await
            .drivers
            .insert(driver.id, driver.clone());
        Ok(())
    }

    async fn delete_driver(&self, id: Uuid) -> Result<(), Error> {
        self.records.write().await.drivers.remove(&id);
        Ok(())
    }

    async fn vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, Error> {
        Ok(self.records.read().await.vehicles.get(&id).cloned())
    }

    async fn vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        let records = self.records.read().await;
        Ok(sorted_by_id(
            records.vehicles.values().cloned().collect(),
            |v: &Vehicle| v.id,
        ))
    }

    async fn vehicles_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, Error> {
        let records = self.records.read().await;
        let vehicles = records
            .vehicles
            .values()
            .filter(|v| v.status == status)
            .cloned()
            .collect();
        Ok(sorted_by_id(vehicles, |v: &Vehicle| v.id))
    }

    async fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), Error> {
        self.records
            .write()
            .await
            .vehicles
            .insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn delete_vehicle(&self, id: Uuid) -> Result<(), Error> {
        self.records.write().await.vehicles.remove(&id);
        Ok(())
    }

    async fn commit_assignment(
        &self,
        trip: &Trip,
        driver: &Driver,
        vehicle: &Vehicle,
    ) -> Result<(), Error> {
        let mut records = self.records.write().await;
        records.trips.insert(trip.id, trip.clone());
        records.drivers.insert(driver.id, driver.clone());
        records.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(())
    }
}
