use async_trait::async_trait;
use uuid::Uuid;

use super::helpers::{fetch_driver, fetch_trip, fetch_vehicle};
use super::Engine;

use crate::api::{NewTrip, TripAPI};
use crate::entities::{DriverStatus, Trip, VehicleStatus};
use crate::error::Error;
use crate::guard::LockKey;
use crate::selector::Proposal;
use crate::store::EntityStore;

#[async_trait]
impl<S: EntityStore> TripAPI for Engine<S> {
    #[tracing::instrument(skip(self))]
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, Error> {
        let pickup = new_trip
            .pickup_location
            .ok_or_else(|| Error::validation("pickup_location is required"))?;
        let dropoff = new_trip
            .dropoff_location
            .ok_or_else(|| Error::validation("dropoff_location is required"))?;

        if let Some(fare) = new_trip.fare {
            if fare < 0.0 {
                return Err(Error::validation(format!("fare must be non-negative, got {fare}")));
            }
        }

        let trip = Trip::new(
            new_trip.passenger_id,
            pickup,
            dropoff,
            new_trip.fare,
            new_trip.notes,
        );

        self.store.save_trip(&trip).await?;

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn find_trip(&self, id: Uuid) -> Result<Trip, Error> {
        fetch_trip(&self.store, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_trips(&self) -> Result<Vec<Trip>, Error> {
        self.store.trips().await
    }

    #[tracing::instrument(skip(self))]
    async fn list_trips_by_driver(&self, driver_id: Uuid) -> Result<Vec<Trip>, Error> {
        self.store.trips_by_driver(driver_id).await
    }

    /// The commit section: everything between lock acquisition and the
    /// store commit re-validates against current state, and no write
    /// happens until all three records have passed their checks.
    #[tracing::instrument(skip(self))]
    async fn assign_trip(
        &self,
        id: Uuid,
        driver_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<Trip, Error> {
        let _locks = self
            .guard
            .acquire(vec![
                LockKey::Trip(id),
                LockKey::Driver(driver_id),
                LockKey::Vehicle(vehicle_id),
            ])
            .await?;

        let mut trip = fetch_trip(&self.store, id).await?;
        let mut driver = fetch_driver(&self.store, driver_id).await?;
        let mut vehicle = fetch_vehicle(&self.store, vehicle_id).await?;

        if !trip.is_requested() {
            return Err(Error::Conflict {
                entity: "trip",
                id,
                status: trip.status.name().into(),
            });
        }

        driver.engage(vehicle.id)?;
        vehicle.engage(driver.id)?;
        trip.assign(driver.id, vehicle.id)?;

        self.store
            .commit_assignment(&trip, &driver, &vehicle)
            .await?;

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn propose_assignment(&self) -> Result<Option<Proposal>, Error> {
        let drivers = self.store.drivers_by_status(DriverStatus::Available).await?;
        let vehicles = self
            .store
            .vehicles_by_status(VehicleStatus::Available)
            .await?;

        Ok(self.selector.select(&drivers, &vehicles))
    }

    #[tracing::instrument(skip(self))]
    async fn start_trip(&self, id: Uuid) -> Result<Trip, Error> {
        let _locks = self.guard.acquire(vec![LockKey::Trip(id)]).await?;

        let mut trip = fetch_trip(&self.store, id).await?;
        trip.start()?;
        self.store.save_trip(&trip).await?;

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn complete_trip(&self, id: Uuid) -> Result<Trip, Error> {
        let snapshot = fetch_trip(&self.store, id).await?;

        let (driver_id, vehicle_id) = match (snapshot.driver_id, snapshot.vehicle_id) {
            (Some(d), Some(v)) => (d, v),
            // no pairing means the trip never got past REQUESTED
            _ => {
                let _locks = self.guard.acquire(vec![LockKey::Trip(id)]).await?;
                let mut trip = fetch_trip(&self.store, id).await?;
                trip.complete()?;
                self.store.save_trip(&trip).await?;
                return Ok(trip);
            }
        };

        let _locks = self
            .guard
            .acquire(vec![
                LockKey::Trip(id),
                LockKey::Driver(driver_id),
                LockKey::Vehicle(vehicle_id),
            ])
            .await?;

        let mut trip = fetch_trip(&self.store, id).await?;

        // a concurrent assign may have paired the trip between the snapshot
        // and the lock; the held locks would then be the wrong ones
        if trip.driver_id != Some(driver_id) || trip.vehicle_id != Some(vehicle_id) {
            return Err(Error::Conflict {
                entity: "trip",
                id,
                status: trip.status.name().into(),
            });
        }

        let mut driver = fetch_driver(&self.store, driver_id).await?;
        let mut vehicle = fetch_vehicle(&self.store, vehicle_id).await?;

        trip.complete()?;
        driver.release();
        vehicle.release();

        self.store
            .commit_assignment(&trip, &driver, &vehicle)
            .await?;

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_trip(&self, id: Uuid) -> Result<Trip, Error> {
        let snapshot = fetch_trip(&self.store, id).await?;

        let release = match (snapshot.driver_id, snapshot.vehicle_id) {
            (Some(d), Some(v)) if self.release_on_cancel => Some((d, v)),
            _ => None,
        };

        let (driver_id, vehicle_id) = match release {
            Some(pair) => pair,
            None => {
                let _locks = self.guard.acquire(vec![LockKey::Trip(id)]).await?;
                let mut trip = fetch_trip(&self.store, id).await?;
                trip.cancel()?;
                self.store.save_trip(&trip).await?;
                return Ok(trip);
            }
        };

        let _locks = self
            .guard
            .acquire(vec![
                LockKey::Trip(id),
                LockKey::Driver(driver_id),
                LockKey::Vehicle(vehicle_id),
            ])
            .await?;

        let mut trip = fetch_trip(&self.store, id).await?;

        if trip.driver_id != Some(driver_id) || trip.vehicle_id != Some(vehicle_id) {
            return Err(Error::Conflict {
                entity: "trip",
                id,
                status: trip.status.name().into(),
            });
        }

        let mut driver = fetch_driver(&self.store, driver_id).await?;
        let mut vehicle = fetch_vehicle(&self.store, vehicle_id).await?;

        trip.cancel()?;
        driver.release();
        vehicle.release();

        self.store
            .commit_assignment(&trip, &driver, &vehicle)
            .await?;

        Ok(trip)
    }
}
