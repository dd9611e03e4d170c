use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::{
    Driver, DriverProfile, DriverStatus, Location, Trip, Vehicle, VehicleDescription,
    VehicleStatus,
};
use crate::error::Error;
use crate::selector::Proposal;

/// Trip creation payload. Locations are optional at the boundary so the
/// engine can reject their absence as a validation error instead of the
/// deserializer doing it.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTrip {
    pub passenger_id: Uuid,
    pub pickup_location: Option<Location>,
    pub dropoff_location: Option<Location>,
    pub fare: Option<f64>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait TripAPI {
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, Error>;

    async fn find_trip(&self, id: Uuid) -> Result<Trip, Error>;

    async fn list_trips(&self) -> Result<Vec<Trip>, Error>;

    async fn list_trips_by_driver(&self, driver_id: Uuid) -> Result<Vec<Trip>, Error>;

    async fn assign_trip(&self, id: Uuid, driver_id: Uuid, vehicle_id: Uuid)
        -> Result<Trip, Error>;

    /// Read-only: proposes a driver/vehicle pair without committing it.
    async fn propose_assignment(&self) -> Result<Option<Proposal>, Error>;

    async fn start_trip(&self, id: Uuid) -> Result<Trip, Error>;

    async fn complete_trip(&self, id: Uuid) -> Result<Trip, Error>;

    async fn cancel_trip(&self, id: Uuid) -> Result<Trip, Error>;
}

#[async_trait]
pub trait DriverAPI {
    async fn create_driver(
        &self,
        profile: DriverProfile,
        status: Option<DriverStatus>,
    ) -> Result<Driver, Error>;

    async fn find_driver(&self, id: Uuid) -> Result<Driver, Error>;

    async fn list_drivers(&self) -> Result<Vec<Driver>, Error>;

    async fn available_drivers(&self) -> Result<Vec<Driver>, Error>;

    async fn update_driver(&self, id: Uuid, profile: DriverProfile) -> Result<Driver, Error>;

    async fn delete_driver(&self, id: Uuid) -> Result<(), Error>;

    async fn update_driver_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), Error>;
}

#[async_trait]
pub trait VehicleAPI {
    async fn create_vehicle(
        &self,
        description: VehicleDescription,
        status: Option<VehicleStatus>,
    ) -> Result<Vehicle, Error>;

    async fn find_vehicle(&self, id: Uuid) -> Result<Vehicle, Error>;

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error>;

    async fn available_vehicles(&self) -> Result<Vec<Vehicle>, Error>;

    async fn update_vehicle(
        &self,
        id: Uuid,
        description: VehicleDescription,
    ) -> Result<Vehicle, Error>;

    async fn delete_vehicle(&self, id: Uuid) -> Result<(), Error>;

    async fn update_vehicle_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), Error>;
}

pub trait API: TripAPI + DriverAPI + VehicleAPI {}
