use async_trait::async_trait;
use uuid::Uuid;

use super::helpers::fetch_vehicle;
use super::Engine;

use crate::api::VehicleAPI;
use crate::entities::{Vehicle, VehicleDescription, VehicleStatus};
use crate::error::Error;
use crate::guard::LockKey;
use crate::store::EntityStore;

#[async_trait]
impl<S: EntityStore> VehicleAPI for Engine<S> {
    #[tracing::instrument(skip(self, description))]
    async fn create_vehicle(
        &self,
        description: VehicleDescription,
        status: Option<VehicleStatus>,
    ) -> Result<Vehicle, Error> {
        let vehicle = Vehicle::new(description, status);
        self.store.save_vehicle(&vehicle).await?;

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn find_vehicle(&self, id: Uuid) -> Result<Vehicle, Error> {
        fetch_vehicle(&self.store, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        self.store.vehicles().await
    }

    #[tracing::instrument(skip(self))]
    async fn available_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        self.store
            .vehicles_by_status(VehicleStatus::Available)
            .await
    }

    #[tracing::instrument(skip(self, description))]
    async fn update_vehicle(
        &self,
        id: Uuid,
        description: VehicleDescription,
    ) -> Result<Vehicle, Error> {
        let _lock = self.guard.acquire(vec![LockKey::Vehicle(id)]).await?;

        let mut vehicle = fetch_vehicle(&self.store, id).await?;
        vehicle.update_description(description);
        self.store.save_vehicle(&vehicle).await?;

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_vehicle(&self, id: Uuid) -> Result<(), Error> {
        let _lock = self.guard.acquire(vec![LockKey::Vehicle(id)]).await?;

        self.store.delete_vehicle(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_vehicle_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), Error> {
        let _lock = self.guard.acquire(vec![LockKey::Vehicle(id)]).await?;

        let mut vehicle = fetch_vehicle(&self.store, id).await?;
        vehicle.update_location(latitude, longitude);
        self.store.save_vehicle(&vehicle).await
    }
}
