use async_trait::async_trait;
use uuid::Uuid;

use super::helpers::fetch_driver;
use super::Engine;

use crate::api::DriverAPI;
use crate::entities::{Driver, DriverProfile, DriverStatus};
use crate::error::Error;
use crate::guard::LockKey;
use crate::store::EntityStore;

/// Plain field CRUD plus the location pass-through. None of these are
/// lifecycle events: status and pairing stay with the trip transitions.
/// Writes still take the driver's lock so they cannot clobber a concurrent
/// assignment's status flip.
#[async_trait]
impl<S: EntityStore> DriverAPI for Engine<S> {
    #[tracing::instrument(skip(self, profile))]
    async fn create_driver(
        &self,
        profile: DriverProfile,
        status: Option<DriverStatus>,
    ) -> Result<Driver, Error> {
        let driver = Driver::new(profile, status);
        self.store.save_driver(&driver).await?;

        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    async fn find_driver(&self, id: Uuid) -> Result<Driver, Error> {
        fetch_driver(&self.store, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_drivers(&self) -> Result<Vec<Driver>, Error> {
        self.store.drivers().await
    }

    #[tracing::instrument(skip(self))]
    async fn available_drivers(&self) -> Result<Vec<Driver>, Error> {
        self.store.drivers_by_status(DriverStatus::Available).await
    }

    #[tracing::instrument(skip(self, profile))]
    async fn update_driver(&self, id: Uuid, profile: DriverProfile) -> Result<Driver, Error> {
        let _lock = self.guard.acquire(vec![LockKey::Driver(id)]).await?;

        let mut driver = fetch_driver(&self.store, id).await?;
        driver.update_profile(profile);
        self.store.save_driver(&driver).await?;

        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_driver(&self, id: Uuid) -> Result<(), Error> {
        let _lock = self.guard.acquire(vec![LockKey::Driver(id)]).await?;

        self.store.delete_driver(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_driver_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), Error> {
        let _lock = self.guard.acquire(vec![LockKey::Driver(id)]).await?;

        let mut driver = fetch_driver(&self.store, id).await?;
        driver.update_location(latitude, longitude);
        self.store.save_driver(&driver).await
    }
}
