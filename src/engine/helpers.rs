use uuid::Uuid;

use crate::entities::{Driver, Trip, Vehicle};
use crate::error::Error;
use crate::store::EntityStore;

pub async fn fetch_trip<S: EntityStore>(store: &S, id: Uuid) -> Result<Trip, Error> {
    store.trip(id).await?.ok_or(Error::not_found("trip", id))
}

pub async fn fetch_driver<S: EntityStore>(store: &S, id: Uuid) -> Result<Driver, Error> {
    store
        .driver(id)
        .await?
        .ok_or(Error::not_found("driver", id))
}

pub async fn fetch_vehicle<S: EntityStore>(store: &S, id: Uuid) -> Result<Vehicle, Error> {
    store
        .vehicle(id)
        .await?
        .ok_or(Error::not_found("vehicle", id))
}
