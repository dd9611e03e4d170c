use axum::extract::{Extension, Json, Path};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::{Driver, DriverProfile, DriverStatus};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Deserialize)]
pub struct CreateParams {
    #[serde(flatten)]
    profile: DriverProfile,
    status: Option<DriverStatus>,
}

#[derive(Deserialize)]
pub struct UpdateLocationParams {
    latitude: f64,
    longitude: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Driver>, Error> {
    let driver = api.create_driver(params.profile, params.status).await?;

    Ok(driver.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Driver>>, Error> {
    let drivers = api.list_drivers().await?;

    Ok(drivers.into())
}

pub async fn available(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Driver>>, Error> {
    let drivers = api.available_drivers().await?;

    Ok(drivers.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Driver>, Error> {
    let driver = api.find_driver(id).await?;

    Ok(driver.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(profile): Json<DriverProfile>,
) -> Result<Json<Driver>, Error> {
    let driver = api.update_driver(id, profile).await?;

    Ok(driver.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_driver(id).await?;

    Ok(().into())
}

pub async fn update_location(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateLocationParams>,
) -> Result<Json<()>, Error> {
    api.update_driver_location(id, params.latitude, params.longitude)
        .await?;

    Ok(().into())
}
