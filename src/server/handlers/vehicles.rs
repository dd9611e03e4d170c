use axum::extract::{Extension, Json, Path};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::{Vehicle, VehicleDescription, VehicleStatus};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Deserialize)]
pub struct CreateParams {
    #[serde(flatten)]
    description: VehicleDescription,
    status: Option<VehicleStatus>,
}

#[derive(Deserialize)]
pub struct UpdateLocationParams {
    latitude: f64,
    longitude: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.create_vehicle(params.description, params.status).await?;

    Ok(vehicle.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Vehicle>>, Error> {
    let vehicles = api.list_vehicles().await?;

    Ok(vehicles.into())
}

pub async fn available(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Vehicle>>, Error> {
    let vehicles = api.available_vehicles().await?;

    Ok(vehicles.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.find_vehicle(id).await?;

    Ok(vehicle.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(description): Json<VehicleDescription>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.update_vehicle(id, description).await?;

    Ok(vehicle.into())
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_vehicle(id).await?;

    Ok(().into())
}

pub async fn update_location(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateLocationParams>,
) -> Result<Json<()>, Error> {
    api.update_vehicle_location(id, params.latitude, params.longitude)
        .await?;

    Ok(().into())
}
