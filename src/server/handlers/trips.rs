use axum::extract::{Extension, Json, Path};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::NewTrip;
use crate::entities::Trip;
use crate::error::Error;
use crate::selector::Proposal;
use crate::server::DynAPI;

#[derive(Deserialize)]
pub struct AssignParams {
    driver_id: Uuid,
    vehicle_id: Uuid,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<NewTrip>,
) -> Result<Json<Trip>, Error> {
    let trip = api.create_trip(params).await?;

    Ok(trip.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Trip>>, Error> {
    let trips = api.list_trips().await?;

    Ok(trips.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, Error> {
    let trip = api.find_trip(id).await?;

    Ok(trip.into())
}

pub async fn by_driver(
    Extension(api): Extension<DynAPI>,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<Vec<Trip>>, Error> {
    let trips = api.list_trips_by_driver(driver_id).await?;

    Ok(trips.into())
}

pub async fn assign(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<AssignParams>,
) -> Result<Json<Trip>, Error> {
    let trip = api
        .assign_trip(id, params.driver_id, params.vehicle_id)
        .await?;

    Ok(trip.into())
}

pub async fn propose(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Option<Proposal>>, Error> {
    let proposal = api.propose_assignment().await?;

    Ok(proposal.into())
}

pub async fn start(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, Error> {
    let trip = api.start_trip(id).await?;

    Ok(trip.into())
}

pub async fn complete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, Error> {
    let trip = api.complete_trip(id).await?;

    Ok(trip.into())
}

pub async fn cancel(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, Error> {
    let trip = api.cancel_trip(id).await?;

    Ok(trip.into())
}
