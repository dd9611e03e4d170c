mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::API;
use crate::server::handlers::{drivers, trips, vehicles};

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub async fn serve<T: API + Send + Sync + 'static>(api: T, addr: SocketAddr) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/trips", post(trips::create).get(trips::list))
        .route("/trips/:id", get(trips::find))
        .route("/trips/:id/assign", patch(trips::assign))
        .route("/trips/:id/start", patch(trips::start))
        .route("/trips/:id/complete", patch(trips::complete))
        .route("/trips/:id/cancel", patch(trips::cancel))
        .route("/trips/driver/:driver_id", get(trips::by_driver))
        .route("/assignments/proposal", get(trips::propose))
        .route("/drivers", post(drivers::create).get(drivers::list))
        .route("/drivers/available", get(drivers::available))
        .route(
            "/drivers/:id",
            get(drivers::find).put(drivers::update).delete(drivers::remove),
        )
        .route("/drivers/:id/location", patch(drivers::update_location))
        .route("/vehicles", post(vehicles::create).get(vehicles::list))
        .route("/vehicles/available", get(vehicles::available))
        .route(
            "/vehicles/:id",
            get(vehicles::find)
                .put(vehicles::update)
                .delete(vehicles::remove),
        )
        .route("/vehicles/:id/location", patch(vehicles::update_location))
        .layer(Extension(api));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
