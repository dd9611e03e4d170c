mod driver_api;
mod helpers;
mod trip_api;
mod vehicle_api;

use crate::api::API;
use crate::config::Config;
use crate::guard::ResourceGuard;
use crate::selector::{AssignmentSelector, LowestIdSelector};
use crate::store::EntityStore;

/// The lifecycle engine. Owns the store, the lock table serializing
/// cross-entity transitions, and the selection policy.
pub struct Engine<S> {
    store: S,
    guard: ResourceGuard,
    selector: Box<dyn AssignmentSelector>,
    release_on_cancel: bool,
}

impl<S: EntityStore> Engine<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self::with_selector(store, config, Box::new(LowestIdSelector))
    }

    pub fn with_selector(
        store: S,
        config: &Config,
        selector: Box<dyn AssignmentSelector>,
    ) -> Self {
        Self {
            store,
            guard: ResourceGuard::new(config.lock_timeout),
            selector,
            release_on_cancel: config.release_on_cancel,
        }
    }
}

impl<S: EntityStore> API for Engine<S> {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio_test::block_on;
    use uuid::Uuid;

    use super::*;
    use crate::api::{DriverAPI, NewTrip, TripAPI, VehicleAPI};
    use crate::entities::{
        DriverProfile, DriverStatus, Location, TripStatus, VehicleDescription, VehicleStatus,
    };
    use crate::error::Error;
    use crate::store::MemoryStore;

    fn engine() -> Engine<MemoryStore> {
        Engine::new(MemoryStore::new(), &Config::default())
    }

    fn engine_with(config: Config) -> Engine<MemoryStore> {
        Engine::new(MemoryStore::new(), &config)
    }

    fn new_trip() -> NewTrip {
        NewTrip {
            passenger_id: Uuid::new_v4(),
            pickup_location: Some(Location::new(40.7128, -74.0060)),
            dropoff_location: Some(Location::new(40.730610, -73.935242)),
            fare: Some(18.0),
            notes: None,
        }
    }

    fn profile(n: u32) -> DriverProfile {
        DriverProfile {
            email: format!("driver{n}@example.com"),
            first_name: "Lin".into(),
            last_name: format!("Driver{n}"),
            phone_number: format!("+1-555-01{n:02}"),
            license_number: format!("DL-{n:04}"),
        }
    }

    fn description(n: u32) -> VehicleDescription {
        VehicleDescription {
            license_plate: format!("NF-{n:04}"),
            make: "Toyota".into(),
            model: "Prius".into(),
            year: Some(2022),
            color: None,
            vehicle_type: Some("SEDAN".into()),
        }
    }

    #[test]
    fn round_trip_through_the_whole_lifecycle() {
        block_on(async {
            let engine = engine();

            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();

            let trip = engine.create_trip(new_trip()).await.unwrap();
            assert_eq!(trip.status, TripStatus::Requested);
            assert!(trip.driver_id.is_none());
            assert!(trip.vehicle_id.is_none());

            let trip = engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap();
            assert_eq!(trip.status, TripStatus::Assigned);
            assert_eq!(trip.driver_id, Some(driver.id));
            assert_eq!(trip.vehicle_id, Some(vehicle.id));

            let driver = engine.find_driver(driver.id).await.unwrap();
            let vehicle = engine.find_vehicle(vehicle.id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Busy);
            assert_eq!(driver.vehicle_id, Some(vehicle.id));
            assert_eq!(vehicle.status, VehicleStatus::Busy);
            assert_eq!(vehicle.driver_id, Some(driver.id));

            let trip = engine.start_trip(trip.id).await.unwrap();
            assert_eq!(trip.status, TripStatus::InProgress);
            assert!(trip.start_time.is_some());

            let trip = engine.complete_trip(trip.id).await.unwrap();
            assert_eq!(trip.status, TripStatus::Completed);
            assert!(trip.end_time.is_some());
            assert!(trip.start_time.unwrap() <= trip.end_time.unwrap());

            let driver = engine.find_driver(driver.id).await.unwrap();
            let vehicle = engine.find_vehicle(vehicle.id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Available);
            assert_eq!(vehicle.status, VehicleStatus::Available);
        });
    }

    #[test]
    fn create_trip_requires_both_locations() {
        block_on(async {
            let engine = engine();

            let mut missing_dropoff = new_trip();
            missing_dropoff.dropoff_location = None;

            assert!(matches!(
                engine.create_trip(missing_dropoff).await,
                Err(Error::Validation(_))
            ));
        });
    }

    #[test]
    fn create_trip_rejects_negative_fare() {
        block_on(async {
            let engine = engine();

            let mut negative = new_trip();
            negative.fare = Some(-3.0);

            assert!(matches!(
                engine.create_trip(negative).await,
                Err(Error::Validation(_))
            ));
        });
    }

    #[test]
    fn assign_unknown_ids_is_not_found() {
        block_on(async {
            let engine = engine();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            let err = engine
                .assign_trip(trip.id, Uuid::new_v4(), Uuid::new_v4())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::NotFound { entity: "driver", .. }));

            let trip = engine.find_trip(trip.id).await.unwrap();
            assert_eq!(trip.status, TripStatus::Requested);
        });
    }

    #[test]
    fn assign_leaves_driver_untouched_when_vehicle_is_busy() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine
                .create_vehicle(description(1), Some(VehicleStatus::Maintenance))
                .await
                .unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            let err = engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Conflict { entity: "vehicle", .. }));

            // all-or-nothing: nothing moved
            let trip = engine.find_trip(trip.id).await.unwrap();
            let driver = engine.find_driver(driver.id).await.unwrap();
            assert_eq!(trip.status, TripStatus::Requested);
            assert!(trip.driver_id.is_none());
            assert_eq!(driver.status, DriverStatus::Available);
            assert!(driver.vehicle_id.is_none());
        });
    }

    #[test]
    fn double_assignment_is_a_conflict() {
        block_on(async {
            let engine = engine();
            let d1 = engine.create_driver(profile(1), None).await.unwrap();
            let d2 = engine.create_driver(profile(2), None).await.unwrap();
            let v1 = engine.create_vehicle(description(1), None).await.unwrap();
            let v2 = engine.create_vehicle(description(2), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            engine.assign_trip(trip.id, d1.id, v1.id).await.unwrap();

            let err = engine.assign_trip(trip.id, d2.id, v2.id).await.unwrap_err();
            assert!(matches!(err, Error::Conflict { entity: "trip", .. }));

            let trip = engine.find_trip(trip.id).await.unwrap();
            assert_eq!(trip.driver_id, Some(d1.id));
        });
    }

    #[test]
    fn racing_assigns_for_one_driver_yield_one_winner() {
        block_on(async {
            let engine = Arc::new(engine());
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let v1 = engine.create_vehicle(description(1), None).await.unwrap();
            let v2 = engine.create_vehicle(description(2), None).await.unwrap();
            let t1 = engine.create_trip(new_trip()).await.unwrap();
            let t2 = engine.create_trip(new_trip()).await.unwrap();

            let (a, b) = futures::join!(
                engine.assign_trip(t1.id, driver.id, v1.id),
                engine.assign_trip(t2.id, driver.id, v2.id)
            );

            let (winner, loser) = match (a, b) {
                (Ok(trip), Err(err)) => (trip, err),
                (Err(err), Ok(trip)) => (trip, err),
                (a, b) => panic!(
                    "expected exactly one success, got ok={} ok={}",
                    a.is_ok(),
                    b.is_ok()
                ),
            };

            assert!(matches!(loser, Error::Conflict { entity: "driver", .. }));

            let driver = engine.find_driver(driver.id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Busy);

            // the driver is paired to exactly the winning trip
            let paired = engine.list_trips_by_driver(driver.id).await.unwrap();
            assert_eq!(paired.len(), 1);
            assert_eq!(paired[0].id, winner.id);
        });
    }

    #[test]
    fn starting_a_running_trip_is_rejected_and_harmless() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap();
            let started = engine.start_trip(trip.id).await.unwrap();

            let err = engine.start_trip(trip.id).await.unwrap_err();
            assert!(matches!(err, Error::InvalidState { action: "start", .. }));
            assert!(!err.is_retriable());

            let unchanged = engine.find_trip(trip.id).await.unwrap();
            assert_eq!(unchanged.status, TripStatus::InProgress);
            assert_eq!(unchanged.start_time, started.start_time);
        });
    }

    #[test]
    fn proposal_is_empty_without_drivers() {
        block_on(async {
            let engine = engine();
            engine.create_vehicle(description(1), None).await.unwrap();
            engine.create_vehicle(description(2), None).await.unwrap();

            assert!(engine.propose_assignment().await.unwrap().is_none());
        });
    }

    #[test]
    fn proposal_picks_the_lowest_available_pair() {
        block_on(async {
            let engine = engine();
            let d1 = engine.create_driver(profile(1), None).await.unwrap();
            let d2 = engine.create_driver(profile(2), None).await.unwrap();
            let busy = engine
                .create_driver(profile(3), Some(DriverStatus::Busy))
                .await
                .unwrap();
            let v = engine.create_vehicle(description(1), None).await.unwrap();

            let proposal = engine.propose_assignment().await.unwrap().unwrap();
            assert_eq!(proposal.driver_id, d1.id.min(d2.id));
            assert_ne!(proposal.driver_id, busy.id);
            assert_eq!(proposal.vehicle_id, v.id);
        });
    }

    #[test]
    fn a_custom_selector_replaces_the_baseline_policy() {
        struct HighestId;

        impl crate::selector::AssignmentSelector for HighestId {
            fn select(
                &self,
                drivers: &[crate::entities::Driver],
                vehicles: &[crate::entities::Vehicle],
            ) -> Option<crate::selector::Proposal> {
                let driver = drivers.iter().max_by_key(|d| d.id)?;
                let vehicle = vehicles.iter().max_by_key(|v| v.id)?;
                Some(crate::selector::Proposal {
                    driver_id: driver.id,
                    vehicle_id: vehicle.id,
                })
            }
        }

        block_on(async {
            let engine = Engine::with_selector(
                MemoryStore::new(),
                &Config::default(),
                Box::new(HighestId),
            );
            let d1 = engine.create_driver(profile(1), None).await.unwrap();
            let d2 = engine.create_driver(profile(2), None).await.unwrap();
            let v = engine.create_vehicle(description(1), None).await.unwrap();

            let proposal = engine.propose_assignment().await.unwrap().unwrap();
            assert_eq!(proposal.driver_id, d1.id.max(d2.id));
            assert_eq!(proposal.vehicle_id, v.id);
        });
    }

    #[test]
    fn cancelling_a_requested_trip_touches_nobody() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            let cancelled = engine.cancel_trip(trip.id).await.unwrap();
            assert_eq!(cancelled.status, TripStatus::Cancelled);
            assert!(cancelled.driver_id.is_none());

            let driver = engine.find_driver(driver.id).await.unwrap();
            let vehicle = engine.find_vehicle(vehicle.id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Available);
            assert_eq!(vehicle.status, VehicleStatus::Available);
        });
    }

    #[test]
    fn cancel_releases_the_pair_by_default() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap();
            engine.cancel_trip(trip.id).await.unwrap();

            let driver = engine.find_driver(driver.id).await.unwrap();
            let vehicle = engine.find_vehicle(vehicle.id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Available);
            assert_eq!(vehicle.status, VehicleStatus::Available);
        });
    }

    #[test]
    fn cancel_can_leave_the_pair_committed() {
        block_on(async {
            let engine = engine_with(Config {
                release_on_cancel: false,
                ..Config::default()
            });
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap();
            engine.cancel_trip(trip.id).await.unwrap();

            let driver = engine.find_driver(driver.id).await.unwrap();
            let vehicle = engine.find_vehicle(vehicle.id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Busy);
            assert_eq!(vehicle.status, VehicleStatus::Busy);
        });
    }

    #[test]
    fn cancelling_a_completed_trip_is_invalid() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap();
            engine.start_trip(trip.id).await.unwrap();
            engine.complete_trip(trip.id).await.unwrap();

            assert!(matches!(
                engine.cancel_trip(trip.id).await,
                Err(Error::InvalidState { action: "cancel", .. })
            ));
        });
    }

    #[test]
    fn location_updates_pass_through() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();

            engine
                .update_driver_location(driver.id, 40.7128, -74.0060)
                .await
                .unwrap();

            let driver = engine.find_driver(driver.id).await.unwrap();
            let location = driver.current_location.unwrap();
            assert_eq!(location.latitude, 40.7128);
            assert_eq!(location.longitude, -74.0060);

            assert!(matches!(
                engine
                    .update_vehicle_location(Uuid::new_v4(), 0.0, 0.0)
                    .await,
                Err(Error::NotFound { entity: "vehicle", .. })
            ));
        });
    }

    #[test]
    fn completing_a_trip_whose_driver_vanished_is_not_found() {
        block_on(async {
            let engine = engine();
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap();
            engine.start_trip(trip.id).await.unwrap();
            engine.delete_driver(driver.id).await.unwrap();

            let err = engine.complete_trip(trip.id).await.unwrap_err();
            assert!(matches!(err, Error::NotFound { entity: "driver", .. }));

            // nothing was written
            let trip = engine.find_trip(trip.id).await.unwrap();
            let vehicle = engine.find_vehicle(vehicle.id).await.unwrap();
            assert_eq!(trip.status, TripStatus::InProgress);
            assert_eq!(vehicle.status, VehicleStatus::Busy);
        });
    }

    #[test]
    fn lock_timeout_surfaces_as_retriable() {
        block_on(async {
            let engine = engine_with(Config {
                lock_timeout: Duration::from_millis(20),
                ..Config::default()
            });
            let driver = engine.create_driver(profile(1), None).await.unwrap();
            let vehicle = engine.create_vehicle(description(1), None).await.unwrap();
            let trip = engine.create_trip(new_trip()).await.unwrap();

            let _held = engine
                .guard
                .acquire(vec![crate::guard::LockKey::Driver(driver.id)])
                .await
                .unwrap();

            let err = engine
                .assign_trip(trip.id, driver.id, vehicle.id)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::LockTimeout { .. }));
            assert!(err.is_retriable());
        });
    }
}
