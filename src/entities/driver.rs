use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Location;
use crate::error::Error;

/// Profile fields are opaque to the lifecycle engine; only `status` and
/// `vehicle_id` participate in trip transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
    pub vehicle_id: Option<Uuid>,
    pub status: Status,
    pub last_active: DateTime<Utc>,
    pub current_location: Option<Location>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Busy,
    Offline,
    Break,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Busy => "BUSY",
            Self::Offline => "OFFLINE",
            Self::Break => "BREAK",
        }
    }
}

impl Driver {
    pub fn new(profile: DriverProfile, status: Option<Status>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone_number: profile.phone_number,
            license_number: profile.license_number,
            vehicle_id: None,
            status: status.unwrap_or(Status::Available),
            last_active: Utc::now(),
            current_location: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }

    /// Commits the driver to a trip, pairing it with the given vehicle.
    #[tracing::instrument]
    pub fn engage(&mut self, vehicle_id: Uuid) -> Result<(), Error> {
        match self.status {
            Status::Available => {
                self.status = Status::Busy;
                self.vehicle_id = Some(vehicle_id);
                Ok(())
            }
            _ => Err(Error::Conflict {
                entity: "driver",
                id: self.id,
                status: self.status.name().into(),
            }),
        }
    }

    /// Returns a BUSY driver to the available pool. The vehicle pairing is
    /// kept; only a fresh assignment overwrites it.
    #[tracing::instrument]
    pub fn release(&mut self) {
        if self.status == Status::Busy {
            self.status = Status::Available;
        }
    }

    pub fn update_location(&mut self, latitude: f64, longitude: f64) {
        self.current_location = Some(Location::new(latitude, longitude));
        self.last_active = Utc::now();
    }

    pub fn update_profile(&mut self, profile: DriverProfile) {
        self.email = profile.email;
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.phone_number = profile.phone_number;
        self.license_number = profile.license_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Driver {
        Driver::new(
            DriverProfile {
                email: "ada@example.com".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                phone_number: "+1-555-0100".into(),
                license_number: "DL-9911".into(),
            },
            None,
        )
    }

    #[test]
    fn new_driver_defaults_to_available() {
        let driver = driver();
        assert_eq!(driver.status, Status::Available);
        assert!(driver.vehicle_id.is_none());
    }

    #[test]
    fn engage_pairs_and_marks_busy() {
        let mut driver = driver();
        let vehicle_id = Uuid::new_v4();

        driver.engage(vehicle_id).unwrap();
        assert_eq!(driver.status, Status::Busy);
        assert_eq!(driver.vehicle_id, Some(vehicle_id));

        // already busy, a second trip must not steal the driver
        assert!(driver.engage(Uuid::new_v4()).is_err());
        assert_eq!(driver.vehicle_id, Some(vehicle_id));
    }

    #[test]
    fn release_keeps_vehicle_pairing() {
        let mut driver = driver();
        let vehicle_id = Uuid::new_v4();
        driver.engage(vehicle_id).unwrap();

        driver.release();
        assert_eq!(driver.status, Status::Available);
        assert_eq!(driver.vehicle_id, Some(vehicle_id));
    }

    #[test]
    fn release_leaves_offline_driver_offline() {
        let mut driver = driver();
        driver.status = Status::Offline;

        driver.release();
        assert_eq!(driver.status, Status::Offline);
    }

    #[test]
    fn engage_rejects_driver_on_break() {
        let mut driver = driver();
        driver.status = Status::Break;

        assert!(driver.engage(Uuid::new_v4()).is_err());
        assert_eq!(driver.status, Status::Break);
    }
}
