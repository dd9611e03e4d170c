use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Location;
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: Status,
    pub driver_id: Option<Uuid>,
    pub current_location: Option<Location>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleDescription {
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub vehicle_type: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Busy,
    Maintenance,
    Offline,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Busy => "BUSY",
            Self::Maintenance => "MAINTENANCE",
            Self::Offline => "OFFLINE",
        }
    }
}

impl Vehicle {
    pub fn new(description: VehicleDescription, status: Option<Status>) -> Self {
        Self {
            id: Uuid::new_v4(),
            license_plate: description.license_plate,
            make: description.make,
            model: description.model,
            year: description.year,
            color: description.color,
            vehicle_type: description.vehicle_type,
            status: status.unwrap_or(Status::Available),
            driver_id: None,
            current_location: None,
            last_updated: Utc::now(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }

    /// Commits the vehicle to a trip, pairing it with the given driver.
    #[tracing::instrument]
    pub fn engage(&mut self, driver_id: Uuid) -> Result<(), Error> {
        match self.status {
            Status::Available => {
                self.status = Status::Busy;
                self.driver_id = Some(driver_id);
                self.last_updated = Utc::now();
                Ok(())
            }
            _ => Err(Error::Conflict {
                entity: "vehicle",
                id: self.id,
                status: self.status.name().into(),
            }),
        }
    }

    /// Returns a BUSY vehicle to the available pool, keeping the driver
    /// pairing for reference.
    #[tracing::instrument]
    pub fn release(&mut self) {
        if self.status == Status::Busy {
            self.status = Status::Available;
            self.last_updated = Utc::now();
        }
    }

    pub fn update_location(&mut self, latitude: f64, longitude: f64) {
        self.current_location = Some(Location::new(latitude, longitude));
        self.last_updated = Utc::now();
    }

    pub fn update_description(&mut self, description: VehicleDescription) {
        self.license_plate = description.license_plate;
        self.make = description.make;
        self.model = description.model;
        self.year = description.year;
        self.color = description.color;
        self.vehicle_type = description.vehicle_type;
        self.last_updated = Utc::now();
    }
}
