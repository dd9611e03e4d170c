use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Location;
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub passenger_id: Uuid,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub fare: Option<f64>,
    pub notes: Option<String>,
    pub status: Status,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub requested_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Requested,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl Trip {
    pub fn new(
        passenger_id: Uuid,
        pickup_location: Location,
        dropoff_location: Location,
        fare: Option<f64>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            passenger_id,
            pickup_location,
            dropoff_location,
            fare,
            notes,
            status: Status::Requested,
            driver_id: None,
            vehicle_id: None,
            requested_time: Utc::now(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn is_requested(&self) -> bool {
        self.status == Status::Requested
    }

    /// ASSIGNED or IN_PROGRESS, i.e. currently holding a driver and vehicle.
    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Assigned | Status::InProgress)
    }

    #[tracing::instrument]
    pub fn assign(&mut self, driver_id: Uuid, vehicle_id: Uuid) -> Result<(), Error> {
        match self.status {
            Status::Requested => {
                self.status = Status::Assigned;
                self.driver_id = Some(driver_id);
                self.vehicle_id = Some(vehicle_id);
                Ok(())
            }
            _ => Err(self.invalid_state("assign")),
        }
    }

    #[tracing::instrument]
    pub fn start(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Assigned => {
                self.status = Status::InProgress;
                self.start_time = Some(Utc::now());
                Ok(())
            }
            _ => Err(self.invalid_state("start")),
        }
    }

    #[tracing::instrument]
    pub fn complete(&mut self) -> Result<(), Error> {
        match self.status {
            Status::InProgress => {
                self.status = Status::Completed;
                self.end_time = Some(Utc::now());
                Ok(())
            }
            _ => Err(self.invalid_state("complete")),
        }
    }

    #[tracing::instrument]
    pub fn cancel(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Requested | Status::Assigned | Status::InProgress => {
                self.status = Status::Cancelled;
                Ok(())
            }
            _ => Err(self.invalid_state("cancel")),
        }
    }

    fn invalid_state(&self, action: &'static str) -> Error {
        Error::InvalidState {
            id: self.id,
            action,
            status: self.status.name().into(),
        }
    }
}
