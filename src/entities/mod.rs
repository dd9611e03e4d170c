mod driver;
mod location;
mod trip;
mod vehicle;

pub use driver::{Driver, DriverProfile, Status as DriverStatus};
pub use location::Location;
pub use trip::{Status as TripStatus, Trip};
pub use vehicle::{Status as VehicleStatus, Vehicle, VehicleDescription};
