pub mod drivers;
pub mod trips;
pub mod vehicles;
