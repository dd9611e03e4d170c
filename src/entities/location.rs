use serde::{Deserialize, Serialize};

/// A point on the map, optionally tagged with a human-readable address.
/// Value type only; locations are embedded in the records that use them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }
}
