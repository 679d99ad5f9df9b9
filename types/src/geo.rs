//! Geocoordinates attached to a record.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair produced by the address autocomplete layer.
///
/// Stored and returned unchanged; the core performs no validation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}
