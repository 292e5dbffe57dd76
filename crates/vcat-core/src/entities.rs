use serde::{Deserialize, Serialize};

/// A category of vehicle produced by a make (e.g. `Passenger Car`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    pub type_id: String,
    pub type_name: String,
}

impl VehicleType {
    pub fn new(type_id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            type_name: type_name.into(),
        }
    }
}

/// A vehicle manufacturer and the vehicle types it produces.
///
/// `make_id` is expected to be unique within one catalog batch. Stores do not
/// enforce it across full replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Make {
    pub make_id: String,
    pub make_name: String,
    #[serde(default)]
    pub vehicle_types: Vec<VehicleType>,
}

impl Make {
    /// A make with no vehicle types resolved yet.
    pub fn draft(make_id: impl Into<String>, make_name: impl Into<String>) -> Self {
        Self {
            make_id: make_id.into(),
            make_name: make_name.into(),
            vehicle_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_vehicle_types(mut self, vehicle_types: Vec<VehicleType>) -> Self {
        self.vehicle_types = vehicle_types;
        self
    }
}
