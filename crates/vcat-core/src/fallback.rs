//! Offline vehicle-type fallback table.
//!
//! Consulted whenever a make's vehicle types cannot be resolved from the
//! snapshot or the upstream API. Lookups are pure and never fail: an unknown
//! make yields an empty list.

use std::collections::HashMap;

use crate::entities::VehicleType;

const MOTORCYCLE: (&str, &str) = ("1", "Motorcycle");
const PASSENGER_CAR: (&str, &str) = ("2", "Passenger Car");
const TRUCK: (&str, &str) = ("3", "Truck");
const BUS: (&str, &str) = ("5", "Bus");
const MPV: (&str, &str) = ("7", "Multipurpose Passenger Vehicle (MPV)");
const INCOMPLETE: (&str, &str) = ("10", "Incomplete Vehicle");

/// Built-in entries keyed by vPIC make id.
const BUILTIN: &[(&str, &[(&str, &str)])] = &[
    ("440", &[PASSENGER_CAR]),
    ("441", &[PASSENGER_CAR, MPV, TRUCK]),
    ("442", &[PASSENGER_CAR, MPV]),
    ("443", &[PASSENGER_CAR, MPV]),
    ("444", &[MPV]),
    ("445", &[PASSENGER_CAR]),
    ("448", &[PASSENGER_CAR, MPV, TRUCK, BUS, INCOMPLETE]),
    ("449", &[PASSENGER_CAR, MPV, TRUCK, BUS, INCOMPLETE]),
    ("452", &[MOTORCYCLE, PASSENGER_CAR, MPV]),
    ("460", &[PASSENGER_CAR, MPV, TRUCK, BUS, INCOMPLETE]),
    ("474", &[MOTORCYCLE, PASSENGER_CAR, MPV, TRUCK]),
    ("482", &[PASSENGER_CAR, MPV, TRUCK, BUS]),
];

/// Static make id → vehicle types mapping.
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    entries: HashMap<String, Vec<VehicleType>>,
}

impl FallbackTable {
    /// The table shipped with vcat.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().map(|(make_id, types)| {
            (
                (*make_id).to_string(),
                types
                    .iter()
                    .map(|(id, name)| VehicleType::new(*id, *name))
                    .collect(),
            )
        }))
    }

    /// A table with no entries; every lookup yields an empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<VehicleType>)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Vehicle types known offline for `make_id`, or an empty list.
    #[must_use]
    pub fn lookup(&self, make_id: &str) -> Vec<VehicleType> {
        self.entries.get(make_id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, make_id: &str) -> bool {
        self.entries.contains_key(make_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
