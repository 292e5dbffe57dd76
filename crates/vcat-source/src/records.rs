//! Typed records validated against the vPIC response shape.
//!
//! Both the bundled snapshots and the live API answer with
//! `Response / Results[0] / <RecordGroup>[]`, each record carrying its scalar
//! fields as child elements. Only the first occurrence of a field counts.

use vcat_core::{Make, VehicleType};

use crate::error::SourceError;
use crate::xml::XmlElement;

/// Record group holding one make per element.
pub const MAKES_GROUP: &str = "AllVehicleMakes";

/// Record group holding one vehicle type per element.
pub const TYPES_GROUP: &str = "VehicleTypesForMakeIds";

/// A decoded make before its vehicle types are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeRecord {
    pub make_id: String,
    pub make_name: String,
}

impl MakeRecord {
    #[must_use]
    pub fn into_make(self, vehicle_types: Vec<VehicleType>) -> Make {
        Make::draft(self.make_id, self.make_name).with_vehicle_types(vehicle_types)
    }
}

/// Decode a make list.
///
/// # Errors
///
/// [`SourceError::Decode`] for unparseable markup, [`SourceError::MissingField`]
/// naming the first path that does not match the expected shape.
pub fn decode_makes(raw: &str) -> Result<Vec<MakeRecord>, SourceError> {
    let root = XmlElement::parse(raw)?;
    record_group(&root, MAKES_GROUP)?
        .enumerate()
        .map(|(index, record)| {
            let path = format!("Response/Results/{MAKES_GROUP}[{index}]");
            Ok(MakeRecord {
                make_id: field(record, &path, "Make_ID")?,
                make_name: field(record, &path, "Make_Name")?,
            })
        })
        .collect()
}

/// Decode a vehicle type list.
///
/// # Errors
///
/// Same as [`decode_makes`].
pub fn decode_vehicle_types(raw: &str) -> Result<Vec<VehicleType>, SourceError> {
    let root = XmlElement::parse(raw)?;
    record_group(&root, TYPES_GROUP)?
        .enumerate()
        .map(|(index, record)| {
            let path = format!("Response/Results/{TYPES_GROUP}[{index}]");
            Ok(VehicleType {
                type_id: field(record, &path, "VehicleTypeId")?,
                type_name: field(record, &path, "VehicleTypeName")?,
            })
        })
        .collect()
}

/// Records of `group` under `Response/Results[0]`. An empty group counts as
/// missing.
fn record_group<'a>(
    root: &'a XmlElement,
    group: &'a str,
) -> Result<impl Iterator<Item = &'a XmlElement> + 'a, SourceError> {
    if root.name() != "Response" {
        return Err(SourceError::missing("Response"));
    }
    let results = root
        .child("Results")
        .ok_or_else(|| SourceError::missing("Response/Results"))?;
    if results.child(group).is_none() {
        return Err(SourceError::missing(format!("Response/Results/{group}")));
    }
    Ok(results.children_named(group))
}

fn field(record: &XmlElement, path: &str, name: &str) -> Result<String, SourceError> {
    record
        .child(name)
        .map(|value| value.text().to_string())
        .ok_or_else(|| SourceError::missing(format!("{path}/{name}")))
}
