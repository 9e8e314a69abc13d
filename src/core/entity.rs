//! Resource traits defining the core abstraction for all record kinds

use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Identity of a stored record
pub type RecordKey = i64;

/// Identity of an authenticated caller, stamped into ownership fields
pub type CallerId = i64;

/// A foreign key held by a record
///
/// `field` is the JSON field that carries the key; resolution replaces that
/// field with a projection of the target record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target_kind: &'static str,
    pub target_id: RecordKey,
}

/// Base trait for every resource kind served by the API.
///
/// A resource kind describes itself completely: its route names, which of its
/// fields are searchable or sortable, which field carries the caller's
/// identity, and how create/patch payloads turn into records. The generic
/// [`ResourceService`](crate::core::service::ResourceService) and the store
/// backends need nothing else.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Create payload: every field the client must provide
    type Draft: DeserializeOwned + Validate + Send + Sync + 'static;

    /// Partial update payload: every field optional
    type Patch: DeserializeOwned + Validate + Send + Sync + 'static;

    /// The plural resource name used in URLs (e.g., "bookings", "people")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "booking", "person")
    fn resource_name_singular() -> &'static str;

    /// Text fields matched by the search keyword
    fn searchable_fields() -> &'static [&'static str];

    /// Fields accepted as a sort order
    fn sortable_fields() -> &'static [&'static str];

    /// Fields whose values must be unique across the collection
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }

    /// Fields never serialized outward nor exposed when referenced
    fn private_fields() -> &'static [&'static str] {
        &[]
    }

    /// Field stamped with the caller's identity on create, if any
    fn ownership_field() -> Option<&'static str> {
        None
    }

    /// Get the record's identity
    fn id(&self) -> RecordKey;

    /// Set the record's identity (used by stores when assigning keys)
    fn set_id(&mut self, id: RecordKey);

    /// Get the value of a field by its JSON name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Identity explicitly requested by a create payload
    fn requested_id(draft: &Self::Draft) -> Option<RecordKey>;

    /// Build a record from a validated draft
    ///
    /// The identity is left for the store to stamp and the ownership field
    /// for [`stamp_owner`].
    fn from_draft(draft: Self::Draft) -> Self;

    /// Merge a patch: fields absent in the patch keep their value
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Record-level invariants spanning several fields
    fn check_invariants(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Foreign keys held by this record
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// Write `owner` into the record's ownership field, if the kind has one
///
/// The field is addressed by its JSON name, so whatever
/// [`Resource::ownership_field`] names is what gets overwritten.
pub fn stamp_owner<T: Resource>(record: T, owner: CallerId) -> anyhow::Result<T> {
    let Some(field) = T::ownership_field() else {
        return Ok(record);
    };

    let mut value = serde_json::to_value(&record)?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("{} is not a JSON object", T::resource_name_singular()))?;
    obj.insert(field.to_string(), owner.into());
    let stamped: T = serde_json::from_value(value)?;

    if stamped.field_value(field).and_then(|v| v.as_integer()) != Some(owner) {
        return Err(anyhow::anyhow!(
            "ownership field '{}' of {} was not stamped",
            field,
            T::resource_name_singular()
        ));
    }
    Ok(stamped)
}

/// Serialize a record to JSON without its private fields
pub fn to_public_json<T: Resource>(record: &T) -> anyhow::Result<serde_json::Value> {
    let mut value = serde_json::to_value(record)?;
    strip_fields(&mut value, T::private_fields());
    Ok(value)
}

/// Remove the named fields from a JSON object
pub fn strip_fields(value: &mut serde_json::Value, fields: &[&str]) {
    if let Some(obj) = value.as_object_mut() {
        for field in fields {
            obj.remove(*field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Booking, Person, Price};
    use serde_json::json;

    #[test]
    fn test_stamp_owner_overwrites_ownership_field() {
        let booking = Booking {
            id: 3,
            room_number: 5,
            arrival_day_number: 10,
            leave_day_number: 12,
            guest_number: 2,
            had_breakfast: true,
            name_id: "abc".to_string(),
            person: Some(99),
        };
        let stamped = stamp_owner(booking.clone(), 7).unwrap();
        assert_eq!(stamped.person, Some(7));
        assert_eq!(Booking { person: Some(99), ..stamped }, booking);

        let person = Person {
            id: 1,
            name: "Ann".to_string(),
            author: None,
        };
        assert_eq!(stamp_owner(person, 12).unwrap().author, Some(12));
    }

    #[test]
    fn test_stamp_owner_leaves_unowned_kinds_alone() {
        let price = Price {
            id: 1,
            month: "May".to_string(),
            days: 31,
            start_day: 121,
        };
        let value = serde_json::to_value(stamp_owner(price, 7).unwrap()).unwrap();
        assert_eq!(value, json!({"id": 1, "month": "May", "days": 31, "startDay": 121}));
    }

    #[test]
    fn test_strip_fields_removes_only_named() {
        let mut value = json!({"id": 1, "name": "Ann", "password": "hash"});
        strip_fields(&mut value, &["password", "missing"]);
        assert_eq!(value, json!({"id": 1, "name": "Ann"}));
    }

    #[test]
    fn test_strip_fields_ignores_non_objects() {
        let mut value = json!(12);
        strip_fields(&mut value, &["password"]);
        assert_eq!(value, json!(12));
    }
}
