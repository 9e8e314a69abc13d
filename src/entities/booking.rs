//! Booking: a room reservation attributed to the person who made it

use crate::core::entity::{RecordKey, Reference, Resource};
use crate::core::error::ValidationError;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: RecordKey,
    pub room_number: i64,
    pub arrival_day_number: i64,
    pub leave_day_number: i64,
    pub guest_number: i64,
    pub had_breakfast: bool,
    pub name_id: String,
    /// Person who made the booking, stamped from the caller on create
    pub person: Option<RecordKey>,
}

/// Create payload for [`Booking`]
///
/// `person` is deliberately absent: a client-supplied value is dropped by
/// deserialization and the caller's identity is used instead.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub id: Option<RecordKey>,
    #[validate(range(min = 1, max = 27, message = "must be between 1 and 27"))]
    pub room_number: i64,
    #[validate(range(min = 1, max = 365, message = "must be between 1 and 365"))]
    pub arrival_day_number: i64,
    #[validate(range(min = 1, max = 365, message = "must be between 1 and 365"))]
    pub leave_day_number: i64,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub guest_number: i64,
    pub had_breakfast: bool,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name_id: String,
}

/// Partial update payload for [`Booking`]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[validate(range(min = 1, max = 27, message = "must be between 1 and 27"))]
    pub room_number: Option<i64>,
    #[validate(range(min = 1, max = 365, message = "must be between 1 and 365"))]
    pub arrival_day_number: Option<i64>,
    #[validate(range(min = 1, max = 365, message = "must be between 1 and 365"))]
    pub leave_day_number: Option<i64>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub guest_number: Option<i64>,
    pub had_breakfast: Option<bool>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name_id: Option<String>,
}

impl Resource for Booking {
    type Draft = BookingDraft;
    type Patch = BookingPatch;

    fn resource_name() -> &'static str {
        "bookings"
    }

    fn resource_name_singular() -> &'static str {
        "booking"
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["nameId"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &[
            "id",
            "roomNumber",
            "arrivalDayNumber",
            "leaveDayNumber",
            "guestNumber",
            "hadBreakfast",
            "nameId",
            "person",
        ]
    }

    fn unique_fields() -> &'static [&'static str] {
        &["nameId"]
    }

    fn ownership_field() -> Option<&'static str> {
        Some("person")
    }

    fn id(&self) -> RecordKey {
        self.id
    }

    fn set_id(&mut self, id: RecordKey) {
        self.id = id;
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "roomNumber" => Some(self.room_number.into()),
            "arrivalDayNumber" => Some(self.arrival_day_number.into()),
            "leaveDayNumber" => Some(self.leave_day_number.into()),
            "guestNumber" => Some(self.guest_number.into()),
            "hadBreakfast" => Some(self.had_breakfast.into()),
            "nameId" => Some(self.name_id.as_str().into()),
            "person" => Some(self.person.into()),
            _ => None,
        }
    }

    fn requested_id(draft: &BookingDraft) -> Option<RecordKey> {
        draft.id
    }

    fn from_draft(draft: BookingDraft) -> Self {
        Self {
            id: 0,
            room_number: draft.room_number,
            arrival_day_number: draft.arrival_day_number,
            leave_day_number: draft.leave_day_number,
            guest_number: draft.guest_number,
            had_breakfast: draft.had_breakfast,
            name_id: draft.name_id,
            person: None,
        }
    }

    fn apply_patch(&mut self, patch: &BookingPatch) {
        if let Some(v) = patch.room_number {
            self.room_number = v;
        }
        if let Some(v) = patch.arrival_day_number {
            self.arrival_day_number = v;
        }
        if let Some(v) = patch.leave_day_number {
            self.leave_day_number = v;
        }
        if let Some(v) = patch.guest_number {
            self.guest_number = v;
        }
        if let Some(v) = patch.had_breakfast {
            self.had_breakfast = v;
        }
        if let Some(v) = &patch.name_id {
            self.name_id = v.clone();
        }
    }

    fn check_invariants(&self) -> Result<(), ValidationError> {
        if self.leave_day_number < self.arrival_day_number {
            return Err(ValidationError::FieldError {
                field: "leaveDayNumber".to_string(),
                message: format!(
                    "leave day {} is before arrival day {}",
                    self.leave_day_number, self.arrival_day_number
                ),
            });
        }
        Ok(())
    }

    fn references(&self) -> Vec<Reference> {
        self.person
            .map(|id| Reference {
                field: "person",
                target_kind: "people",
                target_id: id,
            })
            .into_iter()
            .collect()
    }
}
