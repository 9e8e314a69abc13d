//! Price: a seasonal rate lookup, independent of every other kind

use crate::core::entity::{RecordKey, Resource};
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: RecordKey,
    pub month: String,
    pub days: i64,
    pub start_day: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PriceDraft {
    pub id: Option<RecordKey>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub month: String,
    #[validate(range(min = 1, max = 31))]
    pub days: i64,
    #[validate(range(min = 1, max = 365))]
    pub start_day: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricePatch {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub month: Option<String>,
    #[validate(range(min = 1, max = 31))]
    pub days: Option<i64>,
    #[validate(range(min = 1, max = 365))]
    pub start_day: Option<i64>,
}

impl Resource for Price {
    type Draft = PriceDraft;
    type Patch = PricePatch;

    fn resource_name() -> &'static str {
        "prices"
    }

    fn resource_name_singular() -> &'static str {
        "price"
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["month"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "month", "days", "startDay"]
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
            "month" => Some(self.month.as_str().into()),
            "days" => Some(self.days.into()),
            "startDay" => Some(self.start_day.into()),
            _ => None,
        }
    }

    fn requested_id(draft: &PriceDraft) -> Option<RecordKey> {
        draft.id
    }

    fn from_draft(draft: PriceDraft) -> Self {
        Self {
            id: 0,
            month: draft.month,
            days: draft.days,
            start_day: draft.start_day,
        }
    }

    fn apply_patch(&mut self, patch: &PricePatch) {
        if let Some(month) = &patch.month {
            self.month = month.clone();
        }
        if let Some(days) = patch.days {
            self.days = days;
        }
        if let Some(start_day) = patch.start_day {
            self.start_day = start_day;
        }
    }
}
