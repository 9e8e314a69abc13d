//! Person: a named guest, created independently and referenced by bookings

use crate::core::entity::{RecordKey, Reference, Resource};
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: RecordKey,
    pub name: String,
    /// User who created the record
    pub author: Option<RecordKey>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonDraft {
    pub id: Option<RecordKey>,
    #[validate(length(min = 1, max = 25, message = "must be 1 to 25 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    #[validate(length(min = 1, max = 25, message = "must be 1 to 25 characters"))]
    pub name: Option<String>,
}

impl Resource for Person {
    type Draft = PersonDraft;
    type Patch = PersonPatch;

    fn resource_name() -> &'static str {
        "people"
    }

    fn resource_name_singular() -> &'static str {
        "person"
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["name"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "author"]
    }

    fn ownership_field() -> Option<&'static str> {
        Some("author")
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
            "name" => Some(self.name.as_str().into()),
            "author" => Some(self.author.into()),
            _ => None,
        }
    }

    fn requested_id(draft: &PersonDraft) -> Option<RecordKey> {
        draft.id
    }

    fn from_draft(draft: PersonDraft) -> Self {
        Self {
            id: 0,
            name: draft.name,
            author: None,
        }
    }

    fn apply_patch(&mut self, patch: &PersonPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }

    fn references(&self) -> Vec<Reference> {
        self.author
            .map(|id| Reference {
                field: "author",
                target_kind: "users",
                target_id: id,
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::stamp_owner;
    use serde_json::json;

    #[test]
    fn test_name_length_limit() {
        let ok: PersonDraft = serde_json::from_value(json!({"name": "a".repeat(25)})).unwrap();
        assert!(ok.validate().is_ok());

        let long: PersonDraft = serde_json::from_value(json!({"name": "a".repeat(26)})).unwrap();
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_author_is_caller() {
        let draft: PersonDraft =
            serde_json::from_value(json!({"id": 7, "name": "Ann", "author": 3})).unwrap();
        assert_eq!(Person::requested_id(&draft), Some(7));
        let person = stamp_owner(Person::from_draft(draft), 12).unwrap();
        assert_eq!(person.author, Some(12));
    }

    #[test]
    fn test_empty_patch_keeps_name() {
        let mut person = Person {
            id: 1,
            name: "Ann".to_string(),
            author: Some(2),
        };
        person.apply_patch(&PersonPatch::default());
        assert_eq!(person.name, "Ann");
    }
}
