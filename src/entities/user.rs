//! User: an account able to authenticate against the API

use crate::core::entity::{RecordKey, Resource};
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored user account
///
/// `password` holds an already-hashed credential. It is a private field and
/// never leaves the service, neither in responses nor in reference projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordKey,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub id: Option<RecordKey>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid e-mail address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid e-mail address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: Option<String>,
}

impl Resource for User {
    type Draft = UserDraft;
    type Patch = UserPatch;

    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    fn searchable_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "email"]
    }

    fn unique_fields() -> &'static [&'static str] {
        &["email"]
    }

    fn private_fields() -> &'static [&'static str] {
        &["password"]
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
            "email" => Some(self.email.as_str().into()),
            _ => None,
        }
    }

    fn requested_id(draft: &UserDraft) -> Option<RecordKey> {
        draft.id
    }

    fn from_draft(draft: UserDraft) -> Self {
        Self {
            id: 0,
            name: draft.name,
            email: draft.email,
            password: draft.password,
        }
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(password) = &patch.password {
            self.password = password.clone();
        }
    }
}
