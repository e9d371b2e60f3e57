use serde::{Deserialize, Serialize};

use crate::domain::User;

use super::{Envelope, EventTypes, WireMessage};

/// Wire message for the user bounded context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardUserMessage {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFields {
    pub entity_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl StandardUserMessage {
    pub const CREATED: &'static str = "USER_CREATED";
    pub const UPDATED: &'static str = "USER_UPDATED";
    pub const DELETED: &'static str = "USER_DELETED";

    pub const EVENT_TYPES: EventTypes =
        EventTypes::new(Self::CREATED, Self::UPDATED, Self::DELETED);

    pub fn new(event_type: impl Into<String>) -> Self {
        Self::from_parts(Envelope::new(event_type), UserFields::default())
    }

    pub fn from_parts(envelope: Envelope, fields: UserFields) -> Self {
        Self {
            envelope,
            entity_id: fields.entity_id,
            name: fields.name,
            email: fields.email,
        }
    }

    pub fn from_user(event_type: impl Into<String>, user: &User) -> Self {
        Self::from_parts(
            Envelope::new(event_type),
            UserFields {
                entity_id: Some(user.id.clone()),
                name: Some(user.name.clone()),
                email: Some(user.email.clone()),
            },
        )
    }

    pub fn from_id(event_type: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::from_parts(
            Envelope::new(event_type),
            UserFields {
                entity_id: Some(user_id.into()),
                ..UserFields::default()
            },
        )
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

impl WireMessage for StandardUserMessage {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}
