use crate::domain::User;
use crate::error::MappingError;
use crate::event::{DomainEvent, EventKind, UserEvent};
use crate::message::{EventTypes, StandardUserMessage, WireMessage};

use super::EventMapper;

#[derive(Clone, Copy, Debug, Default)]
pub struct UserMessageMapper;

impl UserMessageMapper {
    pub fn new() -> Self {
        Self
    }

    /// Deletions yield [`User::stub`].
    pub fn to_user(&self, message: &StandardUserMessage) -> Result<User, MappingError> {
        match self.from_message(message)? {
            UserEvent::Created(user) | UserEvent::Updated(user) => Ok(user),
            UserEvent::Deleted { user_id } => Ok(User::stub(user_id)),
        }
    }
}

impl EventMapper for UserMessageMapper {
    type Event = UserEvent;
    type Message = StandardUserMessage;

    fn event_types(&self) -> EventTypes {
        StandardUserMessage::EVENT_TYPES
    }

    fn to_message(&self, event: &DomainEvent<UserEvent>) -> Result<StandardUserMessage, MappingError> {
        let event_type = self.event_type_of(event);
        Ok(match event.payload() {
            UserEvent::Created(user) | UserEvent::Updated(user) => {
                StandardUserMessage::from_user(event_type, user)
            }
            UserEvent::Deleted { user_id } => StandardUserMessage::from_id(event_type, user_id.as_str()),
        })
    }

    fn from_message(&self, message: &StandardUserMessage) -> Result<UserEvent, MappingError> {
        let kind = self.event_types().kind(message.event_type())?;
        let user_id = message
            .entity_id()
            .ok_or_else(|| MappingError::MissingField {
                message_id: message.message_id().to_string(),
                field: "entityId",
            })?
            .to_string();

        if kind == EventKind::Deleted {
            return Ok(UserEvent::Deleted { user_id });
        }

        let user = User {
            id: user_id,
            name: message.name().unwrap_or_default().to_string(),
            email: message.email().unwrap_or_default().to_string(),
        };

        Ok(match kind {
            EventKind::Updated => UserEvent::Updated(user),
            _ => UserEvent::Created(user),
        })
    }
}
