use crate::domain::User;

use super::{DomainEvent, EventKind, EventPayload};

/// State changes of the user bounded context.
#[derive(Clone, Debug, PartialEq)]
pub enum UserEvent {
    Created(User),
    Updated(User),
    Deleted { user_id: String },
}

impl UserEvent {
    pub fn created(user: User) -> DomainEvent<Self> {
        DomainEvent::new(UserEvent::Created(user))
    }

    pub fn updated(user: User) -> DomainEvent<Self> {
        DomainEvent::new(UserEvent::Updated(user))
    }

    pub fn deleted(user_id: impl Into<String>) -> DomainEvent<Self> {
        DomainEvent::new(UserEvent::Deleted {
            user_id: user_id.into(),
        })
    }

    pub fn user_id(&self) -> &str {
        self.entity_id()
    }
}

impl EventPayload for UserEvent {
    const CONTEXT: &'static str = "user";

    fn kind(&self) -> EventKind {
        match self {
            UserEvent::Created(_) => EventKind::Created,
            UserEvent::Updated(_) => EventKind::Updated,
            UserEvent::Deleted { .. } => EventKind::Deleted,
        }
    }

    fn entity_id(&self) -> &str {
        match self {
            UserEvent::Created(u) | UserEvent::Updated(u) => &u.id,
            UserEvent::Deleted { user_id } => user_id,
        }
    }
}
