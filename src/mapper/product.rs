use crate::domain::Product;
use crate::error::MappingError;
use crate::event::{DomainEvent, EventKind, ProductEvent};
use crate::message::{EventTypes, StandardProductMessage, WireMessage};

use super::EventMapper;

/// Maps [`ProductEvent`]s to [`StandardProductMessage`]s and back.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductMessageMapper;

impl ProductMessageMapper {
    pub fn new() -> Self {
        Self
    }

    /// Domain object for a received message.
    ///
    /// Deletions produce [`Product::stub`]: only the id is known. Fields a
    /// producer left out fall back to their defaults.
    pub fn to_product(&self, message: &StandardProductMessage) -> Result<Product, MappingError> {
        match self.from_message(message)? {
            ProductEvent::Created(product) | ProductEvent::Updated(product) => Ok(product),
            ProductEvent::Deleted { product_id } => Ok(Product::stub(product_id)),
        }
    }
}

impl EventMapper for ProductMessageMapper {
    type Event = ProductEvent;
    type Message = StandardProductMessage;

    fn event_types(&self) -> EventTypes {
        StandardProductMessage::EVENT_TYPES
    }

    fn to_message(
        &self,
        event: &DomainEvent<ProductEvent>,
    ) -> Result<StandardProductMessage, MappingError> {
        let event_type = self.event_type_of(event);
        let message = match event.payload() {
            ProductEvent::Created(product) | ProductEvent::Updated(product) => {
                StandardProductMessage::from_product(event_type, product)
            }
            ProductEvent::Deleted { product_id } => {
                StandardProductMessage::from_id(event_type, product_id.as_str())
            }
        };
        Ok(message)
    }

    fn from_message(&self, message: &StandardProductMessage) -> Result<ProductEvent, MappingError> {
        let kind = self.event_types().kind(message.event_type())?;
        let id = message
            .entity_id()
            .ok_or_else(|| MappingError::MissingField {
                message_id: message.message_id().to_string(),
                field: "entityId",
            })?
            .to_string();

        if kind == EventKind::Deleted {
            return Ok(ProductEvent::Deleted { product_id: id });
        }

        let product = Product {
            id,
            name: message.name().unwrap_or_default().to_string(),
            category: message.category().unwrap_or_default().to_string(),
            description: message.description().unwrap_or_default().to_string(),
            price: message.price().unwrap_or_default(),
            cooking_time: message.cooking_time().unwrap_or_default(),
        };

        Ok(match kind {
            EventKind::Updated => ProductEvent::Updated(product),
            _ => ProductEvent::Created(product),
        })
    }
}
