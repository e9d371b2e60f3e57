use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Product;

use super::{Envelope, EventTypes, WireMessage};

/// Wire message for the product bounded context.
///
/// Domain fields are optional on the wire: a deletion only carries
/// `entityId`, and consumers must accept payloads from producers that omit
/// fields they do not know yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardProductMessage {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Sent as a decimal string; numeric prices are accepted on decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cooking_time: Option<u32>,
}

/// Domain fields of a [`StandardProductMessage`], for explicit construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFields {
    pub entity_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cooking_time: Option<u32>,
}

impl StandardProductMessage {
    pub const CREATED: &'static str = "PRODUCT_CREATED";
    pub const UPDATED: &'static str = "PRODUCT_UPDATED";
    pub const DELETED: &'static str = "PRODUCT_DELETED";

    pub const EVENT_TYPES: EventTypes =
        EventTypes::new(Self::CREATED, Self::UPDATED, Self::DELETED);

    /// Empty message of the given type; id and timestamp are generated.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::from_parts(Envelope::new(event_type), ProductFields::default())
    }

    pub fn from_parts(envelope: Envelope, fields: ProductFields) -> Self {
        Self {
            envelope,
            entity_id: fields.entity_id,
            name: fields.name,
            category: fields.category,
            description: fields.description,
            price: fields.price,
            cooking_time: fields.cooking_time,
        }
    }

    /// Message carrying the full product snapshot.
    pub fn from_product(event_type: impl Into<String>, product: &Product) -> Self {
        Self::from_parts(
            Envelope::new(event_type),
            ProductFields {
                entity_id: Some(product.id.clone()),
                name: Some(product.name.clone()),
                category: Some(product.category.clone()),
                description: Some(product.description.clone()),
                price: Some(product.price),
                cooking_time: Some(product.cooking_time),
            },
        )
    }

    /// Message carrying only the product identifier.
    pub fn from_id(event_type: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self::from_parts(
            Envelope::new(event_type),
            ProductFields {
                entity_id: Some(product_id.into()),
                ..ProductFields::default()
            },
        )
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn cooking_time(&self) -> Option<u32> {
        self.cooking_time
    }

    pub fn into_fields(self) -> (Envelope, ProductFields) {
        (
            self.envelope,
            ProductFields {
                entity_id: self.entity_id,
                name: self.name,
                category: self.category,
                description: self.description,
                price: self.price,
                cooking_time: self.cooking_time,
            },
        )
    }
}

impl WireMessage for StandardProductMessage {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}
