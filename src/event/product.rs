use crate::domain::Product;

use super::{DomainEvent, EventKind, EventPayload};

/// State changes of the product bounded context.
#[derive(Clone, Debug, PartialEq)]
pub enum ProductEvent {
    Created(Product),
    Updated(Product),
    /// The product is gone; only its key remains.
    Deleted { product_id: String },
}

impl ProductEvent {
    pub fn created(product: Product) -> DomainEvent<Self> {
        DomainEvent::new(ProductEvent::Created(product))
    }

    pub fn updated(product: Product) -> DomainEvent<Self> {
        DomainEvent::new(ProductEvent::Updated(product))
    }

    pub fn deleted(product_id: impl Into<String>) -> DomainEvent<Self> {
        DomainEvent::new(ProductEvent::Deleted {
            product_id: product_id.into(),
        })
    }

    /// Full snapshot, when the variant carries one.
    pub fn product(&self) -> Option<&Product> {
        match self {
            ProductEvent::Created(p) | ProductEvent::Updated(p) => Some(p),
            ProductEvent::Deleted { .. } => None,
        }
    }
}

impl EventPayload for ProductEvent {
    const CONTEXT: &'static str = "product";

    fn kind(&self) -> EventKind {
        match self {
            ProductEvent::Created(_) => EventKind::Created,
            ProductEvent::Updated(_) => EventKind::Updated,
            ProductEvent::Deleted { .. } => EventKind::Deleted,
        }
    }

    fn entity_id(&self) -> &str {
        match self {
            ProductEvent::Created(p) | ProductEvent::Updated(p) => &p.id,
            ProductEvent::Deleted { product_id } => product_id,
        }
    }
}
