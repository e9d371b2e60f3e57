//! Domain entities as the bridge sees them.
//!
//! These are snapshots handed over by the use case after it committed.
//! Validation (price ranges, e-mail format, ...) already happened upstream.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    /// Preparation time in minutes.
    pub cooking_time: u32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        cooking_time: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: description.into(),
            price,
            cooking_time,
        }
    }

    /// Partial product carrying only its identifier.
    ///
    /// Produced when a deletion is mapped back into the domain: the entity no
    /// longer exists, so every other field is left at its default.
    pub fn stub(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_stub(&self) -> bool {
        self == &Self::stub(self.id.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn stub(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}
