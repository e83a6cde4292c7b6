//! Checkout Models

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::domain::orders::models::{Customer, OrderId, ShippingAddress};

/// Checkout wizard step, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Contact,
    Address,
    Payment,
}

impl CheckoutStep {
    pub const ALL: [Self; 3] = [Self::Contact, Self::Address, Self::Payment];

    /// Zero-based position in the wizard.
    pub const fn index(self) -> u8 {
        match self {
            Self::Contact => 0,
            Self::Address => 1,
            Self::Payment => 2,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Contact => Some(Self::Address),
            Self::Address => Some(Self::Payment),
            Self::Payment => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Contact => None,
            Self::Address => Some(Self::Contact),
            Self::Payment => Some(Self::Address),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Address => "address",
            Self::Payment => "payment",
        }
    }
}

impl Display for CheckoutStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Progress of the order behind a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    InProgress,
    Submitting,
    Complete { order_id: OrderId },
    Failed { reason: String },
}

/// Checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    District,
    PostalCode,
    CardNumber,
    CardName,
    Expiry,
    Cvv,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::District => "district",
            Self::PostalCode => "postal_code",
            Self::CardNumber => "card_number",
            Self::CardName => "card_name",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        }
    }

    /// Card data that must not show up in logs.
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::CardNumber | Self::Expiry | Self::Cvv)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Authenticated shopper, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Values entered across all checkout steps.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: FxHashMap<Field, String>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with the identity's email and name.
    ///
    /// The first word of the display name becomes the first name and the
    /// remaining words the last name.
    #[must_use]
    pub fn from_identity(identity: &Identity) -> Self {
        let mut form = Self::new();
        let mut names = identity
            .display_name
            .as_deref()
            .unwrap_or_default()
            .split_whitespace();

        form.set(Field::Email, identity.email.clone().unwrap_or_default());
        form.set(Field::FirstName, names.next().unwrap_or_default());
        form.set(Field::LastName, names.collect::<Vec<_>>().join(" "));

        form
    }

    /// Value of `field`, empty when never set.
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Whether `field` holds something other than whitespace.
    pub fn is_filled(&self, field: Field) -> bool {
        !self.get(field).trim().is_empty()
    }

    pub fn customer(&self) -> Customer {
        Customer {
            first_name: self.owned(Field::FirstName),
            last_name: self.owned(Field::LastName),
            email: self.owned(Field::Email),
            phone: self.owned(Field::Phone),
        }
    }

    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            address: self.owned(Field::Address),
            city: self.owned(Field::City),
            district: self.owned(Field::District),
            postal_code: self.owned(Field::PostalCode),
        }
    }

    fn owned(&self, field: Field) -> String {
        self.get(field).trim().to_string()
    }
}

impl Debug for FormData {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut map = f.debug_map();

        for (field, value) in &self.values {
            if field.is_sensitive() {
                map.entry(field, &"<redacted>");
            } else {
                map.entry(field, value);
            }
        }

        map.finish()
    }
}
