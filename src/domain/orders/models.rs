//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::catalog::models::ProductId,
    ids::TypedId,
};

/// Order Id
pub type OrderId = TypedId<OrderRecord>;

/// Characters of the order id shown to the shopper.
const ORDER_NUMBER_LEN: usize = 8;

/// Short, upper-cased order reference shown on the confirmation.
pub fn order_number(id: &OrderId) -> String {
    id.as_str()
        .chars()
        .take(ORDER_NUMBER_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Lifecycle of a placed order, managed from the back office.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfilmentStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

/// Outcome of the payment step recorded on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Shipping destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
}

/// Cart line frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in minor units.
    pub price: u64,
    pub quantity: u32,
    pub image: Option<String>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Stable across retries of one checkout so stores can drop duplicates.
    pub idempotency_key: Uuid,
    pub user_id: Option<String>,
    pub customer: Customer,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
    /// Order total in minor units.
    pub total: u64,
    pub status: FulfilmentStatus,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub created_at: Timestamp,
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,

    #[serde(flatten)]
    pub order: NewOrder,
}
