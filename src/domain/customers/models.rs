//! Customer Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::{
    checkout::models::CheckoutStep,
    orders::models::{Customer, OrderId, ShippingAddress},
};

/// Contact details captured when a shopper leaves the first checkout step,
/// whether or not they go on to order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    #[serde(flatten)]
    pub contact: Customer,
    /// Step the shopper was on when the lead was captured.
    pub step: CheckoutStep,
    pub status: LeadStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Incomplete,
    Completed,
}

/// Customer who finished checkout, recorded next to their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompletedCustomer {
    #[serde(flatten)]
    pub contact: Customer,
    #[serde(flatten)]
    pub address: ShippingAddress,
    pub order_id: OrderId,
    pub user_id: Option<String>,
    pub status: LeadStatus,
    pub created_at: Timestamp,
}
