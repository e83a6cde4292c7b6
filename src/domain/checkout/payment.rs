//! Payment authorization.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::{
    checkout::models::{Field, FormData},
    orders::models::PaymentStatus,
};

/// Card fields collected on the payment step.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl PaymentDetails {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            card_number: form.get(Field::CardNumber).trim().to_string(),
            card_name: form.get(Field::CardName).trim().to_string(),
            expiry: form.get(Field::Expiry).trim().to_string(),
            cvv: form.get(Field::Cvv).trim().to_string(),
        }
    }

    /// Last four characters of the card number.
    pub fn last_four(&self) -> String {
        let mut tail: Vec<char> = self.card_number.chars().rev().take(4).collect();
        tail.reverse();
        tail.into_iter().collect()
    }
}

impl Debug for PaymentDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PaymentDetails")
            .field("card_number", &format_args!("**** {}", self.last_four()))
            .field("card_name", &self.card_name)
            .finish_non_exhaustive()
    }
}

/// Result of a successful authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAuthorization {
    pub status: PaymentStatus,
    /// Processor reference, when the processor issues one.
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    /// Authorize a charge of `amount` minor units against the card.
    async fn authorize(
        &self,
        details: &PaymentDetails,
        amount: u64,
    ) -> Result<PaymentAuthorization, PaymentError>;
}

/// Stand-in processor that approves every charge without contacting anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPayments;

#[async_trait]
impl PaymentAuthorizer for SimulatedPayments {
    async fn authorize(
        &self,
        _details: &PaymentDetails,
        _amount: u64,
    ) -> Result<PaymentAuthorization, PaymentError> {
        Ok(PaymentAuthorization {
            status: PaymentStatus::Paid,
            reference: None,
        })
    }
}
