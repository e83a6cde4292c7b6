//! Checkout Errors

use thiserror::Error;

use crate::{
    domain::checkout::{
        models::CheckoutStep, payment::PaymentError, retry::RetryError,
        validation::ValidationError,
    },
    gateway::GatewayError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("payment is the last step")]
    NoNextStep,

    #[error("orders can only be submitted from the payment step, not {0}")]
    NotAtPayment(CheckoutStep),

    #[error("cart is empty")]
    EmptyCart,

    #[error("order already placed")]
    AlreadyComplete,

    #[error("payment was not authorized")]
    PaymentDeclined(#[source] PaymentError),

    #[error("failed to place order")]
    Submission(#[source] GatewayError),

    #[error("order submission timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },
}

impl From<RetryError> for CheckoutError {
    fn from(error: RetryError) -> Self {
        match error {
            RetryError::TimedOut { attempts } => Self::TimedOut { attempts },
            RetryError::Gateway(source) => Self::Submission(source),
        }
    }
}
