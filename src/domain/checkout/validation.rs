//! Checkout step guards.

use smallvec::SmallVec;
use thiserror::Error;

use crate::domain::checkout::models::{CheckoutStep, Field, FormData};

/// A step's guard failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} step is missing {}", list_fields(.missing))]
pub struct ValidationError {
    pub step: CheckoutStep,
    pub missing: SmallVec<[Field; 4]>,
}

/// Fields that must be filled before leaving `step`.
///
/// Card fields are only checked for presence; the payment step is simulated.
pub const fn required_fields(step: CheckoutStep) -> &'static [Field] {
    match step {
        CheckoutStep::Contact => &[Field::FirstName, Field::LastName, Field::Phone],
        CheckoutStep::Address => &[Field::Address, Field::City, Field::District],
        CheckoutStep::Payment => &[
            Field::CardNumber,
            Field::CardName,
            Field::Expiry,
            Field::Cvv,
        ],
    }
}

/// Check the guard for leaving `step`.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every empty required field.
pub fn validate_step(step: CheckoutStep, form: &FormData) -> Result<(), ValidationError> {
    let missing: SmallVec<[Field; 4]> = required_fields(step)
        .iter()
        .copied()
        .filter(|field| !form.is_filled(*field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { step, missing })
    }
}

/// Check the guards of every step up to and including `last`.
///
/// # Errors
///
/// Returns the first failing step's [`ValidationError`].
pub fn validate_through(last: CheckoutStep, form: &FormData) -> Result<(), ValidationError> {
    CheckoutStep::ALL
        .into_iter()
        .filter(|step| *step <= last)
        .try_for_each(|step| validate_step(step, form))
}

fn list_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
