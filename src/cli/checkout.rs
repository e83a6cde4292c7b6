//! Checkout command

use std::io;

use clap::Args;
use rusty_money::iso::Currency;
use storefront::{
    context::StorefrontContext,
    domain::{
        catalog::models::ProductId,
        checkout::models::{CheckoutStep, Field},
    },
};
use tracing::info;

use crate::cli::{errors::CliError, render};

/// Cart line requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemSpec {
    pub product: String,
    pub quantity: u32,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Product to buy, as ID or ID:QTY (repeatable)
    #[arg(long = "item", value_parser = parse_item, required = true)]
    items: Vec<ItemSpec>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// Street address
    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    district: Option<String>,

    #[arg(long)]
    postal_code: Option<String>,

    #[arg(long)]
    card_number: Option<String>,

    /// Name on the card
    #[arg(long)]
    card_name: Option<String>,

    /// Card expiry (MM/YY)
    #[arg(long)]
    expiry: Option<String>,

    #[arg(long)]
    cvv: Option<String>,
}

impl CheckoutArgs {
    fn fields(&self) -> [(Field, Option<&str>); 12] {
        [
            (Field::FirstName, self.first_name.as_deref()),
            (Field::LastName, self.last_name.as_deref()),
            (Field::Email, self.email.as_deref()),
            (Field::Phone, self.phone.as_deref()),
            (Field::Address, self.address.as_deref()),
            (Field::City, self.city.as_deref()),
            (Field::District, self.district.as_deref()),
            (Field::PostalCode, self.postal_code.as_deref()),
            (Field::CardNumber, self.card_number.as_deref()),
            (Field::CardName, self.card_name.as_deref()),
            (Field::Expiry, self.expiry.as_deref()),
            (Field::Cvv, self.cvv.as_deref()),
        ]
    }
}

/// Fill a cart, walk every checkout step and place the order.
pub(crate) async fn run(
    context: &mut StorefrontContext,
    args: CheckoutArgs,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    for item in &args.items {
        context
            .add_product(&ProductId::new(item.product.as_str()), item.quantity)
            .await?;
    }

    let mut session = context.begin_checkout(None);

    for (field, value) in args.fields() {
        if let Some(value) = value {
            session.set_field(field, value)?;
        }
    }

    while session.step() != CheckoutStep::Payment {
        session.advance().await?;
    }

    let lines = context.cart.items().to_vec();
    let receipt = session.submit(&mut context.cart).await?;

    info!(order = %receipt.order_number, "checkout complete");

    render::write_receipt(out, &receipt, &lines, currency)?;

    Ok(())
}

/// Parse `ID` or `ID:QTY`.
pub(crate) fn parse_item(s: &str) -> Result<ItemSpec, String> {
    let (product, quantity) = match s.rsplit_once(':') {
        Some((product, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<u32>()
                .map_err(|error| format!("invalid quantity in {s:?}: {error}"))?;

            (product, quantity)
        }
        None => (s, 1),
    };

    let product = product.trim();

    if product.is_empty() {
        return Err(format!("missing product id in {s:?}"));
    }

    if quantity == 0 {
        return Err(format!("quantity must be at least 1 in {s:?}"));
    }

    Ok(ItemSpec {
        product: product.to_string(),
        quantity,
    })
}
