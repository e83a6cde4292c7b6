//! Test Helpers

use rustc_hash::FxHashMap;

use crate::domain::{
    catalog::models::{Category, CategoryId, Product, ProductId},
    checkout::{CheckoutError, CheckoutSession, models::Field},
};

/// In-stock product in the `general` category with no discount.
pub(crate) fn product(id: &str, price: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::new(),
        price,
        original_price: None,
        discount: None,
        category: CategoryId::new("general"),
        images: Vec::new(),
        stock: 10,
        featured: false,
        sections: Vec::new(),
        rating: 0.0,
        reviews: 0,
        specs: FxHashMap::default(),
    }
}

pub(crate) fn category(slug: &str, order: Option<u32>) -> Category {
    Category {
        category_id: CategoryId::new(slug),
        name: slug.to_string(),
        icon: String::new(),
        image: String::new(),
        description: String::new(),
        order,
    }
}

/// Fill every checkout field with valid values.
pub(crate) fn fill_checkout_form(session: &mut CheckoutSession) -> Result<(), CheckoutError> {
    let values = [
        (Field::FirstName, "Ayse"),
        (Field::LastName, "Yilmaz"),
        (Field::Email, "ayse@example.com"),
        (Field::Phone, "05321234567"),
        (Field::Address, "Bagdat Cd. 12"),
        (Field::City, "Istanbul"),
        (Field::District, "Kadikoy"),
        (Field::PostalCode, "34710"),
        (Field::CardNumber, "4242424242424242"),
        (Field::CardName, "Ayse Yilmaz"),
        (Field::Expiry, "12/30"),
        (Field::Cvv, "123"),
    ];

    for (field, value) in values {
        session.set_field(field, value)?;
    }

    Ok(())
}
