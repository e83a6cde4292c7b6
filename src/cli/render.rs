//! Table rendering

use std::io;

use humanize_duration::{Truncate, prelude::DurationExt};
use rusty_money::iso::Currency;
use storefront::{
    domain::{
        carts::models::CartLineItem,
        catalog::models::{Category, Product},
        checkout::OrderReceipt,
    },
    money::format_price,
};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Style,
        object::Columns,
    },
};

fn styled(builder: Builder) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table
}

pub(crate) fn write_products(
    out: &mut impl io::Write,
    products: &[&Product],
    currency: &'static Currency,
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Category", "Price", "Discount", "Stock", "Rating"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.to_string(),
            format_price(product.price, currency),
            product
                .discount_percent()
                .map(|discount| format!("{discount}%"))
                .unwrap_or_default(),
            product.stock.to_string(),
            format!("{:.1} ({})", product.rating, product.reviews),
        ]);
    }

    let mut table = styled(builder);
    table.modify(Columns::new(3..7), Alignment::right());

    writeln!(out, "{table}")
}

pub(crate) fn write_categories(
    out: &mut impl io::Write,
    categories: &[Category],
    product_counts: &[usize],
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Slug", "Name", "Products"]);

    for (category, count) in categories.iter().zip(product_counts) {
        builder.push_record([
            category.category_id.to_string(),
            category.name.clone(),
            count.to_string(),
        ]);
    }

    let mut table = styled(builder);
    table.modify(Columns::one(2), Alignment::right());

    writeln!(out, "{table}")
}

pub(crate) fn write_product_detail(
    out: &mut impl io::Write,
    product: &Product,
    currency: &'static Currency,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Field", "Value"]);
    builder.push_record(["Id".to_string(), product.id.to_string()]);
    builder.push_record(["Name".to_string(), product.name.clone()]);
    builder.push_record(["Category".to_string(), product.category.to_string()]);
    builder.push_record(["Price".to_string(), format_price(product.price, currency)]);

    if let Some(original) = product.original_price {
        builder.push_record(["Original price".to_string(), format_price(original, currency)]);
    }

    if let Some(discount) = product.discount_percent() {
        let label = if product.discount_is_consistent() {
            format!("{discount}%")
        } else {
            format!("{discount}% (prices imply {}%)", product.implied_discount().unwrap_or(0))
        };

        builder.push_record(["Discount".to_string(), label]);
    }

    builder.push_record([
        "Availability".to_string(),
        if product.is_in_stock() {
            format!("{} in stock", product.stock)
        } else {
            "Out of stock".to_string()
        },
    ]);
    builder.push_record([
        "Rating".to_string(),
        format!("{:.1} from {} reviews", product.rating, product.reviews),
    ]);

    let mut specs: Vec<_> = product.specs.iter().collect();
    specs.sort();

    for (name, value) in specs {
        builder.push_record([name.clone(), value.clone()]);
    }

    writeln!(out, "{}", styled(builder))?;

    if !product.description.is_empty() {
        writeln!(out, "{}", product.description)?;
    }

    Ok(())
}

pub(crate) fn write_receipt(
    out: &mut impl io::Write,
    receipt: &OrderReceipt,
    lines: &[CartLineItem],
    currency: &'static Currency,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Unit", "Total"]);

    for line in lines {
        builder.push_record([
            line.product.name.clone(),
            line.quantity.to_string(),
            format_price(line.product.price, currency),
            format_price(line.line_total(), currency),
        ]);
    }

    builder.push_record([
        "Total".to_string(),
        receipt.item_count.to_string(),
        String::new(),
        format_price(receipt.total, currency),
    ]);

    let mut table = styled(builder);
    table.modify(Columns::new(1..4), Alignment::right());

    writeln!(out, "Order placed: #{}", receipt.order_number)?;
    writeln!(out, "{table}")?;
    writeln!(out, "Confirmed in {}", receipt.elapsed.human(Truncate::Nano))
}
