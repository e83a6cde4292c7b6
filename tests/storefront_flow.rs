//! Integration tests for browsing and checking out against the sample catalog.

use std::{path::PathBuf, sync::Arc};

use rusty_money::iso::{EUR, TRY};
use testresult::TestResult;

use storefront::{
    context::{StorefrontContext, StorefrontSettings},
    domain::{
        carts::models::StockPolicy,
        catalog::{
            CatalogStatus, DEFAULT_MIN_DISCOUNT,
            listing::{ListingQuery, ListingSort},
            models::{CategoryId, ProductId},
        },
        checkout::{
            CheckoutError,
            models::{CheckoutStep, Field, Identity, OrderStatus},
            payment::SimulatedPayments,
        },
        customers::models::LeadStatus,
        orders::models::{FulfilmentStatus, PaymentStatus},
    },
    gateway::{InMemoryGateway, StoreGateway, fixtures::FixtureError},
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/storefront.yml")
}

async fn storefront() -> TestResult<(Arc<InMemoryGateway>, StorefrontContext)> {
    let gateway = Arc::new(InMemoryGateway::from_fixture(&fixture_path(), TRY)?);

    let mut context = StorefrontContext::new(
        Arc::clone(&gateway) as Arc<dyn StoreGateway>,
        Arc::new(SimulatedPayments),
        StorefrontSettings::default(),
    );

    context.load_catalog().await?;

    Ok((gateway, context))
}

fn ids(products: &[&storefront::domain::catalog::models::Product]) -> Vec<String> {
    products.iter().map(|product| product.id.to_string()).collect()
}

#[tokio::test]
async fn sample_catalog_loads_in_display_order() -> TestResult {
    let (_gateway, context) = storefront().await?;

    let slugs: Vec<&str> = context
        .catalog
        .categories()
        .iter()
        .map(|category| category.category_id.as_str())
        .collect();

    assert_eq!(context.catalog.status(), &CatalogStatus::Ready);
    assert_eq!(
        slugs,
        ["teknoloji", "ev-esyalari", "kucuk-ev-aletleri", "bebek-urunleri"]
    );

    Ok(())
}

#[tokio::test]
async fn catalog_queries_over_sample_data() -> TestResult {
    let (_gateway, context) = storefront().await?;
    let catalog = &context.catalog;

    let deals = catalog.discounted(DEFAULT_MIN_DISCOUNT);
    let discounts: Vec<Option<u8>> = deals.iter().map(|product| product.discount).collect();

    assert!(
        discounts.windows(2).all(|pair| matches!(pair, [a, b] if a >= b)),
        "deals not sorted descending: {discounts:?}"
    );
    assert_eq!(
        ids(&deals).first().map(String::as_str),
        Some("sony-wh-1000xm5"),
        "ties keep load order"
    );

    let all = catalog.discounted(0);

    assert!(deals.iter().all(|deal| all.contains(deal)));

    assert_eq!(ids(&catalog.search("GALAXY")), ["galaxy-s24-ultra"]);
    assert!(catalog.search("   ").is_empty());
    assert!(ids(&catalog.featured()).contains(&"sony-wh-1000xm5".to_string()));

    let cheapest_first = catalog.listing(
        &CategoryId::new("teknoloji"),
        &ListingQuery {
            sort: ListingSort::PriceAsc,
            ..ListingQuery::default()
        },
    );

    assert_eq!(
        ids(&cheapest_first).first().map(String::as_str),
        Some("sony-wh-1000xm5")
    );

    assert!(
        catalog
            .category_by_id(&CategoryId::new("mobilya"))
            .is_none()
    );
    assert!(catalog.by_id(&ProductId::new("missing")).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn full_checkout_persists_order_lead_and_customer() -> TestResult {
    let (gateway, mut context) = storefront().await?;

    context
        .add_product(&ProductId::new("philips-hue"), 2)
        .await?;
    context
        .add_product(&ProductId::new("sony-wh-1000xm5"), 1)
        .await?;
    context
        .add_product(&ProductId::new("philips-hue"), 1)
        .await?;

    assert_eq!(context.cart.items().len(), 2);
    assert_eq!(context.cart.total(), 3 * 399_900 + 999_900);

    let identity = Identity {
        uid: "firebase-uid-1".to_string(),
        email: Some("elif@example.com".to_string()),
        display_name: Some("Elif Kara".to_string()),
    };

    let mut session = context.begin_checkout(Some(&identity));

    session.set_field(Field::Phone, "05301112233")?;
    session.advance().await?;

    session.set_field(Field::Address, "Alsancak Mah. 1482 Sk. 7")?;
    session.set_field(Field::City, "Izmir")?;
    session.set_field(Field::District, "Konak")?;
    session.advance().await?;

    session.back();
    session.back();
    session.advance().await?;
    session.advance().await?;

    assert_eq!(session.step(), CheckoutStep::Payment);

    session.set_field(Field::CardNumber, "4242424242424242")?;
    session.set_field(Field::CardName, "ELIF KARA")?;
    session.set_field(Field::Expiry, "11/29")?;
    session.set_field(Field::Cvv, "987")?;

    let receipt = session.submit(&mut context.cart).await?;

    assert!(context.cart.is_empty());
    assert_eq!(receipt.item_count, 4);
    assert_eq!(
        session.status(),
        &OrderStatus::Complete {
            order_id: receipt.order_id.clone(),
        }
    );

    let orders = gateway.orders()?;
    let leads = gateway.leads()?;
    let customers = gateway.completed_customers()?;

    let [order] = orders.as_slice() else {
        unreachable!("exactly one order expected, got {}", orders.len());
    };

    assert_eq!(order.id, receipt.order_id);
    assert_eq!(order.order.user_id.as_deref(), Some("firebase-uid-1"));
    assert_eq!(order.order.customer.first_name, "Elif");
    assert_eq!(order.order.status, FulfilmentStatus::Pending);
    assert_eq!(order.order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.order.items.len(), 2);
    assert_eq!(order.order.total, receipt.total);

    assert_eq!(leads.len(), 1, "lead captured once across back and forward");
    assert_eq!(leads.first().map(|lead| lead.status), Some(LeadStatus::Incomplete));

    assert_eq!(customers.len(), 1);
    assert_eq!(
        customers.first().map(|customer| &customer.order_id),
        Some(&receipt.order_id)
    );

    let resubmit = session.submit(&mut context.cart).await;

    assert!(matches!(resubmit, Err(CheckoutError::AlreadyComplete)));

    gateway
        .update_order_status(&receipt.order_id, FulfilmentStatus::Processing)
        .await?;

    assert_eq!(
        gateway.orders()?.first().map(|record| record.order.status),
        Some(FulfilmentStatus::Processing)
    );

    Ok(())
}

#[tokio::test]
async fn clamp_policy_limits_scarce_products() -> TestResult {
    let gateway = Arc::new(InMemoryGateway::from_fixture(&fixture_path(), TRY)?);

    let mut context = StorefrontContext::new(
        gateway,
        Arc::new(SimulatedPayments),
        StorefrontSettings {
            stock_policy: StockPolicy::Clamp,
            ..StorefrontSettings::default()
        },
    );

    context.load_catalog().await?;

    let held = context
        .add_product(&ProductId::new("cybex-priam"), 5)
        .await?;

    assert_eq!(held, 2);

    Ok(())
}

#[test]
fn sample_catalog_is_priced_in_lira() {
    let result = InMemoryGateway::from_fixture(&fixture_path(), EUR);

    assert!(
        matches!(result, Err(FixtureError::CurrencyMismatch { .. })),
        "expected a currency mismatch"
    );
}
