//! Shopper commands: auth, browsing, cart, checkout.

use serde_json::Value;

use cartify_core::{CartLine, cart_item_count, cart_total};

use crate::api::ApiClient;
use crate::checkout;
use crate::session::Session;

type ShopResult = Result<(), Box<dyn std::error::Error>>;

fn client() -> Result<ApiClient, Box<dyn std::error::Error>> {
    Ok(ApiClient::new(Session::load()?))
}

#[allow(clippy::print_stdout)]
fn say(message: &str) {
    println!("{message}");
}

/// `shop register` - create an account and store the session.
pub async fn register(name: &str, email: &str, password: &str) -> ShopResult {
    let mut client = client()?;
    let auth = client.register(name, email, password).await?;

    say(&format!(
        "Registered {} <{}> (user id {})",
        auth.user.name, auth.user.email, auth.user.user_id
    ));
    Ok(())
}

/// `shop login` - authenticate and store the session.
pub async fn login(email: &str, password: &str) -> ShopResult {
    let mut client = client()?;
    let auth = client.login(email, password).await?;

    say(&format!("Logged in as {}", auth.user.name));
    Ok(())
}

/// `shop logout` - forget the stored session.
pub fn logout() -> ShopResult {
    Session::clear()?;
    say("Logged out");
    Ok(())
}

/// `shop browse` - print a catalog page.
pub async fn browse(page: i64, limit: i64) -> ShopResult {
    let client = client()?;
    let listing = client.products(page, limit).await?;

    let current = listing.get("currentPage").and_then(Value::as_i64).unwrap_or(page);
    let total_pages = listing.get("totalPages").and_then(Value::as_i64).unwrap_or(0);

    say(&format!("Page {current} of {total_pages}"));
    if let Some(products) = listing.get("products").and_then(Value::as_array) {
        for product in products {
            let id = product.get("id").and_then(Value::as_i64).unwrap_or(0);
            let title = product.get("title").and_then(Value::as_str).unwrap_or("?");
            let price = product.get("price").map(ToString::to_string).unwrap_or_default();
            let quantity = product.get("quantity").and_then(Value::as_i64).unwrap_or(0);
            say(&format!("  [{id}] {title} - {price} ({quantity} in stock)"));
        }
    }
    Ok(())
}

fn print_cart(cart: &[CartLine]) {
    if cart.is_empty() {
        say("Cart is empty");
        return;
    }

    for line in cart {
        say(&format!(
            "  [{}] {} x{} @ {}",
            line.product_id, line.title, line.quantity, line.price
        ));
    }
    say(&format!(
        "{} item(s), total {}",
        cart_item_count(cart),
        cart_total(cart)
    ));
}

/// `shop cart` - show the current cart.
pub async fn cart() -> ShopResult {
    let client = client()?;
    let cart = client.cart().await?;
    print_cart(&cart);
    Ok(())
}

/// `shop add` - one-click catalog add with the per-line ceiling.
pub async fn add(product_id: i64) -> ShopResult {
    let client = client()?;

    match checkout::catalog_add(&client, product_id).await? {
        Some(cart) => print_cart(&cart),
        None => say(checkout::LIMIT_MESSAGE),
    }
    Ok(())
}

/// `shop remove` - drop a line from the cart.
pub async fn remove(product_id: i64) -> ShopResult {
    let client = client()?;
    let cart = client.remove_line(product_id).await?;
    print_cart(&cart);
    Ok(())
}

/// `shop checkout` - place an order for the current cart.
pub async fn checkout(atomic: bool) -> ShopResult {
    let client = client()?;

    let placed = if atomic {
        checkout::atomic(&client).await?
    } else {
        checkout::legacy(&client).await?
    };

    let order_id = placed
        .order
        .get("orderId")
        .and_then(Value::as_str)
        .unwrap_or("?");

    say(&format!(
        "Order {order_id} placed, {} paid (payment {})",
        placed.amount_paid, placed.payment_id
    ));
    Ok(())
}

/// `shop orders` - list past orders, newest first.
pub async fn orders() -> ShopResult {
    let client = client()?;
    let response = client.orders().await?;

    let Some(orders) = response.get("orders").and_then(Value::as_array) else {
        say("No orders");
        return Ok(());
    };

    if orders.is_empty() {
        say("No orders");
        return Ok(());
    }

    for order in orders {
        let id = order.get("orderId").and_then(Value::as_str).unwrap_or("?");
        let amount = order
            .get("billAmount")
            .map(ToString::to_string)
            .unwrap_or_default();
        let when = order.get("createdAt").and_then(Value::as_str).unwrap_or("");
        say(&format!("  {id} - {amount} ({when})"));
    }
    Ok(())
}
